use assert_matches::assert_matches;

use migration_downloader::domain::{LogLevel, OntologyName, RetrievalRequest, SourceKind};
use migration_downloader::error::DownloaderError;

#[test]
fn parse_ontology_name() {
    let name: OntologyName = " GO ".parse().unwrap();
    assert_eq!(name.as_str(), "GO");
    assert_eq!(name.acronym(), "GO");
    assert_eq!(name.file_name(), "go.obo");
}

#[test]
fn ontology_name_keeps_separators() {
    let name: OntologyName = "dicty_phenotypes".parse().unwrap();
    assert_eq!(name.file_name(), "dicty_phenotypes.obo");
    assert_eq!(name.acronym(), "DICTY_PHENOTYPES");
}

#[test]
fn parse_ontology_name_invalid() {
    for value in ["", "go/obo", "../so", "1go"] {
        let err = value.parse::<OntologyName>().unwrap_err();
        assert_matches!(err, DownloaderError::InvalidOntologyName(_));
    }
}

#[test]
fn source_kind_labels() {
    assert_eq!(SourceKind::Purl.to_string(), "purl");
    assert_eq!(SourceKind::Box.to_string(), "box");
    assert_eq!(
        serde_json::to_string(&SourceKind::Ebi).unwrap(),
        "\"ebi\""
    );
}

#[test]
fn log_level_directives() {
    assert_eq!(LogLevel::default(), LogLevel::Info);
    assert_eq!(LogLevel::Warn.filter_directive(), "warn");
    assert_eq!(LogLevel::Fatal.filter_directive(), "error");
    assert_eq!(LogLevel::Panic.filter_directive(), "error");
}

#[test]
fn retrieval_request_builder() {
    let request = RetrievalRequest::new("http://host/x.obo", "/data/ontology/x.obo")
        .with_authorization("apikey token=k");
    assert_eq!(request.authorization.as_deref(), Some("apikey token=k"));
    assert_eq!(
        request.destination,
        std::path::Path::new("/data/ontology/x.obo")
    );
}
