use std::io::Write;

use assert_matches::assert_matches;

use migration_downloader::config::{Config, ConfigLoader, ConfigOverrides, GithubSelection};
use migration_downloader::domain::LogLevel;
use migration_downloader::error::DownloaderError;

#[test]
fn bioportal_without_api_key_is_rejected() {
    let config = Config {
        bioportal: vec!["GO".to_string()],
        api_key: Some("   ".to_string()),
        ..Config::default()
    };

    let err = ConfigLoader::resolve_config(config).unwrap_err();
    assert_matches!(err, DownloaderError::MissingCredential(_));
}

#[test]
fn purl_does_not_need_api_key() {
    let config = Config {
        obo: vec!["go".to_string()],
        ..Config::default()
    };
    let resolved = ConfigLoader::resolve_config(config).unwrap();
    assert_eq!(resolved.purl[0].as_str(), "go");
    assert!(resolved.api_key.is_none());
}

#[test]
fn blank_obo_entries_are_ignored() {
    let config = Config {
        obo: vec![String::new(), " ".to_string()],
        ..Config::default()
    };
    let resolved = ConfigLoader::resolve_config(config).unwrap();
    assert!(resolved.purl.is_empty());
    assert!(!resolved.has_sources());
}

#[test]
fn invalid_ontology_name() {
    let config = Config {
        obo: vec!["../go".to_string()],
        ..Config::default()
    };
    let err = ConfigLoader::resolve_config(config).unwrap_err();
    assert_matches!(err, DownloaderError::InvalidOntologyName(_));
}

#[test]
fn coordination_requires_host_and_port() {
    let cases = [
        (Some("etcd"), Some("2379"), true),
        (Some("etcd"), None, false),
        (None, Some("2379"), false),
        (Some(""), Some("2379"), false),
        (Some("etcd"), Some(" "), false),
    ];
    for (host, port, expected) in cases {
        let config = Config {
            etcd_host: host.map(str::to_string),
            etcd_port: port.map(str::to_string),
            ..Config::default()
        };
        let resolved = ConfigLoader::resolve_config(config).unwrap();
        assert_eq!(resolved.coordination.is_some(), expected, "{host:?} {port:?}");
    }
}

#[test]
fn flags_override_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "download-folder": "/srv/data",
            "obo": ["go"],
            "github": false,
            "log-level": "warn",
            "endpoints": {{ "purl": "http://mirror.example/obo/" }}
        }}"#
    )
    .unwrap();

    let overrides = ConfigOverrides {
        obo: vec!["so".to_string()],
        github: Some(vec!["eco.obo".to_string()]),
        gpad: true,
        log_level: Some(LogLevel::Debug),
        ..ConfigOverrides::default()
    };
    let resolved = ConfigLoader::resolve(file.path().to_str(), overrides).unwrap();

    assert_eq!(resolved.download_folder, "/srv/data");
    assert_eq!(resolved.purl.len(), 1);
    assert_eq!(resolved.purl[0].as_str(), "so");
    assert_eq!(resolved.github, Some(vec!["eco.obo".to_string()]));
    assert!(resolved.gpad);
    assert_eq!(resolved.log_level, LogLevel::Debug);
    assert_eq!(resolved.endpoints.purl, "http://mirror.example/obo");
}

#[test]
fn github_false_disables_listing() {
    let config = Config {
        github: Some(GithubSelection::Enabled(false)),
        ..Config::default()
    };
    let resolved = ConfigLoader::resolve_config(config).unwrap();
    assert!(resolved.github.is_none());
}

#[test]
fn missing_config_file() {
    let err =
        ConfigLoader::resolve(Some("/nonexistent/downloader.json"), ConfigOverrides::default())
            .unwrap_err();
    assert_matches!(err, DownloaderError::ConfigRead(_));
}

#[test]
fn malformed_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    let err = ConfigLoader::resolve(file.path().to_str(), ConfigOverrides::default()).unwrap_err();
    assert_matches!(err, DownloaderError::ConfigParse(_));
}
