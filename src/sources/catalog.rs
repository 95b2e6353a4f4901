use crate::config::Endpoints;
use crate::domain::{OntologyName, RetrievalRequest, SourceKind};
use crate::error::DownloaderError;
use crate::folder::DownloadFolder;
use crate::transport::bioportal_authorization;

use super::{TaskContext, TaskReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogProtocol {
    /// `{purl}/{name}.obo`, anonymous.
    Purl,
    /// `{bioportal}/{ACRONYM}/download`, needs an api key.
    Bioportal,
}

/// Named ontologies fetched one after another from a catalog.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    protocol: CatalogProtocol,
    names: Vec<OntologyName>,
    api_key: Option<String>,
}

impl CatalogSource {
    pub fn purl(names: Vec<OntologyName>) -> Self {
        Self {
            protocol: CatalogProtocol::Purl,
            names,
            api_key: None,
        }
    }

    pub fn bioportal(names: Vec<OntologyName>, api_key: String) -> Self {
        Self {
            protocol: CatalogProtocol::Bioportal,
            names,
            api_key: Some(api_key),
        }
    }

    pub fn protocol(&self) -> CatalogProtocol {
        self.protocol
    }

    pub fn kind(&self) -> SourceKind {
        match self.protocol {
            CatalogProtocol::Purl => SourceKind::Purl,
            CatalogProtocol::Bioportal => SourceKind::Bioportal,
        }
    }

    pub fn url(&self, endpoints: &Endpoints, name: &OntologyName) -> String {
        match self.protocol {
            CatalogProtocol::Purl => format!("{}/{}.obo", endpoints.purl, name.file_stem()),
            CatalogProtocol::Bioportal => {
                format!("{}/{}/download", endpoints.bioportal, name.acronym())
            }
        }
    }

    /// One request per name, in the order the names were given.
    pub fn requests(
        &self,
        endpoints: &Endpoints,
        folder: &DownloadFolder,
    ) -> Result<Vec<RetrievalRequest>, DownloaderError> {
        let authorization = match (self.protocol, &self.api_key) {
            (CatalogProtocol::Purl, _) => None,
            (CatalogProtocol::Bioportal, Some(key)) => Some(bioportal_authorization(key)),
            (CatalogProtocol::Bioportal, None) => {
                return Err(DownloaderError::MissingCredential(
                    "bioportal api-key is not set".to_string(),
                ));
            }
        };
        Ok(self
            .names
            .iter()
            .map(|name| {
                let request = RetrievalRequest::new(
                    self.url(endpoints, name),
                    folder.ontology_path(&name.file_name()),
                );
                match &authorization {
                    Some(value) => request.with_authorization(value.clone()),
                    None => request,
                }
            })
            .collect())
    }

    pub fn run(&self, ctx: &TaskContext<'_>) -> Result<TaskReport, DownloaderError> {
        let source = self.kind();
        let mut files = Vec::with_capacity(self.names.len());
        for request in self.requests(ctx.endpoints, ctx.folder)? {
            files.push(ctx.retrieve(source, &request)?);
        }
        Ok(TaskReport { source, files })
    }
}
