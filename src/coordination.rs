use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::CoordinationConfig;
use crate::error::DownloaderError;

pub const COMPLETION_KEY: &str = "/migration/download";
pub const COMPLETION_VALUE: &str = "complete";

/// The one store operation the downloader needs.
pub trait CoordinationStore: Send + Sync {
    /// Creates `key`; fails if it already exists.
    fn create(&self, key: &str, value: &str) -> Result<(), DownloaderError>;
}

/// Minimal client for the etcd v2 keys API.
#[derive(Clone)]
pub struct EtcdStore {
    client: Client,
    endpoint: String,
}

impl EtcdStore {
    pub fn new(config: &CoordinationConfig) -> Result<Self, DownloaderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| DownloaderError::CoordinationHttp(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint(),
        })
    }

    pub fn key_url(&self, key: &str) -> String {
        format!("{}/v2/keys/{}", self.endpoint, key.trim_start_matches('/'))
    }
}

impl CoordinationStore for EtcdStore {
    fn create(&self, key: &str, value: &str) -> Result<(), DownloaderError> {
        let response = self
            .client
            .put(self.key_url(key))
            .query(&[("prevExist", "false")])
            .form(&[("value", value)])
            .send()
            .map_err(|err| DownloaderError::CoordinationHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "etcd request failed".to_string());
            return Err(DownloaderError::CoordinationStatus { status, message });
        }
        Ok(())
    }
}

/// Records that the download phase finished.
pub fn signal_complete(store: &dyn CoordinationStore) -> Result<(), DownloaderError> {
    store.create(COMPLETION_KEY, COMPLETION_VALUE)?;
    tracing::info!(
        store = "etcd",
        key = COMPLETION_KEY,
        "added download completion in etcd"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;

    fn store_for(address: std::net::SocketAddr) -> EtcdStore {
        EtcdStore::new(&CoordinationConfig {
            host: address.ip().to_string(),
            port: address.port().to_string(),
        })
        .unwrap()
    }

    #[test]
    fn key_url_uses_v2_keys_api() {
        let store = EtcdStore::new(&CoordinationConfig {
            host: "10.0.0.5".to_string(),
            port: "2379".to_string(),
        })
        .unwrap();
        assert_eq!(
            store.key_url(COMPLETION_KEY),
            "http://10.0.0.5:2379/v2/keys/migration/download"
        );
    }

    #[test]
    fn create_puts_value_with_prev_exist_false() {
        let (address, server) = serve_once("201 Created", "{}");

        signal_complete(&store_for(address)).unwrap();

        let request = server.join().unwrap();
        assert!(request.starts_with("PUT /v2/keys/migration/download?prevExist=false "));
        assert!(request.ends_with("value=complete"));
    }

    #[test]
    fn existing_key_is_coordination_status_error() {
        let (address, server) = serve_once(
            "412 Precondition Failed",
            r#"{"errorCode":105,"message":"Key already exists"}"#,
        );

        let err = store_for(address)
            .create(COMPLETION_KEY, COMPLETION_VALUE)
            .unwrap_err();

        match err {
            DownloaderError::CoordinationStatus { status, message } => {
                assert_eq!(status, 412);
                assert!(message.contains("Key already exists"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.join().unwrap();
    }
}
