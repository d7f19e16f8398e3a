use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use url::Url;

use crate::config::FeedConfig;
use crate::error::{ConfigError, FetchError};
use crate::feed::{decode_feed, records_from_document, RecordMap};
use crate::state::AppState;

/// Everything the worker needs for its single request.
#[derive(Debug)]
pub struct FetchConfig {
    pub endpoint: Url,
    pub query: BTreeMap<String, String>,
    pub credential_param: String,
    pub credential: Option<SecretString>,
}

impl FetchConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            query: BTreeMap::new(),
            credential_param: "apiKey".to_owned(),
            credential: None,
        }
    }

    /// Resolves the endpoint and reads the credential from the environment.
    pub fn from_feed_config(feed: &FeedConfig) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(&feed.endpoint)?;
        Ok(Self {
            endpoint,
            query: feed.query.clone(),
            credential_param: feed.credential_param.clone(),
            credential: Some(feed.credential()?),
        })
    }

    pub fn with_credential(mut self, credential: SecretString) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Full request URL, credential included. Never log the result.
    pub fn request_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
            if let Some(credential) = &self.credential {
                pairs.append_pair(&self.credential_param, credential.expose_secret());
            }
        }
        url
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Published { records: usize },
    Failed,
    Cancelled,
}

pub struct FetchHandle {
    cancel_tx: broadcast::Sender<()>,
    join: JoinHandle<FetchOutcome>,
}

impl FetchHandle {
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the worker to finish on its own.
    pub async fn wait(self) -> Result<FetchOutcome, FetchError> {
        self.join.await.map_err(FetchError::from)
    }

    /// Cancels the request if still in flight and waits for the task to end.
    pub async fn stop(self) -> Result<FetchOutcome, FetchError> {
        let _ = self.cancel_tx.send(());
        self.join.await.map_err(FetchError::from)
    }
}

/// Launches the one-shot worker. It publishes into `state` at most once and
/// leaves it untouched on any failure.
pub fn spawn_fetch(state: Arc<AppState>, client: Client, config: FetchConfig) -> FetchHandle {
    let (cancel_tx, mut cancel_rx) = broadcast::channel(1);
    let join = tokio::spawn(async move {
        info!(endpoint = %config.endpoint, "fetching news in background");
        let fetched = tokio::select! {
            Ok(()) = cancel_rx.recv() => {
                info!("fetch cancelled before completion");
                return FetchOutcome::Cancelled;
            }
            fetched = fetch_records(&client, &config) => fetched,
        };
        publish(&state, fetched)
    });

    FetchHandle { cancel_tx, join }
}

/// Issues the request and decodes the body into a fresh mapping.
pub async fn fetch_records(client: &Client, config: &FetchConfig) -> Result<RecordMap, FetchError> {
    let response = client.get(config.request_url()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    let bytes = response.bytes().await?;
    let document = decode_feed(&bytes)?;
    Ok(records_from_document(document))
}

fn publish(state: &AppState, fetched: Result<RecordMap, FetchError>) -> FetchOutcome {
    let records = match fetched {
        Ok(records) => records,
        Err(err) => {
            // reqwest errors may embed the request url; strip it so the credential stays out of logs.
            let err = match err {
                FetchError::Network(inner) => FetchError::Network(inner.without_url()),
                other => other,
            };
            warn!(error = %err, "news fetch failed, no data will be shown");
            return FetchOutcome::Failed;
        }
    };
    match state.records().publish(records) {
        Ok(records) => FetchOutcome::Published { records },
        Err(err) => {
            warn!(error = %err, "news publish rejected");
            FetchOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_appends_query_and_credential() {
        let mut config = FetchConfig::new(Url::parse("https://example.com/v2/top").unwrap())
            .with_credential(SecretString::from("k3y".to_owned()));
        config.query.insert("country".into(), "us".into());

        let url = config.request_url();
        assert_eq!(url.path(), "/v2/top");
        assert_eq!(url.query(), Some("country=us&apiKey=k3y"));
    }

    #[test]
    fn debug_output_masks_the_credential() {
        let config = FetchConfig::new(Url::parse("https://example.com/").unwrap())
            .with_credential(SecretString::from("k3y".to_owned()));
        assert!(!format!("{config:?}").contains("k3y"));
    }

    #[test]
    fn from_feed_config_rejects_bad_endpoint() {
        let feed = FeedConfig {
            endpoint: "not a url".into(),
            ..FeedConfig::default()
        };
        assert!(matches!(
            FetchConfig::from_feed_config(&feed),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }
}
