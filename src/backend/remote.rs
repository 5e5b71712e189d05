use std::time::Duration;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};

use crate::backend::{Backend, BackendError, EventStore, SnapshotStore};
use crate::config::app::RemoteConfig;
use crate::engagement::event::LearningEvent;
use crate::engagement::snapshot::EngagementSnapshot;

/// JSON REST client for the hosted data service.
///
/// Routes: `GET|PUT {base}/snapshots/{user}`, `POST {base}/events`,
/// `GET {base}/events?since=..[&user_id=..]`. User ids are sent as a single
/// percent-encoded path segment.
pub struct RemoteBackend {
    client: Client,
    /// Always ends with `/` so relative joins stay under it
    base_url: Url,
    api_key: Option<String>,
}

impl RemoteBackend {
    pub fn new(config: &RemoteConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base)
            .map_err(|e| BackendError::InvalidTarget(format!("base_url {}: {}", config.base_url, e)))?;

        Ok(RemoteBackend {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| BackendError::InvalidTarget(format!("{}: {}", path, e)))
    }

    /// `{base}/snapshots/{user}` with the id encoded as one segment
    fn snapshot_url(&self, user_id: &str) -> Result<Url, BackendError> {
        if user_id.is_empty() || user_id == "." || user_id == ".." {
            return Err(BackendError::InvalidTarget(format!("user id {:?} cannot name a snapshot", user_id)));
        }
        let mut url = self.url("snapshots")?;
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidTarget(format!("base_url {} cannot carry a path", self.base_url)))?
            .push(user_id);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn check_status(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch_events(&self, query: &[(&str, String)]) -> Result<Vec<LearningEvent>, BackendError> {
        let request = self.client.get(self.url("events")?).query(query);
        let response = self.authorize(request).send().await?;
        let response = Self::check_status(response).await?;
        let mut events: Vec<LearningEvent> = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        events.sort_by_key(|e| e.occurred_at);
        Ok(events)
    }
}

#[async_trait]
impl SnapshotStore for RemoteBackend {
    async fn load_snapshot(&self, user_id: &str) -> Result<Option<EngagementSnapshot>, BackendError> {
        let request = self.client.get(self.snapshot_url(user_id)?);
        let response = self.authorize(request).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(user_id = user_id, "No remote snapshot yet");
            return Ok(None);
        }

        let response = Self::check_status(response).await?;
        let snapshot = response
            .json::<EngagementSnapshot>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Some(snapshot))
    }

    async fn save_snapshot(&self, user_id: &str, snapshot: &EngagementSnapshot) -> Result<(), BackendError> {
        let request = self.client
            .put(self.snapshot_url(user_id)?)
            .json(snapshot);
        let response = self.authorize(request).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl EventStore for RemoteBackend {
    async fn record_event(&self, event: &LearningEvent) -> Result<(), BackendError> {
        let request = self.client.post(self.url("events")?).json(event);
        let response = self.authorize(request).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn events_for(&self, user_id: &str, since: NaiveDate) -> Result<Vec<LearningEvent>, BackendError> {
        self.fetch_events(&[
            ("user_id", user_id.to_string()),
            ("since", since.to_string()),
        ])
        .await
    }

    async fn all_events(&self, since: NaiveDate) -> Result<Vec<LearningEvent>, BackendError> {
        self.fetch_events(&[("since", since.to_string())]).await
    }
}

impl Backend for RemoteBackend {
    fn name(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> RemoteBackend {
        RemoteBackend::new(&RemoteConfig {
            base_url: "https://data.example.com/api/".to_string(),
            api_key: None,
            timeout_secs: 5,
        })
        .expect("client builds")
    }

    #[test]
    fn test_url_joining_trims_slashes() {
        let backend = backend();
        assert_eq!(backend.url("/events").expect("url").as_str(), "https://data.example.com/api/events");
        assert_eq!(
            backend.snapshot_url("u1").expect("url").as_str(),
            "https://data.example.com/api/snapshots/u1"
        );
    }

    #[test]
    fn test_user_id_stays_inside_snapshot_path() {
        let backend = backend();
        assert_eq!(
            backend.snapshot_url("../events").expect("url").as_str(),
            "https://data.example.com/api/snapshots/..%2Fevents"
        );
        assert_eq!(
            backend.snapshot_url("a?b#c").expect("url").as_str(),
            "https://data.example.com/api/snapshots/a%3Fb%23c"
        );
        assert_eq!(
            backend.snapshot_url("amy/other").expect("url").path(),
            "/api/snapshots/amy%2Fother"
        );
    }

    #[test]
    fn test_dot_segments_rejected() {
        let backend = backend();
        for id in ["", ".", ".."] {
            let err = backend.snapshot_url(id).expect_err("rejected");
            assert_eq!(err.kind(), "invalid_target");
        }
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let result = RemoteBackend::new(&RemoteConfig {
            base_url: "not a url".to_string(),
            api_key: None,
            timeout_secs: 5,
        });
        assert!(matches!(result, Err(BackendError::InvalidTarget(_))));
    }
}
