//! Client for the Opencast External API (`/api/series`, `/api/events`).

use std::{fmt, time::Duration};

use async_trait::async_trait;
use castview_model::{Series, SeriesId, Video, VideoId};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::{CoreError, Result};
use crate::ports::SeriesClient;

#[derive(Clone, Default)]
pub struct OpencastCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for OpencastCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpencastCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct SeriesPayload {
    identifier: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    identifier: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    is_part_of: String,
}

#[derive(Debug, Clone)]
pub struct OpencastApiProvider {
    http: Client,
    base_url: Url,
    credentials: OpencastCredentials,
}

impl OpencastApiProvider {
    pub fn new(
        base_url: Url,
        credentials: OpencastCredentials,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("castview/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, base_url, credentials))
    }

    pub fn with_client(
        http: Client,
        base_url: Url,
        credentials: OpencastCredentials,
    ) -> Self {
        Self {
            http,
            base_url,
            credentials,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn get(&self, url: Url) -> RequestBuilder {
        let request = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        if self.credentials.username.is_empty() {
            request
        } else {
            request.basic_auth(
                &self.credentials.username,
                Some(&self.credentials.password),
            )
        }
    }
}

#[async_trait]
impl SeriesClient for OpencastApiProvider {
    async fn series(&self, id: &SeriesId) -> Result<Option<Series>> {
        let url = self.endpoint(&["api", "series", id.as_str()]);
        let endpoint = url.path().to_string();
        let response = self.get(url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(series = %id, "series unknown to Opencast");
                Ok(None)
            }
            status if status.is_success() => {
                let payload: SeriesPayload = response.json().await?;
                let identifier = SeriesId::parse(payload.identifier)
                    .unwrap_or_else(|_| id.clone());
                Ok(Some(Series {
                    identifier,
                    title: payload.title,
                }))
            }
            status => Err(CoreError::Upstream {
                status: status.as_u16(),
                endpoint,
            }),
        }
    }

    async fn series_videos(&self, id: &SeriesId) -> Result<Vec<Video>> {
        let mut url = self.endpoint(&["api", "events"]);
        url.query_pairs_mut()
            .append_pair("filter", &format!("is_part_of:{id}"))
            .append_pair("sort", "start_date:ASC");
        let endpoint = url.path().to_string();
        let response = self.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Upstream {
                status: status.as_u16(),
                endpoint,
            });
        }

        let events: Vec<EventPayload> = response.json().await?;
        let total = events.len();
        let videos: Vec<Video> = events
            .into_iter()
            .filter_map(|event| match VideoId::new(event.identifier) {
                Ok(identifier) => Some(Video {
                    identifier,
                    title: event.title,
                    series_identifier: event.is_part_of,
                }),
                Err(err) => {
                    warn!(series = %id, error = %err, "skipping event without identifier");
                    None
                }
            })
            .collect();

        debug!(series = %id, total, kept = videos.len(), "fetched series events");
        Ok(videos)
    }
}
