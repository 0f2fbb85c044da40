//! Genius lyrics search backend.
//!
//! `GET {base_url}/search?q=<query>` with a bearer token; the top
//! `max_results` hits (at most [`MAX_RESULTS`]) are mapped onto [`LyricsHit`]s.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::LyricsConfig;
use crate::song::LyricsHit;

use super::client::{LyricsError, LyricsSearch, MAX_RESULTS};

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: Option<SearchResponse>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    result: GeniusSong,
}

#[derive(Debug, Deserialize)]
struct GeniusSong {
    title: String,
    primary_artist: GeniusArtist,
    url: String,
    song_art_image_thumbnail_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeniusArtist {
    name: String,
}

impl From<GeniusSong> for LyricsHit {
    fn from(song: GeniusSong) -> Self {
        Self {
            title: song.title,
            artist: song.primary_artist.name,
            url: song.url,
            thumbnail_url: song.song_art_image_thumbnail_url,
        }
    }
}

/// Calls the Genius `/search` endpoint.
pub struct GeniusClient {
    client: reqwest::Client,
    config: LyricsConfig,
    access_token: String,
}

impl GeniusClient {
    /// Build a `GeniusClient` from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.
    pub fn from_config(config: &LyricsConfig, access_token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl LyricsSearch for GeniusClient {
    async fn search(&self, query: &str) -> Result<Vec<LyricsHit>, LyricsError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LyricsError::EmptyQuery);
        }

        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));

        let envelope: SearchEnvelope = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let response = envelope.response.ok_or(LyricsError::MissingResponse)?;

        Ok(response
            .hits
            .into_iter()
            .take(self.config.max_results.clamp(1, MAX_RESULTS))
            .map(|hit| LyricsHit::from(hit.result))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::PREVIEW_PLACEHOLDER;

    fn client() -> GeniusClient {
        GeniusClient::from_config(&LyricsConfig::default(), "token")
    }

    #[tokio::test]
    async fn blank_query_is_rejected_without_request() {
        let err = client().search("   ").await.unwrap_err();
        assert!(matches!(err, LyricsError::EmptyQuery));
    }

    #[test]
    fn preview_is_static_placeholder() {
        assert_eq!(
            client().preview("https://genius.com/Queen-we-will-rock-you-lyrics"),
            PREVIEW_PLACEHOLDER
        );
    }

    #[test]
    fn hit_without_thumbnail_parses() {
        let hit: SearchHit = serde_json::from_value(serde_json::json!({
            "result": {
                "title": "We Will Rock You",
                "primary_artist": { "name": "Queen" },
                "url": "https://genius.com/Queen-we-will-rock-you-lyrics"
            }
        }))
        .expect("hit");

        let hit = LyricsHit::from(hit.result);
        assert_eq!(hit.artist, "Queen");
        assert!(hit.thumbnail_url.is_none());
    }

    #[test]
    fn client_is_object_safe() {
        let searcher: Box<dyn LyricsSearch> = Box::new(client());
        drop(searcher);
    }
}
