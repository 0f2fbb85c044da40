//! AudD recognition backend.
//!
//! Submits `{api_token, url, return}` as a form POST and maps the JSON reply
//! onto a [`SongMatch`].  Only the `spotify` and `apple_music` provider
//! blocks are read; anything else AudD returns is ignored.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::RecognitionConfig;
use crate::song::{SongMatch, StreamingProvider};

use super::client::{RecognitionError, Recognizer};

/// Size the Apple Music artwork template is rendered at.
const ARTWORK_SIZE: &str = "600";

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AuddResponse {
    status: Option<String>,
    result: Option<AuddSong>,
}

#[derive(Debug, Deserialize)]
struct AuddSong {
    title: String,
    artist: String,
    album: Option<String>,
    release_date: Option<String>,
    song_link: Option<String>,
    spotify: Option<SpotifyBlock>,
    apple_music: Option<AppleMusicBlock>,
}

#[derive(Debug, Deserialize)]
struct SpotifyBlock {
    external_urls: Option<SpotifyUrls>,
    album: Option<SpotifyAlbum>,
}

#[derive(Debug, Deserialize)]
struct SpotifyUrls {
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpotifyAlbum {
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
struct AppleMusicBlock {
    url: Option<String>,
    artwork: Option<Image>,
}

#[derive(Debug, Deserialize)]
struct Image {
    url: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<AuddSong> for SongMatch {
    fn from(song: AuddSong) -> Self {
        let mut matched = SongMatch::new(song.title, song.artist);
        matched.album = non_empty(song.album);
        matched.release_date = non_empty(song.release_date);
        matched.source_url = non_empty(song.song_link);

        let mut spotify_thumb = None;
        if let Some(spotify) = song.spotify {
            if let Some(url) = non_empty(spotify.external_urls.and_then(|u| u.spotify)) {
                matched
                    .streaming_links
                    .insert(StreamingProvider::Spotify, url);
            }
            spotify_thumb = spotify
                .album
                .and_then(|a| a.images.into_iter().next())
                .map(|img| img.url);
        }

        let mut apple_thumb = None;
        if let Some(apple) = song.apple_music {
            if let Some(url) = non_empty(apple.url) {
                matched
                    .streaming_links
                    .insert(StreamingProvider::AppleMusic, url);
            }
            apple_thumb = apple.artwork.map(|art| {
                art.url
                    .replace("{w}", ARTWORK_SIZE)
                    .replace("{h}", ARTWORK_SIZE)
            });
        }

        matched.thumbnail_url = non_empty(spotify_thumb.or(apple_thumb));
        matched
    }
}

// ---------------------------------------------------------------------------
// AuddClient
// ---------------------------------------------------------------------------

/// Calls the AudD recognition endpoint.
///
/// Connection details come from [`RecognitionConfig`]; the API token is
/// passed separately because it is read from the environment.
pub struct AuddClient {
    client: reqwest::Client,
    config: RecognitionConfig,
    api_token: String,
}

impl AuddClient {
    /// Build an `AuddClient` from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails.
    pub fn from_config(config: &RecognitionConfig, api_token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            api_token: api_token.into(),
        }
    }
}

#[async_trait]
impl Recognizer for AuddClient {
    async fn recognize(&self, media_url: &str) -> Result<SongMatch, RecognitionError> {
        let form = [
            ("api_token", self.api_token.as_str()),
            ("url", media_url),
            ("return", self.config.return_fields.as_str()),
        ];

        let response = self
            .client
            .post(&self.config.base_url)
            .form(&form)
            .send()
            .await?
            .error_for_status()?;

        let body: AuddResponse = response.json().await?;

        if body.status.as_deref() != Some("success") {
            return Err(RecognitionError::Status(body.status));
        }

        body.result
            .map(SongMatch::from)
            .ok_or(RecognitionError::NoMatch)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> AuddResponse {
        serde_json::from_value(json).expect("valid AudD payload")
    }

    #[test]
    fn maps_full_result() {
        let body = parse(serde_json::json!({
            "status": "success",
            "result": {
                "artist": "Queen",
                "title": "Bohemian Rhapsody",
                "album": "A Night at the Opera",
                "release_date": "1975-10-31",
                "song_link": "https://lis.tn/abc",
                "spotify": {
                    "external_urls": { "spotify": "https://open.spotify.com/track/1" },
                    "album": { "images": [ { "url": "https://i.scdn.co/image/big" } ] }
                },
                "apple_music": {
                    "url": "https://music.apple.com/song/1",
                    "artwork": { "url": "https://is1.mzstatic.com/{w}x{h}bb.jpg" }
                }
            }
        }));

        let song = SongMatch::from(body.result.expect("result"));
        assert_eq!(song.title, "Bohemian Rhapsody");
        assert_eq!(song.album.as_deref(), Some("A Night at the Opera"));
        assert_eq!(song.release_date.as_deref(), Some("1975-10-31"));
        assert_eq!(song.source_url.as_deref(), Some("https://lis.tn/abc"));
        assert_eq!(song.streaming_links.len(), 2);
        assert_eq!(
            song.thumbnail_url.as_deref(),
            Some("https://i.scdn.co/image/big")
        );
    }

    #[test]
    fn falls_back_to_apple_artwork() {
        let body = parse(serde_json::json!({
            "status": "success",
            "result": {
                "artist": "Queen",
                "title": "Under Pressure",
                "apple_music": {
                    "url": "https://music.apple.com/song/2",
                    "artwork": { "url": "https://is1.mzstatic.com/{w}x{h}bb.jpg" }
                }
            }
        }));

        let song = SongMatch::from(body.result.expect("result"));
        assert_eq!(
            song.thumbnail_url.as_deref(),
            Some("https://is1.mzstatic.com/600x600bb.jpg")
        );
        assert!(!song.streaming_links.contains_key(&StreamingProvider::Spotify));
    }

    #[test]
    fn blank_optional_fields_become_none() {
        let body = parse(serde_json::json!({
            "status": "success",
            "result": {
                "artist": "Someone",
                "title": "Something",
                "album": "",
                "release_date": "  ",
                "song_link": null
            }
        }));

        let song = SongMatch::from(body.result.expect("result"));
        assert!(song.album.is_none());
        assert!(song.release_date.is_none());
        assert!(song.source_url.is_none());
        assert!(song.streaming_links.is_empty());
    }

    #[test]
    fn null_result_deserialises_as_none() {
        let body = parse(serde_json::json!({ "status": "success", "result": null }));
        assert!(body.result.is_none());
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _client = AuddClient::from_config(&RecognitionConfig::default(), "token");
    }

    /// `AuddClient` must be usable as `dyn Recognizer`.
    #[test]
    fn client_is_object_safe() {
        let client: Box<dyn Recognizer> =
            Box::new(AuddClient::from_config(&RecognitionConfig::default(), "token"));
        drop(client);
    }
}
