//! Song values produced by the recognition and lyrics clients.

use std::collections::BTreeMap;
use std::fmt;

/// Streaming services whose links the recognition service can return.
///
/// The derived ordering is the order provider buttons are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StreamingProvider {
    Spotify,
    AppleMusic,
}

impl StreamingProvider {
    /// Stable provider name, as used in the recognition request's `return`
    /// field.
    pub fn name(&self) -> &'static str {
        match self {
            StreamingProvider::Spotify => "spotify",
            StreamingProvider::AppleMusic => "apple_music",
        }
    }

    /// Label of the inline button linking to this provider.
    pub fn button_label(&self) -> &'static str {
        match self {
            StreamingProvider::Spotify => "🎧 Listen on Spotify",
            StreamingProvider::AppleMusic => "🎵 Listen on Apple Music",
        }
    }
}

impl fmt::Display for StreamingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Best match returned by the recognition service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SongMatch {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub release_date: Option<String>,
    pub streaming_links: BTreeMap<StreamingProvider, String>,
    /// Landing page aggregating all providers (AudD `song_link`).
    pub source_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl SongMatch {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            ..Self::default()
        }
    }
}

/// One ranked candidate from a lyrics search.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricsHit {
    pub title: String,
    pub artist: String,
    /// Canonical lyrics page.
    pub url: String,
    pub thumbnail_url: Option<String>,
}

/// The `{title, artist}` projection kept in a user's search history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub title: String,
    pub artist: String,
}

impl HistoryEntry {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }
}

impl From<&SongMatch> for HistoryEntry {
    fn from(song: &SongMatch) -> Self {
        Self::new(song.title.clone(), song.artist.clone())
    }
}

impl From<&LyricsHit> for HistoryEntry {
    fn from(hit: &LyricsHit) -> Self {
        Self::new(hit.title.clone(), hit.artist.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spotify_sorts_before_apple_music() {
        let mut links = BTreeMap::new();
        links.insert(StreamingProvider::AppleMusic, "https://music.apple.com/x".to_string());
        links.insert(StreamingProvider::Spotify, "https://open.spotify.com/x".to_string());

        let order: Vec<_> = links.keys().copied().collect();
        assert_eq!(
            order,
            vec![StreamingProvider::Spotify, StreamingProvider::AppleMusic]
        );
    }

    #[test]
    fn history_entry_projects_title_and_artist() {
        let mut song = SongMatch::new("Bohemian Rhapsody", "Queen");
        song.album = Some("A Night at the Opera".into());

        assert_eq!(
            HistoryEntry::from(&song),
            HistoryEntry::new("Bohemian Rhapsody", "Queen")
        );
    }

    #[test]
    fn provider_names_match_request_fields() {
        assert_eq!(StreamingProvider::Spotify.to_string(), "spotify");
        assert_eq!(StreamingProvider::AppleMusic.name(), "apple_music");
    }
}
