use serde::{Deserialize, Serialize};

pub mod spotify;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    pub is_playing: bool,
    pub progress_ms: u64,
    pub track: Option<TrackInfo>,
}

impl PlaybackSnapshot {
    /// Snapshot used when Spotify reports no active session
    pub fn nothing_playing() -> PlaybackSnapshot {
        PlaybackSnapshot {
            is_playing: false,
            progress_ms: 0,
            track: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TrackInfo {
    pub name: String,
    pub duration_ms: u64,
    pub artists: Vec<String>,
    pub album_cover_url: Option<String>,
    // Open-in-app link used by the `open` redirect
    pub external_url: Option<String>,
}

impl TrackInfo {
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TopTracks(pub Vec<TrackInfo>);

impl TopTracks {
    /// Out of range (including negative) indices are not found
    pub fn get(&self, index: i64) -> Option<&TrackInfo> {
        usize::try_from(index).ok().and_then(|i| self.0.get(i))
    }

    pub fn into_track(mut self, index: i64) -> Option<TrackInfo> {
        let index = usize::try_from(index).ok()?;
        if index < self.0.len() {
            Some(self.0.swap_remove(index))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderInput {
    pub cover_data_uri: Option<String>,
    pub artist: String,
    pub track: Option<String>,
    pub is_playing: bool,
    pub progress_ms: u64,
    pub duration_ms: u64,
}

impl RenderInput {
    pub fn new(snapshot: &PlaybackSnapshot, cover_data_uri: Option<String>) -> RenderInput {
        let track = snapshot.track.as_ref();
        RenderInput {
            cover_data_uri,
            artist: track.map(TrackInfo::artist_line).unwrap_or_default(),
            track: track.map(|t| t.name.clone()),
            is_playing: snapshot.is_playing,
            progress_ms: snapshot.progress_ms,
            duration_ms: track.map(|t| t.duration_ms).unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TopTrackInput {
    pub index: usize,
    pub cover_data_uri: Option<String>,
    pub artist: String,
    pub track: String,
}

#[derive(Debug)]
pub enum Error {
    NotFound,
    /// Token exchange or refresh was rejected
    Auth(String),
    /// Upstream answered with a non-success status
    Fetch(String),
    Config(String),
    Internal(InternalError),
}

impl Error {
    pub fn auth_error(e: impl Into<String>) -> Self {
        Self::Auth(e.into())
    }

    pub fn fetch_error(e: impl Into<String>) -> Self {
        Self::Fetch(e.into())
    }

    #[cfg(feature = "hyper")]
    pub fn status_code(&self) -> hyper::StatusCode {
        use hyper::StatusCode;
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Auth(_) | Error::Fetch(_) => StatusCode::BAD_GATEWAY,
            Error::Config(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotFound => write!(f, "not found"),
            Error::Auth(e) => write!(f, "spotify auth error: {e}"),
            Error::Fetch(e) => write!(f, "upstream fetch error: {e}"),
            Error::Config(e) => write!(f, "{e}"),
            Error::Internal(e) => write!(f, "{:?}", e),
        }
    }
}

impl std::error::Error for Error {}

#[derive(Debug)]
pub enum InternalError {
    #[cfg(feature = "hyper")]
    HyperError(hyper::Error),
    #[cfg(feature = "hyper")]
    RequestError(hyper::http::Error),
    JSONError(serde_json::Error),
    IOError(std::io::Error),
}

#[cfg(feature = "hyper")]
impl From<hyper::Error> for Error {
    fn from(e: hyper::Error) -> Error {
        Error::Internal(InternalError::HyperError(e))
    }
}

#[cfg(feature = "hyper")]
impl From<hyper::http::Error> for Error {
    fn from(e: hyper::http::Error) -> Error {
        Error::Internal(InternalError::RequestError(e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Internal(InternalError::JSONError(e))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Internal(InternalError::IOError(e))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn track(name: &str) -> TrackInfo {
        TrackInfo {
            name: name.to_owned(),
            duration_ms: 1000,
            artists: vec!["A".to_owned(), "B".to_owned()],
            album_cover_url: None,
            external_url: None,
        }
    }

    #[test]
    fn test_top_tracks_get() {
        let tracks = TopTracks(vec![track("first"), track("second"), track("third")]);
        assert_eq!(tracks.get(0).map(|t| t.name.as_str()), Some("first"));
        assert_eq!(tracks.get(2).map(|t| t.name.as_str()), Some("third"));
        assert_eq!(tracks.get(3), None);
        assert_eq!(tracks.get(-1), None);
        assert_eq!(tracks.get(i64::MAX), None);
        assert_eq!(TopTracks::default().get(0), None);
    }

    #[test]
    fn test_into_track() {
        let tracks = TopTracks(vec![track("first"), track("second"), track("third")]);
        assert_eq!(tracks.clone().into_track(1).unwrap().name, "second");
        assert_eq!(tracks.clone().into_track(0).unwrap().name, "first");
        assert!(tracks.clone().into_track(3).is_none());
        assert!(tracks.into_track(-2).is_none());
    }

    #[test]
    fn test_render_input() {
        let snapshot = PlaybackSnapshot {
            is_playing: true,
            progress_ms: 400,
            track: Some(track("song")),
        };
        assert_eq!(
            RenderInput::new(&snapshot, None),
            RenderInput {
                cover_data_uri: None,
                artist: "A, B".to_owned(),
                track: Some("song".to_owned()),
                is_playing: true,
                progress_ms: 400,
                duration_ms: 1000,
            }
        );

        let input = RenderInput::new(&PlaybackSnapshot::nothing_playing(), None);
        assert_eq!(input.track, None);
        assert_eq!(input.artist, "");
        assert_eq!(input.duration_ms, 0);
    }
}
