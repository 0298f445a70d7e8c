use crate::{PlaybackSnapshot, TopTracks, TrackInfo};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of `GET /v1/me/player/currently-playing`
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CurrentlyPlaying {
    #[serde(default)]
    pub is_playing: bool,
    pub progress_ms: Option<u64>,
    // null for ads and while switching between items
    pub item: Option<Track>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Track {
    pub name: String,
    pub duration_ms: u64,
    pub artists: Vec<Artist>,
    // Episodes have no album
    pub album: Option<Album>,
    pub external_urls: HashMap<String, String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Album {
    pub images: Vec<Image>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Artist {
    pub name: String,
}

/// Body of `GET /v1/me/top/tracks`
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TopTracksPage {
    #[serde(default)]
    pub items: Vec<Track>,
}

impl From<Track> for TrackInfo {
    fn from(mut track: Track) -> TrackInfo {
        TrackInfo {
            name: track.name,
            duration_ms: track.duration_ms,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            // Images are ordered widest first, the badge only needs the smallest
            album_cover_url: track
                .album
                .and_then(|album| album.images.into_iter().next_back())
                .map(|image| image.url),
            external_url: track.external_urls.remove("spotify"),
        }
    }
}

impl From<CurrentlyPlaying> for PlaybackSnapshot {
    fn from(playing: CurrentlyPlaying) -> PlaybackSnapshot {
        PlaybackSnapshot {
            is_playing: playing.is_playing,
            progress_ms: playing.progress_ms.unwrap_or_default(),
            track: playing.item.map(TrackInfo::from),
        }
    }
}

impl From<TopTracksPage> for TopTracks {
    fn from(page: TopTracksPage) -> TopTracks {
        TopTracks(page.items.into_iter().map(TrackInfo::from).collect())
    }
}
