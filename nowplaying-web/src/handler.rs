use crate::{cover, cover::ImageSource, fetch, render, AppState};
use hyper::StatusCode;
use nowplaying::{Error, RenderInput, TopTrackInput, TrackInfo};
use spotify::Spotify;
use std::time::Instant;

pub const NOW_PLAYING_CACHE_CONTROL: &str = "public, s-maxage=90, stale-while-revalidate=604800";
pub const TOP_TRACKS_CACHE_CONTROL: &str =
    "public, s-maxage=259200, stale-while-revalidate=2592000";

/// What a handler wants to send back, independent of the hosting platform
#[derive(Debug, Eq, PartialEq)]
pub enum Reply {
    Svg {
        body: String,
        cache_control: &'static str,
    },
    Redirect(String),
    Empty(StatusCode),
}

#[derive(Debug, Default, Eq, PartialEq)]
pub struct Params {
    pub open: bool,
    pub index: Option<i64>,
}

impl Params {
    pub fn parse(query: Option<&str>) -> Params {
        let mut params = Params::default();
        let mut seen_index = false;
        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                // Presence is enough, `?open` and `?open=` count
                "open" => params.open = true,
                // Only the first `i` is used
                "i" if !seen_index => {
                    seen_index = true;
                    params.index = parse_index(&value);
                }
                _ => {}
            }
        }
        params
    }
}

/// Lenient integer parsing: leading whitespace and trailing garbage are
/// ignored (`" 2"` and `"2abc"` are both 2), no digits means no index.
pub fn parse_index(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => ("-", &s[1..]),
        Some(b'+') => ("", &s[1..]),
        _ => ("", s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    format!("{sign}{}", &rest[..digits]).parse().ok()
}

/// Request scoped timing marks
pub struct Marks {
    name: &'static str,
    start: Instant,
}

impl Marks {
    pub fn new(name: &'static str) -> Marks {
        let marks = Marks {
            name,
            start: Instant::now(),
        };
        marks.mark("start");
        marks
    }

    pub fn mark(&self, label: &str) {
        tracing::debug!(
            handler = self.name,
            "{}ms {}",
            self.start.elapsed().as_millis(),
            label
        );
    }
}

pub async fn now_playing<S: Spotify, I: ImageSource>(
    state: &AppState<S, I>,
    params: &Params,
) -> Result<Reply, Error> {
    let marks = Marks::new("now-playing");
    let snapshot = fetch::fetch_now_playing(&state.spotify, &state.refresh_token).await?;
    marks.mark("now playing fetched");

    if params.open {
        return Ok(open(snapshot.track.as_ref()));
    }

    let cover = inline_cover(&state.images, snapshot.track.as_ref(), &marks).await;
    let input = RenderInput::new(&snapshot, cover);
    tracing::info!(
        is_playing = input.is_playing,
        artist = %input.artist,
        track = ?input.track,
        "rendering now playing badge"
    );
    let body = render::render(&input);
    marks.mark("render done");
    Ok(Reply::Svg {
        body,
        cache_control: NOW_PLAYING_CACHE_CONTROL,
    })
}

pub async fn top_tracks<S: Spotify, I: ImageSource>(
    state: &AppState<S, I>,
    params: &Params,
) -> Result<Reply, Error> {
    let marks = Marks::new("top-tracks");
    let Some(index) = params.index else {
        return Err(Error::NotFound);
    };
    let Some(track) = fetch::fetch_top_track(&state.spotify, &state.refresh_token, index).await?
    else {
        return Err(Error::NotFound);
    };
    marks.mark("top track fetched");

    if params.open {
        return Ok(open(Some(&track)));
    }

    let cover = inline_cover(&state.images, Some(&track), &marks).await;
    let input = TopTrackInput {
        // fetch_top_track only resolves non-negative indices
        index: index as usize,
        cover_data_uri: cover,
        artist: track.artist_line(),
        track: track.name,
    };
    let body = render::render_top_track(&input);
    marks.mark("render done");
    Ok(Reply::Svg {
        body,
        cache_control: TOP_TRACKS_CACHE_CONTROL,
    })
}

fn open(track: Option<&TrackInfo>) -> Reply {
    match track.and_then(|t| t.external_url.clone()) {
        Some(location) => Reply::Redirect(location),
        None => Reply::Empty(StatusCode::OK),
    }
}

/// A missing cover shouldn't take the whole badge down
async fn inline_cover(
    images: &impl ImageSource,
    track: Option<&TrackInfo>,
    marks: &Marks,
) -> Option<String> {
    let url = track.and_then(|t| t.album_cover_url.as_deref());
    match cover::inline(images, url).await {
        Ok(cover) => {
            if cover.is_some() {
                marks.mark("cover done");
            }
            cover
        }
        Err(e) => {
            tracing::warn!("rendering without cover: {}", e);
            None
        }
    }
}
