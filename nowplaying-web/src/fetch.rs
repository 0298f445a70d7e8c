use nowplaying::{Error, PlaybackSnapshot, TopTracks, TrackInfo};
use spotify::Spotify;

// The API maximum, so every index a user can see on their profile resolves
pub const TOP_TRACKS_LIMIT: u32 = 50;

pub async fn fetch_now_playing(
    spotify: &impl Spotify,
    refresh_token: &str,
) -> Result<PlaybackSnapshot, Error> {
    let token = spotify.refresh_access_token(refresh_token).await?;
    Ok(spotify
        .get_currently_playing(&token)
        .await?
        .map(PlaybackSnapshot::from)
        .unwrap_or_else(PlaybackSnapshot::nothing_playing))
}

pub async fn fetch_top_tracks(
    spotify: &impl Spotify,
    refresh_token: &str,
) -> Result<TopTracks, Error> {
    let token = spotify.refresh_access_token(refresh_token).await?;
    Ok(spotify
        .get_top_tracks(&token, TOP_TRACKS_LIMIT)
        .await?
        .into())
}

pub async fn fetch_top_track(
    spotify: &impl Spotify,
    refresh_token: &str,
    index: i64,
) -> Result<Option<TrackInfo>, Error> {
    if index < 0 {
        return Ok(None);
    }
    Ok(fetch_top_tracks(spotify, refresh_token)
        .await?
        .into_track(index))
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use async_trait::async_trait;
    use nowplaying::spotify::{Album, Artist, CurrentlyPlaying, Image, TopTracksPage, Track};
    use spotify::Token;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub const REFRESH_TOKEN: &str = "refresh";

    #[derive(Default)]
    pub struct FakeSpotify {
        pub playing: Option<(bool, u64, Option<Track>)>,
        pub top_tracks: Vec<Track>,
        pub reject_refresh: bool,
        pub calls: AtomicUsize,
    }

    impl FakeSpotify {
        pub fn playing(is_playing: bool, progress_ms: u64, track: Option<Track>) -> FakeSpotify {
            FakeSpotify {
                playing: Some((is_playing, progress_ms, track)),
                ..Default::default()
            }
        }

        pub fn top_tracks(tracks: Vec<Track>) -> FakeSpotify {
            FakeSpotify {
                top_tracks: tracks,
                ..Default::default()
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn check(&self, token: &Token) -> Result<(), Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if token.access_token == "access" {
                Ok(())
            } else {
                Err(Error::fetch_error("Spotify API error 401 Unauthorized"))
            }
        }
    }

    pub fn track(name: &str, artists: &[&str], cover: Option<&str>, url: Option<&str>) -> Track {
        Track {
            name: name.to_owned(),
            duration_ms: 200_000,
            artists: artists
                .iter()
                .map(|name| Artist {
                    name: (*name).to_owned(),
                })
                .collect(),
            album: Some(Album {
                images: cover
                    .map(|url| Image {
                        url: url.to_owned(),
                        height: Some(64),
                        width: Some(64),
                    })
                    .into_iter()
                    .collect(),
            }),
            external_urls: url
                .map(|url| ("spotify".to_owned(), url.to_owned()))
                .into_iter()
                .collect(),
        }
    }

    #[async_trait]
    impl Spotify for FakeSpotify {
        async fn get_token(&self, code: &str, _redirect_uri: &str) -> Result<Token, Error> {
            if code == "good" {
                Ok(Token {
                    access_token: "access".to_owned(),
                    token_type: Some("Bearer".to_owned()),
                    scope: None,
                    expires_in: Some(3600),
                    refresh_token: Some(REFRESH_TOKEN.to_owned()),
                })
            } else {
                Err(Error::auth_error(r#"{"error":"invalid_grant"}"#))
            }
        }

        async fn refresh_access_token(&self, refresh_token: &str) -> Result<Token, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject_refresh || refresh_token != REFRESH_TOKEN {
                return Err(Error::auth_error(r#"{"error":"invalid_grant"}"#));
            }
            Ok(Token {
                access_token: "access".to_owned(),
                token_type: None,
                scope: None,
                expires_in: None,
                refresh_token: None,
            })
        }

        async fn get_currently_playing(
            &self,
            token: &Token,
        ) -> Result<Option<CurrentlyPlaying>, Error> {
            self.check(token)?;
            Ok(self
                .playing
                .clone()
                .map(|(is_playing, progress_ms, item)| CurrentlyPlaying {
                    is_playing,
                    progress_ms: Some(progress_ms),
                    item,
                }))
        }

        async fn get_top_tracks(&self, token: &Token, limit: u32) -> Result<TopTracksPage, Error> {
            self.check(token)?;
            Ok(TopTracksPage {
                items: self.top_tracks.iter().take(limit as usize).cloned().collect(),
            })
        }
    }

    #[tokio::test]
    async fn test_fetch_now_playing() {
        let spotify = FakeSpotify::playing(
            true,
            1234,
            Some(track("Song", &["A", "B"], Some("https://i/cover"), None)),
        );
        let snapshot = fetch_now_playing(&spotify, REFRESH_TOKEN).await.unwrap();
        assert!(snapshot.is_playing);
        assert_eq!(snapshot.progress_ms, 1234);
        let track = snapshot.track.unwrap();
        assert_eq!(track.name, "Song");
        assert_eq!(track.artist_line(), "A, B");
        assert_eq!(track.album_cover_url.as_deref(), Some("https://i/cover"));
    }

    #[tokio::test]
    async fn test_fetch_nothing_playing() {
        let spotify = FakeSpotify::default();
        assert_eq!(
            fetch_now_playing(&spotify, REFRESH_TOKEN).await.unwrap(),
            PlaybackSnapshot::nothing_playing()
        );
    }

    #[tokio::test]
    async fn test_fetch_auth_failure() {
        let spotify = FakeSpotify {
            reject_refresh: true,
            ..FakeSpotify::default()
        };
        assert!(matches!(
            fetch_now_playing(&spotify, REFRESH_TOKEN).await,
            Err(Error::Auth(_))
        ));
        assert!(matches!(
            fetch_top_track(&spotify, REFRESH_TOKEN, 0).await,
            Err(Error::Auth(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_top_track() {
        let tracks: Vec<_> = (0..5)
            .map(|i| track(&format!("Track {i}"), &["Artist"], None, None))
            .collect();
        let spotify = FakeSpotify::top_tracks(tracks);
        for i in 0..5 {
            let track = fetch_top_track(&spotify, REFRESH_TOKEN, i)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(track.name, format!("Track {i}"));
        }
        assert_eq!(fetch_top_track(&spotify, REFRESH_TOKEN, 5).await.unwrap(), None);
        assert_eq!(fetch_top_track(&spotify, REFRESH_TOKEN, 500).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_fetch_top_track_negative_index() {
        let spotify = FakeSpotify::top_tracks(vec![track("Song", &[], None, None)]);
        assert_eq!(fetch_top_track(&spotify, REFRESH_TOKEN, -1).await.unwrap(), None);
        assert_eq!(spotify.calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_top_track_empty() {
        let spotify = FakeSpotify::default();
        assert_eq!(fetch_top_track(&spotify, REFRESH_TOKEN, 0).await.unwrap(), None);
    }
}
