use async_trait::async_trait;
use base64::prelude::{Engine, BASE64_STANDARD};
use hyper::{body::Bytes, client::HttpConnector, Body, Client, Method, Request, StatusCode, Uri};
use hyper_tls::HttpsConnector;
use nowplaying::{
    spotify::{CurrentlyPlaying, TopTracksPage},
    Error,
};
use serde::{Deserialize, Serialize};

pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
const API_URL: &str = "https://api.spotify.com/v1";

/// Scopes needed by the badges
pub const SCOPES: [&str; 3] = [
    "user-read-playback-state",
    "user-read-currently-playing",
    "user-top-read",
];

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
    pub refresh_token: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn basic_auth(&self) -> String {
        format!(
            "Basic {}",
            BASE64_STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret))
        )
    }

    pub fn authorize_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}?client_id={}&response_type=code&redirect_uri={}&scope={}",
            AUTHORIZE_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&SCOPES.join(" "))
        )
    }
}

#[async_trait]
pub trait Spotify: Send + Sync {
    /// Exchanges an authorization code for a token pair
    async fn get_token(&self, code: &str, redirect_uri: &str) -> Result<Token, Error>;
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<Token, Error>;
    /// `None` when there is no active playback session
    async fn get_currently_playing(&self, token: &Token)
        -> Result<Option<CurrentlyPlaying>, Error>;
    async fn get_top_tracks(&self, token: &Token, limit: u32) -> Result<TopTracksPage, Error>;
}

#[derive(Clone)]
pub struct SpotifyClient {
    client: Client<HttpsConnector<HttpConnector>>,
    credentials: ClientCredentials,
}

impl SpotifyClient {
    pub fn new(credentials: ClientCredentials) -> SpotifyClient {
        let https = HttpsConnector::new();
        SpotifyClient {
            client: Client::builder().build::<_, hyper::Body>(https),
            credentials,
        }
    }

    async fn request_token(&self, body: String) -> Result<Token, Error> {
        let uri: Uri = TOKEN_URL.parse().unwrap();
        let resp = self
            .client
            .request(
                Request::builder()
                    .method(Method::POST)
                    .uri(uri)
                    .header("Authorization", self.credentials.basic_auth())
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(Body::from(body))?,
            )
            .await?;
        let status = resp.status();
        let got = hyper::body::to_bytes(resp.into_body()).await?;
        if !status.is_success() {
            // Keep the upstream JSON error so callers can pass it through
            return Err(Error::auth_error(body_text(&got)));
        }
        Ok(serde_json::from_slice(&got)?)
    }

    async fn get(&self, uri: Uri, token: &Token) -> Result<(StatusCode, Bytes), Error> {
        let resp = self
            .client
            .request(
                Request::builder()
                    .uri(uri)
                    .header("Authorization", format!("Bearer {}", token.access_token))
                    .body(Body::empty())?,
            )
            .await?;
        let status = resp.status();
        let got = hyper::body::to_bytes(resp.into_body()).await?;
        check_status(status, &got)?;
        Ok((status, got))
    }
}

#[async_trait]
impl Spotify for SpotifyClient {
    async fn get_token(&self, code: &str, redirect_uri: &str) -> Result<Token, Error> {
        self.request_token(format!(
            "grant_type=authorization_code&code={}&redirect_uri={}",
            urlencoding::encode(code),
            urlencoding::encode(redirect_uri)
        ))
        .await
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<Token, Error> {
        self.request_token(format!(
            "grant_type=refresh_token&refresh_token={}",
            urlencoding::encode(refresh_token)
        ))
        .await
    }

    async fn get_currently_playing(
        &self,
        token: &Token,
    ) -> Result<Option<CurrentlyPlaying>, Error> {
        let uri: Uri = format!("{API_URL}/me/player/currently-playing")
            .parse()
            .unwrap();
        let (status, got) = self.get(uri, token).await?;
        currently_playing(status, &got)
    }

    async fn get_top_tracks(&self, token: &Token, limit: u32) -> Result<TopTracksPage, Error> {
        let uri: Uri = format!("{API_URL}/me/top/tracks?limit={limit}")
            .parse()
            .unwrap();
        let (_, got) = self.get(uri, token).await?;
        Ok(serde_json::from_slice(&got)?)
    }
}

/// Any non-2xx answer, redirects included, is an upstream failure
fn check_status(status: StatusCode, got: &[u8]) -> Result<(), Error> {
    if !status.is_success() {
        let error = format!("Spotify API error {}: {}", status, body_text(got));
        return Err(Error::fetch_error(error));
    }
    Ok(())
}

fn currently_playing(status: StatusCode, got: &[u8]) -> Result<Option<CurrentlyPlaying>, Error> {
    if status == StatusCode::NO_CONTENT || got.is_empty() {
        tracing::debug!("no active playback session");
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(got)?))
}

fn body_text(got: &[u8]) -> String {
    String::from_utf8(got.to_vec())
        .unwrap_or_else(|_| "Spotify response should be UTF-8".to_owned())
}
