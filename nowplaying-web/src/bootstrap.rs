use crate::config;
use hyper::{header, Body, Request, Response, StatusCode};
use nowplaying::Error;
use spotify::Spotify;
use std::{net::SocketAddr, path::Path};

pub const CALLBACK_PATH: &str = "/callback";

pub fn callback_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

pub fn redirect_uri(addr: SocketAddr) -> String {
    format!("http://{addr}{CALLBACK_PATH}")
}

/// Handles the single request the bootstrap listener accepts
pub async fn handle_callback(
    spotify: &impl Spotify,
    env_file: &Path,
    redirect_uri: &str,
    request: Request<Body>,
) -> Response<Body> {
    if request.uri().path() != CALLBACK_PATH {
        return respond(StatusCode::NOT_FOUND, None, Body::empty());
    }
    let query = request.uri().query().unwrap_or_default();
    let code = url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty());
    let Some(code) = code else {
        return respond(StatusCode::BAD_REQUEST, None, Body::from("Missing ?code="));
    };

    match exchange(spotify, env_file, redirect_uri, &code).await {
        Ok(body) => respond(StatusCode::OK, Some(JSON), Body::from(body)),
        // Pass the upstream JSON error through
        Err(Error::Auth(body)) => {
            tracing::error!("Error retrieving access token: {}", body);
            respond(StatusCode::BAD_GATEWAY, Some(JSON), Body::from(body))
        }
        Err(e) => {
            tracing::error!("{}", e);
            respond(StatusCode::INTERNAL_SERVER_ERROR, None, Body::from(e.to_string()))
        }
    }
}

const JSON: &str = "application/json; charset=utf-8";

async fn exchange(
    spotify: &impl Spotify,
    env_file: &Path,
    redirect_uri: &str,
    code: &str,
) -> Result<String, Error> {
    let token = spotify.get_token(code, redirect_uri).await?;
    if let Some(refresh_token) = &token.refresh_token {
        config::append_refresh_token(env_file, refresh_token)?;
        tracing::info!("Refresh Token added to {}", env_file.display());
    }
    Ok(serde_json::to_string_pretty(&token)?)
}

fn respond(status: StatusCode, content_type: Option<&'static str>, body: Body) -> Response<Body> {
    let mut resp = Response::new(body);
    *resp.status_mut() = status;
    if let Some(content_type) = content_type {
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static(content_type),
        );
    }
    resp
}

/// Best effort, the URL is logged as well
pub fn open_browser(url: &str) {
    if let Err(e) = webbrowser::open(url) {
        tracing::warn!("Couldn't open a browser: {}", e);
    }
}
