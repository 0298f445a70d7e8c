use crate::{
    cover::ImageSource,
    handler::{self, Params, Reply},
    AppState,
};
use axum::{
    extract::{RawQuery, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{Body, Method, Request, StatusCode};
use nowplaying::Error;
use spotify::Spotify;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

pub trait Respond {
    fn respond(reply: Result<Reply, Error>) -> Self;
}

fn error_status(e: Error) -> StatusCode {
    let status = e.status_code();
    if status.is_server_error() {
        tracing::error!("server error: {}", e);
    }
    status
}

impl Respond for axum::response::Response {
    fn respond(reply: Result<Reply, Error>) -> Self {
        match reply {
            Ok(Reply::Svg {
                body,
                cache_control,
            }) => (
                [
                    (header::CONTENT_TYPE, SVG_CONTENT_TYPE),
                    (header::CACHE_CONTROL, cache_control),
                ],
                body,
            )
                .into_response(),
            Ok(Reply::Redirect(location)) => {
                (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
            }
            Ok(Reply::Empty(status)) => status.into_response(),
            Err(e) => error_status(e).into_response(),
        }
    }
}

impl Respond for hyper::Response<Body> {
    fn respond(reply: Result<Reply, Error>) -> Self {
        let builder = hyper::Response::builder();
        let resp = match reply {
            Ok(Reply::Svg {
                body,
                cache_control,
            }) => builder
                .header(header::CONTENT_TYPE, SVG_CONTENT_TYPE)
                .header(header::CACHE_CONTROL, cache_control)
                .body(Body::from(body)),
            Ok(Reply::Redirect(location)) => builder
                .status(StatusCode::FOUND)
                .header(header::LOCATION, location)
                .body(Body::empty()),
            Ok(Reply::Empty(status)) => builder.status(status).body(Body::empty()),
            Err(e) => builder.status(error_status(e)).body(Body::empty()),
        };
        resp.unwrap_or_else(|e| {
            tracing::error!("couldn't build response: {}", e);
            let mut resp = hyper::Response::new(Body::empty());
            *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            resp
        })
    }
}

pub fn router<S, I>(state: Arc<AppState<S, I>>) -> Router
where
    S: Spotify + 'static,
    I: ImageSource + 'static,
{
    Router::new()
        .route("/now-playing", get(now_playing_handler::<S, I>))
        .route("/top-tracks", get(top_tracks_handler::<S, I>))
        // Paths used by the serverless deployment
        .route("/api/now-playing", get(now_playing_handler::<S, I>))
        .route("/api/top-tracks", get(top_tracks_handler::<S, I>))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn now_playing_handler<S: Spotify, I: ImageSource>(
    State(state): State<Arc<AppState<S, I>>>,
    RawQuery(query): RawQuery,
) -> axum::response::Response {
    let params = Params::parse(query.as_deref());
    Respond::respond(handler::now_playing(&state, &params).await)
}

async fn top_tracks_handler<S: Spotify, I: ImageSource>(
    State(state): State<Arc<AppState<S, I>>>,
    RawQuery(query): RawQuery,
) -> axum::response::Response {
    let params = Params::parse(query.as_deref());
    Respond::respond(handler::top_tracks(&state, &params).await)
}

/// Single entry point for hosts that hand over raw requests
pub async fn fetch<S: Spotify, I: ImageSource>(
    state: &AppState<S, I>,
    request: Request<Body>,
) -> hyper::Response<Body> {
    let params = Params::parse(request.uri().query());
    let reply = match (request.method(), request.uri().path()) {
        (&Method::GET, "/now-playing" | "/api/now-playing") => {
            handler::now_playing(state, &params).await
        }
        (&Method::GET, "/top-tracks" | "/api/top-tracks") => {
            handler::top_tracks(state, &params).await
        }
        _ => Ok(Reply::Empty(StatusCode::NOT_FOUND)),
    };
    Respond::respond(reply)
}
