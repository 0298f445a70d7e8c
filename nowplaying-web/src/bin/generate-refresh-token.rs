use hyper::{
    service::{make_service_fn, service_fn},
    Server,
};
use nowplaying_web::{bootstrap, config};
use spotify::SpotifyClient;
use std::{
    convert::Infallible,
    path::Path,
    sync::{Arc, Mutex},
};
use tokio::sync::oneshot;

#[tokio::main]
async fn main() {
    nowplaying_web::init_tracing();

    match config::load_env_file(config::ENV_FILE) {
        Ok(true) => tracing::info!("Using .env file to supply config environment variables"),
        Ok(false) => {}
        Err(e) => tracing::warn!("Couldn't read .env file: {}", e),
    }
    if config::require(config::REFRESH_TOKEN).is_ok() {
        tracing::info!("Spotify Refresh Token already set, skipping Generation of Refresh Token.");
        return;
    }
    let credentials = config::credentials_from_env().unwrap_or_else(|e| {
        tracing::error!("{}", e);
        std::process::exit(1);
    });

    let addr = bootstrap::callback_addr();
    let redirect_uri = Arc::new(bootstrap::redirect_uri(addr));
    let spotify = Arc::new(SpotifyClient::new(credentials.clone()));

    // The listener only lives for a single request
    let (shutdown, done) = oneshot::channel::<()>();
    let shutdown = Arc::new(Mutex::new(Some(shutdown)));
    let make_service = {
        let redirect_uri = Arc::clone(&redirect_uri);
        make_service_fn(move |_conn| {
            let spotify = Arc::clone(&spotify);
            let redirect_uri = Arc::clone(&redirect_uri);
            let shutdown = Arc::clone(&shutdown);
            async move {
                Ok::<_, Infallible>(service_fn(move |request| {
                    let spotify = Arc::clone(&spotify);
                    let redirect_uri = Arc::clone(&redirect_uri);
                    let shutdown = Arc::clone(&shutdown);
                    async move {
                        let resp = bootstrap::handle_callback(
                            &*spotify,
                            Path::new(config::ENV_FILE),
                            &redirect_uri,
                            request,
                        )
                        .await;
                        if let Some(shutdown) = shutdown.lock().ok().and_then(|mut s| s.take()) {
                            let _ = shutdown.send(());
                        }
                        Ok::<_, Infallible>(resp)
                    }
                }))
            }
        })
    };

    let server = match Server::try_bind(&addr) {
        Ok(builder) => builder.serve(make_service),
        Err(e) => {
            tracing::error!("Couldn't listen on {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    let server = server.with_graceful_shutdown(async {
        done.await.ok();
    });

    let authorize_url = credentials.authorize_url(&redirect_uri);
    tracing::info!("Authorize the app at {}", authorize_url);
    bootstrap::open_browser(&authorize_url);

    if let Err(e) = server.await {
        tracing::error!("server error: {}", e);
    }
}
