use hyper::{
    service::{make_service_fn, service_fn},
    Server,
};
use nowplaying_web::{
    adapter,
    config::{self, Config},
    AppState,
};
use std::{convert::Infallible, sync::Arc};

/// Serves the badges through `adapter::fetch` on a bare hyper server
#[tokio::main]
async fn main() {
    nowplaying_web::init_tracing();

    if let Err(e) = config::load_env_file(config::ENV_FILE) {
        tracing::warn!("Couldn't read .env file: {}", e);
    }
    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::error!("{}", e);
        std::process::exit(1);
    });

    let addr = config.addr;
    let state = Arc::new(AppState::new(config));
    let make_service = make_service_fn(move |_conn| {
        let state = Arc::clone(&state);
        async move {
            Ok::<_, Infallible>(service_fn(move |request| {
                let state = Arc::clone(&state);
                async move { Ok::<_, Infallible>(adapter::fetch(&state, request).await) }
            }))
        }
    });

    tracing::info!("worker listening on {}", addr);
    if let Err(e) = Server::bind(&addr).serve(make_service).await {
        tracing::error!("server error: {}", e);
    }
}
