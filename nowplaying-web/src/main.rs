use nowplaying_web::{
    adapter,
    config::{self, Config},
    AppState,
};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    nowplaying_web::init_tracing();

    match config::load_env_file(config::ENV_FILE) {
        Ok(true) => tracing::info!("Using .env file to supply config environment variables"),
        Ok(false) => {}
        Err(e) => tracing::warn!("Couldn't read .env file: {}", e),
    }
    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::error!("{}", e);
        std::process::exit(1);
    });

    let addr = config.addr;
    let app = adapter::router(Arc::new(AppState::new(config)));

    tracing::info!("listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
