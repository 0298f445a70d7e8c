use cover::HttpsImageSource;
use spotify::SpotifyClient;

pub mod adapter;
pub mod bootstrap;
pub mod config;
pub mod cover;
pub mod fetch;
pub mod handler;
pub mod render;

/// Read-only state shared by every request
pub struct AppState<S = SpotifyClient, I = HttpsImageSource> {
    pub spotify: S,
    pub images: I,
    pub refresh_token: String,
}

impl AppState {
    pub fn new(config: config::Config) -> AppState {
        AppState {
            spotify: SpotifyClient::new(config.credentials),
            images: HttpsImageSource::new(),
            refresh_token: config.refresh_token,
        }
    }
}

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
