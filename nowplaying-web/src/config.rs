use nowplaying::Error;
use spotify::ClientCredentials;
use std::{
    fs,
    io::{self, ErrorKind},
    net::SocketAddr,
    path::Path,
};

pub const CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
pub const REFRESH_TOKEN: &str = "SPOTIFY_REFRESH_TOKEN";
pub const BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_FILE: &str = ".env";

#[derive(Clone, Debug)]
pub struct Config {
    pub credentials: ClientCredentials,
    pub refresh_token: String,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Config, Error> {
        let addr = match std::env::var(BIND_ADDR) {
            Ok(addr) => addr
                .parse()
                .map_err(|e| Error::Config(format!("Invalid {BIND_ADDR} {addr}: {e}")))?,
            Err(_) => SocketAddr::from(([127, 0, 0, 1], 3000)),
        };
        Ok(Config {
            credentials: credentials_from_env()?,
            refresh_token: require(REFRESH_TOKEN)?,
            addr,
        })
    }
}

pub fn credentials_from_env() -> Result<ClientCredentials, Error> {
    Ok(ClientCredentials {
        client_id: require(CLIENT_ID)?,
        client_secret: require(CLIENT_SECRET)?,
    })
}

pub fn require(key: &str) -> Result<String, Error> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::Config(format!(
            "Missing config {key}, set as environment variable or add to .env file."
        ))),
    }
}

/// Loads the env file without overriding variables that are already set.
/// Returns false when the file doesn't exist.
pub fn load_env_file(path: impl AsRef<Path>) -> Result<bool, dotenvy::Error> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(dotenvy::Error::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Appends the refresh token to the env file, creating it if needed
pub fn append_refresh_token(path: impl AsRef<Path>, refresh_token: &str) -> io::Result<()> {
    use std::io::Write;
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    write!(file, "\n{REFRESH_TOKEN}={refresh_token}")
}
