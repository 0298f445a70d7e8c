use async_trait::async_trait;
use base64::prelude::{Engine, BASE64_STANDARD};
use hyper::{body::Bytes, client::HttpConnector, Body, Client, Request, StatusCode, Uri};
use hyper_tls::HttpsConnector;
use nowplaying::Error;

#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn get_image(&self, url: &str) -> Result<Bytes, Error>;
}

#[derive(Clone)]
pub struct HttpsImageSource {
    client: Client<HttpsConnector<HttpConnector>>,
}

impl HttpsImageSource {
    pub fn new() -> HttpsImageSource {
        let https = HttpsConnector::new();
        HttpsImageSource {
            client: Client::builder().build::<_, hyper::Body>(https),
        }
    }
}

impl Default for HttpsImageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageSource for HttpsImageSource {
    async fn get_image(&self, url: &str) -> Result<Bytes, Error> {
        let uri: Uri = url
            .parse()
            .map_err(|e| Error::fetch_error(format!("Invalid cover url {url}: {e}")))?;
        let resp = self
            .client
            .request(Request::builder().uri(uri).body(Body::empty())?)
            .await?;
        check_status(url, resp.status())?;
        Ok(hyper::body::to_bytes(resp.into_body()).await?)
    }
}

fn check_status(url: &str, status: StatusCode) -> Result<(), Error> {
    if !status.is_success() {
        return Err(Error::fetch_error(format!(
            "Cover fetch {url} failed with {status}"
        )));
    }
    Ok(())
}

/// Fetches the cover and embeds it as a data URI so the badge has no external references
pub async fn inline(images: &impl ImageSource, url: Option<&str>) -> Result<Option<String>, Error> {
    let Some(url) = url else {
        return Ok(None);
    };
    let got = images.get_image(url).await?;
    Ok(Some(data_uri(&got)))
}

pub fn data_uri(bytes: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", BASE64_STANDARD.encode(bytes))
}
