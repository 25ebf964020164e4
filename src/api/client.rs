use std::time::Duration;
use reqwest::{Client, ClientBuilder, Proxy};
use url::Url;
use super::{BackendApi, DownloadRequest, FolderChoice, HistoryEntry, ProgressSnapshot};
use crate::config::AppConfig;
use crate::errors::Result;

/// HTTP client for the download service.
///
/// Endpoint paths are absolute, so they resolve against the origin of
/// `server_url` the same way the page's `fetch('/progress')` calls do.
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let base_url = Url::parse(&config.server_url)?;

        let mut builder = ClientBuilder::new()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(concat!("media-dl-ui/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .tcp_nodelay(true);

        builder = match &config.proxy {
            Some(proxy_url) => {
                log::info!("🌐 [HTTP] Using proxy: {}", proxy_url);
                builder.proxy(Proxy::all(proxy_url)?)
            }
            // The service is local; never route it through a system proxy.
            None => builder.no_proxy(),
        };

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        log::debug!("🌐 [HTTP] GET {}", url);

        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait::async_trait]
impl BackendApi for HttpBackend {
    async fn choose_folder(&self) -> Result<FolderChoice> {
        self.get_json("/choose_folder").await
    }

    async fn submit_download(&self, request: &DownloadRequest) -> Result<u16> {
        let url = self.endpoint("/download")?;
        log::debug!("🌐 [HTTP] POST {} for {}", url, request.url);

        let response = self.client.post(url).json(request).send().await?;
        Ok(response.status().as_u16())
    }

    async fn progress(&self) -> Result<ProgressSnapshot> {
        self.get_json("/progress").await
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.get_json("/history").await
    }
}
