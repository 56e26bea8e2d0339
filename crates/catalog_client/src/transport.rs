use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::RequestFailed,
    protocol::{Fragment, FragmentRequest, HttpMethod, PayloadEncoding},
};
use tracing::debug;
use url::Url;

/// Header the catalog views use to tell fragment requests from page loads.
const REQUESTED_WITH_HEADER: &str = "x-requested-with";
const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

#[async_trait]
pub trait FragmentTransport: Send + Sync {
    async fn fetch(&self, request: &FragmentRequest) -> Result<Fragment, RequestFailed>;
}

/// Fetches fragments over HTTP, resolving request URLs against the page they belong to.
pub struct HttpFragmentTransport {
    http: Client,
    page_url: Url,
    encoding: PayloadEncoding,
}

impl HttpFragmentTransport {
    pub fn new(page_url: &str, encoding: PayloadEncoding) -> Result<Self, url::ParseError> {
        Ok(Self {
            http: Client::new(),
            page_url: Url::parse(page_url)?,
            encoding,
        })
    }

    pub fn resolve(&self, reference: &str) -> Result<Url, RequestFailed> {
        self.page_url
            .join(reference)
            .map_err(|err| RequestFailed::new(reference, format!("invalid request url: {err}")))
    }
}

#[async_trait]
impl FragmentTransport for HttpFragmentTransport {
    async fn fetch(&self, request: &FragmentRequest) -> Result<Fragment, RequestFailed> {
        let url = self.resolve(&request.url)?;
        let pairs = request.payload.form_pairs();
        let builder = match request.method {
            HttpMethod::Get => self.http.get(url.clone()).query(&pairs),
            HttpMethod::Post => match self.encoding {
                PayloadEncoding::Form => self.http.post(url.clone()).form(&pairs),
                PayloadEncoding::Json => self.http.post(url.clone()).json(&request.payload),
            },
        };
        debug!(url = %url, method = ?request.method, "requesting fragment");

        let failed = |err: reqwest::Error| RequestFailed::new(url.as_str(), err.to_string());
        let body = builder
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .send()
            .await
            .map_err(failed)?
            .error_for_status()
            .map_err(failed)?
            .text()
            .await
            .map_err(failed)?;
        Ok(Fragment::new(body))
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
