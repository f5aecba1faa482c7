use crate::error::{Error, Result};
use crate::request::{Method, RequestDescriptor};
use crate::response::HttpResponse;

/// Issues one call per descriptor. There is no timeout and no retry, and
/// redirects follow reqwest's default policy.
#[derive(Clone, Debug)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new(user_agent: Option<&str>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(ua) = user_agent {
            builder = builder.user_agent(ua);
        }
        let inner = builder.build().map_err(|source| Error::Transport {
            address: String::new(),
            source,
        })?;
        Ok(Self { inner })
    }

    #[tracing::instrument(level = "debug", skip_all, fields(method = %req.method, address = %req.address))]
    pub async fn send(&self, req: &RequestDescriptor) -> Result<HttpResponse> {
        tracing::debug!("{:?}", req);

        let method = match req.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let mut builder = self.inner.request(method, req.address.as_str());
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if !req.form.is_empty() {
            builder = builder.form(&req.form);
        }
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let transport = |source: reqwest::Error| Error::Transport {
            address: req.address.clone(),
            source,
        };
        let res = builder.send().await.map_err(transport)?;

        let url = res.url().clone();
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let body = res.bytes().await.map_err(transport)?.to_vec();

        tracing::info!("{} {} -> {} ({} bytes)", req.method, url, status, body.len());

        Ok(HttpResponse {
            url,
            status,
            headers,
            body,
        })
    }
}
