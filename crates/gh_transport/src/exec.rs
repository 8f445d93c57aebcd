use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use http::{Request, Response};

/// Executes a fully built request and buffers the response body.
#[async_trait]
pub trait HttpExec: Send + Sync {
    async fn execute(&self, req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>>;
}

pub struct ReqwestExecutor {
    client: reqwest::Client,
}

impl ReqwestExecutor {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpExec for ReqwestExecutor {
    async fn execute(&self, req: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let (parts, body) = req.into_parts();
        let mut builder = self.client.request(parts.method, parts.uri.to_string());
        builder = builder.headers(parts.headers);
        let resp = builder.body(body).send().await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.bytes().await?;
        let mut response = Response::builder().status(status).body(bytes.to_vec())?;
        *response.headers_mut() = headers;
        Ok(response)
    }
}
