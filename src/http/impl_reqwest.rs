use crate::http::interface::{HttpClient, HttpResponse};
use crate::library::logger::interface::Logger;
use std::sync::Arc;
use std::time::Duration;

pub struct HttpClientReqwest {
    client: reqwest::blocking::Client,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl HttpClientReqwest {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        connect_timeout: Duration,
        timeout: Duration,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            logger: logger.with_namespace("http").with_namespace("reqwest"),
        })
    }
}

impl HttpClient for HttpClientReqwest {
    fn get(&self, url: &str) -> Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!("GET {}", url))?;

        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();

        self.logger
            .info(&format!("GET {} -> {} ({} bytes)", url, status, body.len()))?;

        Ok(HttpResponse { status, body })
    }
}
