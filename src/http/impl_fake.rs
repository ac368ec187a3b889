use crate::http::interface::{HttpClient, HttpResponse};
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves canned responses and records every requested URL.
pub struct HttpClientFake {
    responses: Mutex<HashMap<String, Result<HttpResponse, String>>>,
    requests: Mutex<Vec<String>>,
}

impl HttpClientFake {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(&self, url: &str, status: u16, body: &[u8]) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(
                url.to_string(),
                Ok(HttpResponse {
                    status,
                    body: body.to_vec(),
                }),
            );
        }
    }

    pub fn fail(&self, url: &str, message: &str) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(url.to_string(), Err(message.to_string()));
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == url).count()
    }
}

impl HttpClient for HttpClientFake {
    fn get(&self, url: &str) -> Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>> {
        self.requests
            .lock()
            .map_err(|e| e.to_string())?
            .push(url.to_string());

        let responses = self.responses.lock().map_err(|e| e.to_string())?;
        match responses.get(url) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(message.clone().into()),
            None => Ok(HttpResponse {
                status: 404,
                body: Vec::new(),
            }),
        }
    }
}
