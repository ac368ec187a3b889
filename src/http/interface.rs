#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait HttpClient {
    /// Transport failures are errors; any HTTP status is a response.
    fn get(&self, url: &str) -> Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>>;
}
