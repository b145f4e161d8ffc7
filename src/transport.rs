// HTTP transport seam
// One request in, one status code + body text out. No retries, no pooling
// guarantees exposed to callers.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub response_text: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Send(String),
    #[error("reading response body failed: {0}")]
    Body(String),
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn request(&self, url: &str, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[derive(Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    // Build reqwest client with rustls and the given timeout.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Send(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn request(&self, url: &str, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut req = match request.method {
            Method::Post => self.http.post(url),
        };
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            req = req.body(body);
        }

        let resp = req.send().await.map_err(|e| TransportError::Send(e.to_string()))?;
        let status_code = resp.status().as_u16();
        let response_text = resp.text().await.map_err(|e| TransportError::Body(e.to_string()))?;
        Ok(HttpResponse {
            status_code,
            response_text,
        })
    }
}

#[cfg(test)]
pub(crate) mod mock {
    // Scripted transport for adapter tests: replays queued responses in order
    // and records every request it receives.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub url: String,
        pub request: HttpRequest,
    }

    impl RecordedRequest {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.request
                .headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }
    }

    #[derive(Default)]
    pub struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, status_code: u16, body: &str) -> Self {
            self.responses.lock().unwrap().push_back(Ok(HttpResponse {
                status_code,
                response_text: body.to_string(),
            }));
            self
        }

        pub fn fail(self, err: TransportError) -> Self {
            self.responses.lock().unwrap().push_back(Err(err));
            self
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn request(&self, url: &str, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(RecordedRequest {
                url: url.to_string(),
                request,
            });
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Send("no scripted response left".to_string())))
        }
    }
}
