// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// NO tiene lógica de negocio ni de fallback: envía la petición y devuelve
// status + content-type + cuerpo crudo. La clasificación vive en `fallback`.
// ============================================================================

use futures::future::{self, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::CONFIG;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// POST/PUT llevan cuerpo JSON
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(format!("Método HTTP no soportado: {}", other)),
        }
    }
}

/// Operación lógica: método + ruta + payload opcional
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub payload: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            payload,
        }
    }
}

/// Respuesta cruda del backend (cualquier status)
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl RemoteResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fallos de transporte (no hubo respuesta HTTP)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out after {0}s")]
    Timeout(u32),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Colaborador remoto abstracto (REST)
#[allow(async_fn_in_trait)]
pub trait RemoteEndpoint {
    async fn send(&self, request: &ApiRequest) -> Result<RemoteResponse, RemoteError>;
}

/// Cliente API - SOLO comunicación HTTP (stateless)
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    timeout_seconds: u32,
}

impl ApiClient {
    pub fn new() -> Self {
        Self::with_base_url(CONFIG.backend_url(), CONFIG.network_timeout_seconds)
    }

    pub fn with_base_url(base_url: &str, timeout_seconds: u32) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_seconds,
        }
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn send_once(&self, request: &ApiRequest) -> Result<RemoteResponse, RemoteError> {
        let url = self.url_for(&request.path);
        let builder = match request.method {
            HttpMethod::Get => Request::get(&url),
            HttpMethod::Post => Request::post(&url),
            HttpMethod::Put => Request::put(&url),
            HttpMethod::Delete => Request::delete(&url),
        };

        let response = match (&request.payload, request.method.has_body()) {
            (Some(payload), true) => builder
                .json(payload)
                .map_err(|e| RemoteError::Serialization(e.to_string()))?
                .send()
                .await,
            _ => builder.send().await,
        }
        .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        let content_type = response.headers().get("content-type");
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Ok(RemoteResponse {
            status,
            content_type,
            body,
        })
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteEndpoint for ApiClient {
    async fn send(&self, request: &ApiRequest) -> Result<RemoteResponse, RemoteError> {
        log::info!("🌐 {} {}", request.method, request.path);

        let timeout = Box::pin(TimeoutFuture::new(self.timeout_seconds.saturating_mul(1000)));
        let send = Box::pin(self.send_once(request));

        match future::select(send, timeout).await {
            Either::Left((result, _)) => result,
            Either::Right(_) => {
                log::warn!("⏱️ Timeout en {} {} ({}s)", request.method, request.path, self.timeout_seconds);
                Err(RemoteError::Timeout(self.timeout_seconds))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing_is_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>(), Ok(HttpMethod::Get));
        assert_eq!(" Delete ".parse::<HttpMethod>(), Ok(HttpMethod::Delete));
        assert!("PATCH".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_url_joining() {
        let client = ApiClient::with_base_url("http://localhost:5000/", 5);
        assert_eq!(client.url_for("/api/users"), "http://localhost:5000/api/users");
        assert_eq!(client.url_for("api/users"), "http://localhost:5000/api/users");
    }

    #[test]
    fn test_success_range() {
        let mut response = RemoteResponse {
            status: 204,
            content_type: None,
            body: String::new(),
        };
        assert!(response.is_success());
        response.status = 503;
        assert!(!response.is_success());
    }
}
