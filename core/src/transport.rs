//! Executing built requests over the network.
//!
//! # Design
//! The client never performs I/O itself; `StatsClient::call` hands the
//! built `HttpRequest` to a `Transport`. `UreqTransport` is the blocking
//! production implementation. Any `Fn(&HttpRequest) -> Result<HttpResponse,
//! ApiError>` is also a transport, which keeps tests free of sockets.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Upper bound on response bodies read by `UreqTransport`. Live game feeds
/// run to several megabytes.
const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

const DEFAULT_USER_AGENT: &str = concat!("statsapi-core/", env!("CARGO_PKG_VERSION"));

/// Executes a single GET round trip.
pub trait Transport {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError>,
{
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self(request)
    }
}

/// Options applied by the transport to every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransportOptions {
    /// Overall per-request timeout. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    /// Extra headers sent with every request.
    pub headers: BTreeMap<String, String>,
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    headers: Vec<(String, String)>,
}

impl UreqTransport {
    pub fn new(options: &TransportOptions) -> Self {
        // Status interpretation belongs to the client, so 4xx/5xx come back
        // as data.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(options.timeout_secs.map(Duration::from_secs))
            .build()
            .new_agent();

        let user_agent = options
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let mut headers = vec![
            ("user-agent".to_string(), user_agent),
            ("accept".to_string(), "application/json".to_string()),
        ];
        headers.extend(options.headers.iter().map(|(k, v)| (k.clone(), v.clone())));

        Self { agent, headers }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&TransportOptions::default())
    }
}

impl Transport for UreqTransport {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let transport_error = |message: String| ApiError::Transport {
            url: request.url.clone(),
            message,
        };

        let mut builder = self.agent.get(&request.url);
        for (name, value) in self.headers.iter().chain(&request.headers) {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let mut response = builder.call().map_err(|e| transport_error(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_string()
            .map_err(|e| transport_error(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_deserialize_with_defaults() {
        let options: TransportOptions = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
        assert_eq!(options.timeout_secs, Some(5));
        assert!(options.user_agent.is_none());
        assert!(options.headers.is_empty());
    }

    #[test]
    fn closures_are_transports() {
        let transport = |request: &HttpRequest| {
            Ok::<_, ApiError>(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: format!(r#"{{"url": "{}"}}"#, request.url),
            })
        };
        let request = HttpRequest {
            endpoint: "sports".to_string(),
            url: "http://x/api/v1/sports".to_string(),
            headers: Vec::new(),
        };
        let response = transport.get(&request).unwrap();
        assert_eq!(response.body, r#"{"url": "http://x/api/v1/sports"}"#);
    }

    #[test]
    fn user_agent_and_extra_headers_are_configured() {
        let mut extra = BTreeMap::new();
        extra.insert("x-trace".to_string(), "abc".to_string());
        let transport = UreqTransport::new(&TransportOptions {
            timeout_secs: Some(3),
            user_agent: Some("tester/1".to_string()),
            headers: extra,
        });
        assert!(transport
            .headers
            .contains(&("user-agent".to_string(), "tester/1".to_string())));
        assert!(transport
            .headers
            .contains(&("x-trace".to_string(), "abc".to_string())));
    }

    #[test]
    fn connection_refused_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let request = HttpRequest {
            endpoint: "sports".to_string(),
            url: format!("http://{addr}/api/v1/sports"),
            headers: Vec::new(),
        };
        let err = UreqTransport::default().get(&request).unwrap_err();
        assert!(matches!(err, ApiError::Transport { ref url, .. } if url == &request.url));
    }
}
