use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

/// Producer side of the queue decoded inbound events are pushed into.
pub type EventQueue = UnboundedSender<Value>;

/// A single outbound call against the khl HTTP API, relative to the requester's base url.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub route: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, route: impl Into<String>) -> Self {
        Self {
            method,
            route: route.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(route: impl Into<String>) -> Self {
        Self::new(Method::GET, route)
    }

    pub fn post(route: impl Into<String>) -> Self {
        Self::new(Method::POST, route)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Outbound half of a gateway.
#[async_trait]
pub trait Requester: Send + Sync {
    /// Issues `request` and resolves to the response payload.
    async fn request(&self, request: ApiRequest) -> Result<Value>;
}

/// Inbound half of a gateway.
///
/// `run` keeps pushing decoded events into `queue` until the connection ends, and must
/// return an error on unrecoverable failure instead of silently stopping.
#[async_trait]
pub trait Receiver: Send + Sync {
    async fn run(&self, queue: EventQueue) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::get("channel/view").query("target_id", "42");
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.route, "channel/view");
        assert_eq!(
            request.query,
            vec![("target_id".to_string(), "42".to_string())]
        );
        assert!(request.body.is_none());

        let request = ApiRequest::post("message/create").json(json!({"content": "hi"}));
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body, Some(json!({"content": "hi"})));
    }
}
