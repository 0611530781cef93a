use crate::domain::ports::{ApiRequest, EventQueue, Receiver, Requester};
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Bundles the outbound requester and the inbound receiver of one client session.
///
/// A gateway owns no tasks: `run` borrows the caller's task to drive the receiver, and
/// requests are issued on whichever task awaits them. Both halves are fixed at
/// construction; domain objects share the gateway read-only through an `Arc`.
pub struct Gateway {
    requester: Box<dyn Requester>,
    receiver: Box<dyn Receiver>,
}

impl Gateway {
    pub fn new(requester: impl Requester + 'static, receiver: impl Receiver + 'static) -> Self {
        Self {
            requester: Box::new(requester),
            receiver: Box::new(receiver),
        }
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn requester(&self) -> &dyn Requester {
        self.requester.as_ref()
    }

    /// Drives the receiver against `queue` until its loop terminates.
    ///
    /// Receiver errors are returned as-is.
    pub async fn run(&self, queue: EventQueue) -> Result<()> {
        tracing::info!("Gateway receiver started");
        let result = self.receiver.run(queue).await;
        match &result {
            Ok(()) => tracing::info!("Gateway receiver finished"),
            Err(e) => tracing::warn!("Gateway receiver stopped: {}", e),
        }
        result
    }

    /// Forwards `request` to the requester.
    pub async fn exec_req(&self, request: ApiRequest) -> Result<Value> {
        tracing::debug!("{} {}", request.method, request.route);
        self.requester.request(request).await
    }

    /// Like [`Gateway::exec_req`], decoding the payload into `T`.
    pub async fn exec_req_as<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let payload = self.exec_req(request).await?;
        Ok(serde_json::from_value(payload)?)
    }
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway").finish_non_exhaustive()
    }
}
