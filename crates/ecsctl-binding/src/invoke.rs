//! Transport invocation.

use crate::cancel::StopSignal;
use crate::error::{InvokeError, TransportError};
use async_trait::async_trait;

/// Sends one serialized request to the remote service.
///
/// Implementations carry their own explicit configuration (credentials,
/// region, endpoint); nothing is read from process-wide state at call time.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Endpoint requests are sent to, for diagnostics.
    fn endpoint(&self) -> String;

    /// Send `body` as `operation` and return the raw response body.
    async fn send(&self, operation: &str, body: String) -> Result<String, TransportError>;
}

/// Invoke `operation` once. No retries.
///
/// If `stop` fires before the transport answers, the pending call is dropped
/// and [`InvokeError::Cancelled`] is returned. Name-resolution failures get a
/// clearer message; every other failure passes through unchanged.
pub async fn invoke(
    transport: &dyn Transport,
    operation: &str,
    body: String,
    stop: &StopSignal,
) -> Result<String, InvokeError> {
    let cancelled = || InvokeError::Cancelled {
        operation: operation.to_string(),
    };
    if stop.is_stopped() {
        return Err(cancelled());
    }

    tracing::debug!(operation, endpoint = %transport.endpoint(), bytes = body.len(), "invoking");

    tokio::select! {
        biased;
        _ = stop.stopped() => {
            tracing::warn!(operation, "call cancelled before the service answered");
            Err(cancelled())
        }
        result = transport.send(operation, body) => match result {
            Ok(raw) => Ok(raw),
            Err(TransportError::NameResolution { endpoint, source }) => {
                Err(InvokeError::NameResolution { endpoint, source })
            }
            Err(TransportError::Remote(source)) => Err(InvokeError::Remote(source)),
        },
    }
}
