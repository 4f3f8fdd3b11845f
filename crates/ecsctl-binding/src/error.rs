//! Error types for binding and invocation.

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Raised while binding parameters, resolving the selector or assembling the
/// request. Always raised before any remote call.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("{command}: no parameter named '{name}'")]
    UnknownParameter { command: String, name: String },

    #[error("{param}: expected {expected}, got '{value}'")]
    InvalidValue {
        param: String,
        expected: String,
        value: String,
    },

    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("--pass-thru cannot be combined with --select")]
    ConflictingSelectors,

    #[error("{param}: malformed value")]
    MalformedStruct {
        param: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure reported by a [`Transport`](crate::invoke::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint host could not be resolved.
    #[error("could not resolve {endpoint}")]
    NameResolution {
        endpoint: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Remote(BoxError),
}

/// Failure of the remote call itself.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error(
        "Name resolution failure attempting to reach service endpoint '{endpoint}'. \
         Check the region and endpoint settings for this command and that the host is reachable."
    )]
    NameResolution {
        endpoint: String,
        #[source]
        source: BoxError,
    },

    #[error("{operation} was cancelled")]
    Cancelled { operation: String },

    #[error(transparent)]
    Remote(BoxError),

    #[error("failed to encode {operation} request")]
    Encode {
        operation: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode {operation} response")]
    Decode {
        operation: String,
        #[source]
        source: serde_json::Error,
    },
}

impl InvokeError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Any failure of one command invocation.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Invoke(#[from] InvokeError),
}

impl CommandError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Invoke(e) if e.is_cancelled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn name_resolution_message_names_endpoint_and_keeps_source() {
        let original: BoxError = "dns error: failed to lookup address information".into();
        let err = InvokeError::NameResolution {
            endpoint: "https://ecs.mars-1.amazonaws.com".into(),
            source: original,
        };
        assert!(err.to_string().contains("https://ecs.mars-1.amazonaws.com"));
        assert!(err
            .source()
            .unwrap()
            .to_string()
            .contains("failed to lookup address"));
    }

    #[test]
    fn remote_is_transparent() {
        let err = InvokeError::Remote("AWS ecs error [ClusterNotFoundException]".into());
        assert_eq!(err.to_string(), "AWS ecs error [ClusterNotFoundException]");
    }

    #[test]
    fn command_error_cancelled() {
        let err: CommandError = InvokeError::Cancelled {
            operation: "CreateService".into(),
        }
        .into();
        assert!(err.is_cancelled());
        let bind: CommandError = BindError::ConflictingSelectors.into();
        assert!(!bind.is_cancelled());
    }
}
