//! Typed errors for the four store operations.
//!
//! Each operation kind has its own error type carrying a message and an
//! optional underlying cause. A store's public operation always lets the
//! strategy's typed error propagate to its direct caller after emitting the
//! matching failed event; there are no retries at this layer.

use thiserror::Error;

/// A boxed error cause.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

macro_rules! op_error {
    ($name:ident, $verb:literal) => {
        #[doc = concat!("Error raised by a ", $verb, " strategy.")]
        #[derive(Debug, Error)]
        #[error("{} failed: {message}", $verb)]
        pub struct $name {
            message: String,
            #[source]
            cause: Option<Cause>,
        }

        impl $name {
            /// Create an error with a message and no underlying cause.
            pub fn new(message: impl Into<String>) -> Self {
                Self {
                    message: message.into(),
                    cause: None,
                }
            }

            /// Create an error wrapping an underlying cause.
            pub fn with_cause(message: impl Into<String>, cause: impl Into<Cause>) -> Self {
                Self {
                    message: message.into(),
                    cause: Some(cause.into()),
                }
            }

            /// Error for a store with no strategy configured for this operation.
            pub fn unsupported() -> Self {
                Self::new(concat!("store has no ", $verb, " strategy configured"))
            }

            /// The error message, without the operation prefix.
            pub fn message(&self) -> &str {
                &self.message
            }
        }
    };
}

op_error!(InsertError, "insert");
op_error!(QueryError, "query");
op_error!(UpdateError, "update");
op_error!(DeleteError, "delete");
