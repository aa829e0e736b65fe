use serde::{Deserialize, Serialize};

/// Unified error type for all Elestio API operations.
///
/// All variants are serializable for structured error reporting.
///
/// # Two failure layers
///
/// The API signals failure at two levels: the HTTP status code
/// ([`RequestFailed`](Self::RequestFailed)) and an application-level
/// `status: "KO"` field inside an otherwise successful response body
/// ([`Api`](Self::Api)). Both surface as distinct variants so callers can
/// tell a broken transport from a rejected operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum Error {
    /// A required credential or setting is missing or empty.
    ///
    /// Raised before any network call is made.
    Configuration {
        /// What is missing.
        detail: String,
    },

    /// A request body could not be encoded as JSON.
    Serialization {
        /// Details about the serialization failure.
        detail: String,
    },

    /// A network-level error occurred (DNS resolution failure, connection
    /// refused, etc.). Never retried; only status-code failures on GET
    /// requests are.
    Transport {
        /// Error details.
        detail: String,
    },

    /// The final HTTP status was outside `200..300`.
    RequestFailed {
        /// HTTP status code of the response.
        status: u16,
        /// Raw response body text.
        body: String,
    },

    /// A response body was not valid JSON where typed decoding was expected.
    Decode {
        /// Details about the parse failure.
        detail: String,
    },

    /// The response envelope decoded successfully but carried `status: "KO"`.
    Api {
        /// HTTP status code of the response (usually 2xx).
        status: u16,
        /// The envelope's `message` field.
        message: String,
    },

    /// A single-entity lookup returned zero results.
    ///
    /// Distinct from [`Api`](Self::Api) so callers can branch on existence.
    NotFound {
        /// Resource kind ("project", "service", ...).
        resource: String,
        /// Identifier that was looked up, when one applies.
        id: Option<String>,
    },

    /// A request parameter failed client-side validation.
    InvalidParameter {
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },
}

impl Error {
    /// Whether the error reflects expected behavior (user input, resource
    /// absence) rather than a fault, for log severity selection.
    ///
    /// `true` should log at `warn`, `false` at `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Api { .. } | Self::NotFound { .. } | Self::InvalidParameter { .. }
        )
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration { detail } => {
                write!(f, "Configuration error: {detail}")
            }
            Self::Serialization { detail } => {
                write!(f, "Serialization error: {detail}")
            }
            Self::Transport { detail } => {
                write!(f, "Network error: {detail}")
            }
            Self::RequestFailed { status, body } => {
                write!(f, "Request failed with status code {status}: {body}")
            }
            Self::Decode { detail } => {
                write!(f, "Decode error: {detail}")
            }
            Self::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            Self::NotFound { resource, id } => {
                if let Some(id) = id {
                    write!(f, "{resource} '{id}' not found")
                } else {
                    write!(f, "{resource} not found")
                }
            }
            Self::InvalidParameter { param, detail } => {
                write!(f, "Invalid parameter '{param}': {detail}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Convenience type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
