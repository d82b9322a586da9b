/// Errors surfaced by a [`RemoteApi`](crate::api::RemoteApi) implementation.
///
/// Nothing in the adapter lets these escape into the render pipeline; they
/// are logged and replaced by the documented fallback at the call site.
#[derive(Debug)]
pub enum ApiError {
    /// The remote answered with an `is_error` envelope.
    Remote {
        entity: String,
        action: String,
        message: String,
    },
    /// The transport failed before a reply was obtained.
    Transport(Box<dyn std::error::Error + Send + Sync>),
    /// The reply could not be decoded.
    Decode(String),
}

impl ApiError {
    /// Construct a `Remote` variant for the given call.
    pub fn remote(entity: &str, action: &str, message: impl Into<String>) -> Self {
        ApiError::Remote {
            entity: entity.to_string(),
            action: action.to_string(),
            message: message.into(),
        }
    }

    /// Construct a `Transport` variant from any error type.
    ///
    /// Used by client implementations to wrap their HTTP or socket errors.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        ApiError::Transport(Box::new(err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Remote {
                entity,
                action,
                message,
            } => write!(f, "Remote error in {entity}.{action}: {message}"),
            ApiError::Transport(err) => write!(f, "Transport error: {err}"),
            ApiError::Decode(msg) => write!(f, "Decode error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
