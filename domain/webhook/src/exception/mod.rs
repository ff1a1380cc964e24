use crate::model::vo::WebHookEventType;

pub type WebHookResult<T> = Result<T, WebHookException>;

#[derive(Debug, thiserror::Error)]
pub enum WebHookException {
    #[error("invalid webhook event: {source}")]
    InvalidEvent {
        #[source]
        source: serde_json::Error,
    },

    #[error("no executor registered for event type {event_type}")]
    UnknownEventType { event_type: WebHookEventType },

    #[error("executor of {event_type} timed out after {seconds}s")]
    Timeout { event_type: WebHookEventType, seconds: u64 },

    #[error("webhook internal error: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl WebHookException {
    /// HTTP-like status code of the failure.
    pub fn status(&self) -> u16 {
        match self {
            WebHookException::InvalidEvent { .. } => 400,
            WebHookException::UnknownEventType { .. } => 400,
            WebHookException::Timeout { .. } => 504,
            WebHookException::InternalError { .. } => 500,
        }
    }
}

impl From<anyhow::Error> for WebHookException {
    fn from(e: anyhow::Error) -> Self {
        WebHookException::InternalError { source: e }
    }
}

impl From<serde_json::Error> for WebHookException {
    fn from(e: serde_json::Error) -> Self {
        WebHookException::InvalidEvent { source: e }
    }
}
