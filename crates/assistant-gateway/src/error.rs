use openai_client::OpenAIError;
use thiserror::Error;

/// OpenAI reports both 400 and 404 rejections with this error type.
const INVALID_REQUEST_ERROR: &str = "invalid_request_error";

/// 404 bodies name the missing resource: "No thread found with id 'thread_x'."
fn is_missing_resource(message: &str) -> bool {
    message.starts_with("No ") && message.contains(" found")
}

#[derive(Error, Debug)]
pub enum GatewayError {
    /// The API rejected the request itself (HTTP 400), e.g. a message sent while a run is active.
    /// Missing threads, runs or assistants are [`GatewayError::NotFound`] instead.
    #[error("assistant API rejected the request: {0}")]
    BadRequest(String),

    /// The thread, run or assistant named in the request does not exist (HTTP 404).
    #[error("assistant API resource not found: {0}")]
    NotFound(String),

    #[error("assistant API call failed: {0}")]
    Remote(String),

    /// The request could not be built locally.
    #[error("invalid assistant request: {0}")]
    Build(String),
}

impl GatewayError {
    pub fn is_bad_request(&self) -> bool {
        matches!(self, GatewayError::BadRequest(_))
    }
}

impl From<OpenAIError> for GatewayError {
    fn from(err: OpenAIError) -> Self {
        match err {
            OpenAIError::ApiError(api) if api.r#type.as_deref() == Some(INVALID_REQUEST_ERROR) => {
                if is_missing_resource(&api.message) {
                    GatewayError::NotFound(api.message)
                } else {
                    GatewayError::BadRequest(api.message)
                }
            }
            OpenAIError::InvalidArgument(msg) => GatewayError::Build(msg),
            other => GatewayError::Remote(other.to_string()),
        }
    }
}
