/// Errors from talking to the Tunely API.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// Transport failure or an undecodable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error envelope.
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}

pub type ViewerResult<T> = Result<T, ViewerError>;
