use thiserror::Error;

/// Message shown to the user when a save/export fails without a usable server message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Represents errors that can occur while editing a deck or talking to the presentation backend.
#[derive(Error, Debug)]
pub enum EditorError {
    /// Error originating from the underlying HTTP client (`reqwest`).
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Error occurred while serializing or deserializing JSON (deck, cache entry, payload).
    #[error("JSON (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// An error reported by the presentation backend itself (4xx or 5xx status code).
    #[error("API returned an error: Status {status}, Message: {}", message.as_deref().unwrap_or("<none>"))]
    Api {
        status: reqwest::StatusCode,
        message: Option<String>,
    },

    /// A command argument was out of range or otherwise unusable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A command addressed a slide, text box or image that does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A command needed a selected element but nothing is selected.
    #[error("No element is selected")]
    NoSelection,

    /// Refused to remove the only remaining slide of a deck.
    #[error("A deck must keep at least one slide")]
    LastSlide,

    /// Reading an uploaded file failed; the whole batch is discarded.
    #[error("Image upload failed: {0}")]
    Upload(String),

    /// An error related to reading environment variables.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Writing the local deck mirror failed (quota exceeded, storage disabled).
    #[error("Deck cache write failed: {0}")]
    Storage(String),
}

impl EditorError {
    /// Text for the blocking notification shown after a failed save/export.
    ///
    /// Uses the message sent by the server when one is available.
    pub fn user_message(&self) -> String {
        match self {
            EditorError::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// A type alias for `Result<T, EditorError>` for convenience within the crate.
pub type Result<T> = std::result::Result<T, EditorError>;
