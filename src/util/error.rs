//! Error type for the renderer.

use thiserror::Error;

/// Main error type for scene loading, asset loading and rendering.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error opening, reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in a scene file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bitmap texture could not be decoded.
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    /// Semantically invalid scene: missing/ill-typed field, unknown texture
    /// reference, unsupported channel count, out-of-range index. Scene
    /// construction is aborted wholesale; there is no partial scene.
    #[error("invalid scene: {0}")]
    Scene(String),
}

impl Error {
    /// Build a [`Error::Scene`] from any displayable message.
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }
}

/// Result type alias for renderer operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::scene("missing field `camera`");
        assert!(e.to_string().contains("camera"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
