//=========================================================================
// Engine Errors
//=========================================================================
//
// Configuration errors surfaced at the point of misuse.
//
// Runtime conditions (nothing under the cursor, no subscriber for a
// category, mouse idle) are never errors; they are `Option`s or no-ops.
// Everything here is a programmer/content mistake and is expected to
// abort the caller.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== EngineError =========================================================

/// Errors raised by engine configuration and lifecycle misuse.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// An asset key was requested that was never loaded.
    #[error("content '{key}' not found in dictionary '{dictionary}'")]
    ContentNotFound { dictionary: String, key: String },

    /// A content loader reported a failure.
    #[error("failed to load content '{key}': {reason}")]
    ContentLoad { key: String, reason: String },

    /// A menu scene id was referenced that does not exist.
    #[error("Invalid scene ID - {0}")]
    InvalidScene(String),

    /// Menu update/draw ran before any scene was selected.
    #[error("no active menu scene. Did you forget to call set_scene()?")]
    NoActiveScene,

    /// A collidable body was used before `enable()` was called.
    #[error("physics body of '{0}' has not been enabled")]
    BodyNotEnabled(String),

    /// `reset()` was requested while the scheduler was still running.
    #[error("cannot reset the event scheduler while it is running")]
    SchedulerRunning,

    /// Window or event loop failure.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_scene_message_names_the_scene() {
        let err = EngineError::InvalidScene("options".into());
        assert_eq!(err.to_string(), "Invalid scene ID - options");
    }

    #[test]
    fn no_active_scene_hints_at_set_scene() {
        assert!(EngineError::NoActiveScene.to_string().contains("set_scene()"));
    }

    #[test]
    fn engine_error_is_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }
}
