use crate::types::EffectView;

/// Errors that can occur when talking to SDL's haptic subsystem or decoding
/// an effect.
#[derive(Debug, thiserror::Error)]
pub enum HapticError {
    #[error("SDL2 library unavailable: {0}")]
    LibraryUnavailable(String),

    #[error("{op} failed with code {code}: {message}")]
    Sdl {
        op: &'static str,
        code: i32,
        message: String,
    },

    #[error("{op} returned null: {message}")]
    Null { op: &'static str, message: String },

    #[error("{requested} view requested but effect type is 0x{tag:04x}")]
    TypeMismatch { requested: EffectView, tag: u16 },

    #[error("Unknown effect type 0x{0:04x}")]
    UnknownEffectType(u16),

    #[error("Invalid custom samples: {0}")]
    InvalidSamples(String),

    #[error("{op}: custom effects reference raw sample memory; upload them with the unsafe *_raw calls")]
    UnverifiedSamples { op: &'static str },
}

impl HapticError {
    /// Whether the error came back from an SDL call (as opposed to the
    /// encoding or the loader).
    pub fn is_sdl(&self) -> bool {
        matches!(self, HapticError::Sdl { .. } | HapticError::Null { .. })
    }
}

/// Map an SDL status code to a `Result`. Negative codes are failures;
/// `message` is only evaluated on failure.
pub(crate) fn check_status(
    op: &'static str,
    code: i32,
    message: impl FnOnce() -> String,
) -> crate::Result<i32> {
    if code < 0 {
        Err(HapticError::Sdl {
            op,
            code,
            message: message(),
        })
    } else {
        Ok(code)
    }
}
