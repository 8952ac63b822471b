// src/error.rs
//
// Failure taxonomy for a single computation.
//
// Every variant is terminal for the computation that raised it: the
// session replaces whatever was displayed with the error text and waits
// for the user to re-trigger. Nothing is retried, and errors are never
// shown next to partial results.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// Fewer than two strings parsed to a played fret. Detected locally;
    /// the theory engine is never called.
    #[error("Necesitas al menos 2 cuerdas tocadas")]
    NotEnoughPlayedStrings,

    /// The engine returned a result carrying a structured `error` field,
    /// e.g. "no voicings found".
    #[error("{0}")]
    EngineReported(String),

    /// The engine raised unexpectedly. The message is passed through
    /// verbatim.
    #[error("{0}")]
    EngineFault(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        assert_eq!(
            ToolError::NotEnoughPlayedStrings.to_string(),
            "Necesitas al menos 2 cuerdas tocadas"
        );
    }

    #[test]
    fn test_engine_messages_pass_through_verbatim() {
        assert_eq!(
            ToolError::EngineReported("No se encontraron digitaciones".into()).to_string(),
            "No se encontraron digitaciones"
        );
        assert_eq!(
            ToolError::EngineFault("unexpected token".into()).to_string(),
            "unexpected token"
        );
    }
}
