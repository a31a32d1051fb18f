// src/validation/brief.rs

use crate::error::ClientError;

/// User-supplied project description. Never blank once constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Brief(String);

impl Brief {
    /// Rejects input that is empty after trimming. The text itself is kept
    /// as typed; the service receives exactly what the user wrote.
    pub fn parse(input: &str) -> Result<Self, ClientError> {
        if input.trim().is_empty() {
            return Err(ClientError::Validation);
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_rejected() {
        for input in ["", " ", "\t\n", "   \r\n  "] {
            assert_eq!(Brief::parse(input), Err(ClientError::Validation), "{input:?}");
        }
    }

    #[test]
    fn text_is_kept_untrimmed() {
        let brief = Brief::parse("  movie review app ").unwrap();
        assert_eq!(brief.as_str(), "  movie review app ");
    }
}
