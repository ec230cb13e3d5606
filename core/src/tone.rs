//! Tone selection for style transformation requests
//!
//! A fixed set of tones the user may ask the engine to rewrite in.
//! `None` means no transformation; the value is passed through to the
//! engine unmodified.

use serde::{Deserialize, Serialize};

/// Writing tone for the optional style transformation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Casual,
    Professional,
    Friendly,
    Academic,
    Humorous,
}

impl Tone {
    /// All selectable tones, in display order
    pub fn all() -> &'static [Tone] {
        &[
            Tone::Formal,
            Tone::Casual,
            Tone::Professional,
            Tone::Friendly,
            Tone::Academic,
            Tone::Humorous,
        ]
    }

    /// Lowercase name as used on the CLI and in config files
    pub fn name(&self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Casual => "casual",
            Tone::Professional => "professional",
            Tone::Friendly => "friendly",
            Tone::Academic => "academic",
            Tone::Humorous => "humorous",
        }
    }
}

impl std::str::FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "formal" => Ok(Tone::Formal),
            "casual" => Ok(Tone::Casual),
            "professional" => Ok(Tone::Professional),
            "friendly" => Ok(Tone::Friendly),
            "academic" => Ok(Tone::Academic),
            "humorous" | "funny" => Ok(Tone::Humorous),
            _ => Err(format!("Unknown tone: {}", s)),
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_tone_parsing() {
        assert_eq!(Tone::from_str("formal").unwrap(), Tone::Formal);
        assert_eq!(Tone::from_str("CASUAL").unwrap(), Tone::Casual);
        assert_eq!(Tone::from_str("funny").unwrap(), Tone::Humorous);
        assert!(Tone::from_str("sarcastic").is_err());
    }

    #[test]
    fn test_tone_round_trip() {
        for tone in Tone::all() {
            assert_eq!(&Tone::from_str(tone.name()).unwrap(), tone);
        }
    }
}
