//! Parsing of user-supplied height lists
//!
//! This is the boundary where raw text is validated. The engine only ever
//! receives a fully numeric [`HeightSequence`].

use thiserror::Error;

use crate::engine::{Height, HeightSequence};

/// Errors for text that does not describe a height list
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// A token is not a non-negative integer that fits a bar height
    #[error("invalid height {token:?} at position {position}")]
    InvalidToken {
        /// Zero-based token position
        position: usize,
        /// Offending token, trimmed
        token: String,
    },

    /// More bars than the configured limit
    #[error("too many bars: {len} > limit {max}")]
    TooManyBars {
        /// Number of tokens found
        len: usize,
        /// Configured limit
        max: usize,
    },
}

/// Parser settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    /// Token separator
    pub separator: char,
    /// Upper bound on the number of bars
    pub max_bars: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            separator: ',',
            max_bars: 1 << 20,
        }
    }
}

impl ParseConfig {
    /// Default settings with a different separator
    pub fn with_separator(separator: char) -> Self {
        Self {
            separator,
            ..Self::default()
        }
    }
}

/// Parse `text` such as `"4, 2, 0, 3, 2, 5"` into heights
///
/// Blank text is the empty sequence. Every token must be a non-negative
/// integer; empty tokens (`"1,,2"`) are rejected.
pub fn parse_heights(text: &str, config: &ParseConfig) -> Result<HeightSequence, InputError> {
    if text.trim().is_empty() {
        return Ok(HeightSequence::default());
    }

    let tokens: Vec<&str> = if config.separator.is_whitespace() {
        text.split_whitespace().collect()
    } else {
        text.split(config.separator).map(str::trim).collect()
    };

    if tokens.len() > config.max_bars {
        return Err(InputError::TooManyBars {
            len: tokens.len(),
            max: config.max_bars,
        });
    }

    tokens
        .iter()
        .enumerate()
        .map(|(position, token)| parse_token(position, token))
        .collect::<Result<Vec<Height>, InputError>>()
        .map(HeightSequence::from)
}

fn parse_token(position: usize, token: &str) -> Result<Height, InputError> {
    let digits = token.strip_prefix('+').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::InvalidToken {
            position,
            token: token.to_string(),
        });
    }
    digits.parse().map_err(|_| InputError::InvalidToken {
        position,
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_list() {
        let heights = parse_heights("4, 2,0 ,3,2, 5", &ParseConfig::default()).unwrap();
        assert_eq!(heights.as_slice(), &[4, 2, 0, 3, 2, 5]);
    }

    #[test]
    fn blank_is_empty() {
        let heights = parse_heights("   ", &ParseConfig::default()).unwrap();
        assert!(heights.is_empty());
    }

    #[test]
    fn rejects_bad_tokens() {
        let config = ParseConfig::default();
        for (text, position, token) in [
            ("1,x,2", 1, "x"),
            ("1,,2", 1, ""),
            ("-3", 0, "-3"),
            ("2.5", 0, "2.5"),
            ("1,99999999999", 1, "99999999999"),
        ] {
            assert_eq!(
                parse_heights(text, &config),
                Err(InputError::InvalidToken {
                    position,
                    token: token.to_string(),
                }),
                "input {text:?}"
            );
        }
    }

    #[test]
    fn whitespace_separator() {
        let config = ParseConfig::with_separator(' ');
        let heights = parse_heights("3 0  0 2\t0 4", &config).unwrap();
        assert_eq!(heights.as_slice(), &[3, 0, 0, 2, 0, 4]);
    }

    #[test]
    fn enforces_limit() {
        let config = ParseConfig {
            max_bars: 2,
            ..ParseConfig::default()
        };
        assert_eq!(
            parse_heights("1,2,3", &config),
            Err(InputError::TooManyBars { len: 3, max: 2 })
        );
    }
}
