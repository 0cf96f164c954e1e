use crate::error::{Result, ScrubError};
use regex::Regex;
use std::fmt;

/// What a removal pass looks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Any run of characters carrying the hidden attribute.
    HiddenRun,
    /// Shortest span from `open` to the next `close`, delimiters included.
    BracketFragment { open: char, close: char },
}

impl Pattern {
    pub fn bracket(open: char, close: char) -> Result<Self> {
        if open == close {
            return Err(ScrubError::InvalidPatternConfig(format!(
                "delimiters must differ, got '{open}' twice"
            )));
        }
        Ok(Pattern::BracketFragment { open, close })
    }

    /// Parse a delimiter pair such as `"{}"`.
    pub fn from_delimiters(delims: &str) -> Result<Self> {
        let mut chars = delims.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(open), Some(close), None) => Self::bracket(open, close),
            _ => Err(ScrubError::InvalidPatternConfig(format!(
                "expected exactly 2 delimiter characters, got {:?}",
                delims
            ))),
        }
    }

    pub fn match_rule(&self) -> Result<MatchRule> {
        match self {
            Pattern::HiddenRun => Ok(MatchRule::Hidden),
            Pattern::BracketFragment { open, close } => {
                let escaped_open = regex::escape(&open.to_string());
                let escaped_close = regex::escape(&close.to_string());
                let regex_str = format!("(?s){escaped_open}.*?{escaped_close}");

                match Regex::new(&regex_str) {
                    Ok(regex) => Ok(MatchRule::Wildcard(regex)),
                    Err(e) => Err(ScrubError::InvalidPatternConfig(format!("Invalid regex: {e}"))),
                }
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::HiddenRun => write!(f, "hidden text"),
            Pattern::BracketFragment { open, close } => write!(f, "{open}...{close} fragments"),
        }
    }
}

/// A pattern compiled into the form the document searches with.
#[derive(Debug, Clone)]
pub enum MatchRule {
    Hidden,
    Wildcard(Regex),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_delimiters() {
        assert_eq!(
            Pattern::from_delimiters("{}").unwrap(),
            Pattern::BracketFragment { open: '{', close: '}' }
        );
        assert_eq!(
            Pattern::from_delimiters("«»").unwrap(),
            Pattern::BracketFragment { open: '«', close: '»' }
        );
    }

    #[test]
    fn test_invalid_delimiters() {
        for delims in ["", "{", "{}}", "[[", "abc"] {
            let result = Pattern::from_delimiters(delims);
            assert!(
                matches!(result, Err(ScrubError::InvalidPatternConfig(_))),
                "{delims:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_wildcard_is_shortest_match() {
        let rule = Pattern::from_delimiters("{}").unwrap().match_rule().unwrap();
        let MatchRule::Wildcard(regex) = rule else {
            panic!("bracket pattern should compile to a wildcard rule");
        };
        let found: Vec<&str> = regex.find_iter("{a}x{b}").map(|m| m.as_str()).collect();
        assert_eq!(found, vec!["{a}", "{b}"]);
    }

    #[test]
    fn test_regex_metacharacters_are_escaped() {
        let rule = Pattern::from_delimiters("()").unwrap().match_rule().unwrap();
        let MatchRule::Wildcard(regex) = rule else {
            panic!("bracket pattern should compile to a wildcard rule");
        };
        assert_eq!(regex.find("keep(drop)keep").map(|m| m.as_str()), Some("(drop)"));
    }
}
