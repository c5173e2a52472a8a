//! Whole-word match highlighting.

use regex::{Captures, Regex, RegexBuilder};

use crate::error::{Result, SiftError};

/// Wraps case-insensitive whole-word matches of a term set in `<tag>`.
#[derive(Debug, Clone)]
pub struct Highlighter {
    regex: Option<Regex>,
    open: String,
    close: String,
}

impl Highlighter {
    /// Build a highlighter for `terms`. Empty terms are ignored; with no
    /// terms left the highlighter never matches.
    pub fn new<S: AsRef<str>>(terms: &[S], tag: &str) -> Result<Self> {
        let mut escaped: Vec<String> = terms
            .iter()
            .map(|t| t.as_ref().trim())
            .filter(|t| !t.is_empty())
            .map(regex::escape)
            .collect();
        // Longer alternatives first so the longest word wins.
        escaped.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        escaped.dedup();

        let regex = if escaped.is_empty() {
            None
        } else {
            let pattern = format!(r"\b(?:{})\b", escaped.join("|"));
            let regex = RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| SiftError::invalid_argument(format!("highlight pattern: {e}")))?;
            Some(regex)
        };

        Ok(Highlighter {
            regex,
            open: format!("<{tag}>"),
            close: format!("</{tag}>"),
        })
    }

    /// The highlighted text, or `None` when nothing matched.
    pub fn highlight(&self, text: &str) -> Option<String> {
        let regex = self.regex.as_ref()?;
        if !regex.is_match(text) {
            return None;
        }
        let replaced = regex.replace_all(text, |caps: &Captures| {
            format!("{}{}{}", self.open, &caps[0], self.close)
        });
        Some(replaced.into_owned())
    }
}
