//! Phonetic analyzer for fuzzy name matching.

use std::any::Any;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::standard::split_lowercase;
use crate::analysis::token::TokenStream;
use crate::error::Result;

fn soundex_digit(c: char) -> Option<char> {
    match c {
        'b' | 'f' | 'p' | 'v' => Some('1'),
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some('2'),
        'd' | 't' => Some('3'),
        'l' => Some('4'),
        'm' | 'n' => Some('5'),
        'r' => Some('6'),
        _ => None,
    }
}

/// Lowercase Soundex code of `word`: first letter followed by three digits.
///
/// Non-ASCII-letter characters are ignored. Returns `None` when the word
/// contains no ASCII letter at all.
pub fn soundex(word: &str) -> Option<String> {
    let mut letters = word
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase());

    let first = letters.next()?;
    let mut code = String::with_capacity(4);
    code.push(first);

    let mut last = soundex_digit(first);
    for c in letters {
        if code.len() == 4 {
            break;
        }
        match soundex_digit(c) {
            Some(digit) => {
                if last != Some(digit) {
                    code.push(digit);
                }
                last = Some(digit);
            }
            // h and w do not separate letters with the same code
            None if c == 'h' || c == 'w' => {}
            None => last = None,
        }
    }

    while code.len() < 4 {
        code.push('0');
    }
    Some(code)
}

/// Standard analysis followed by a Soundex code per token.
#[derive(Debug, Clone, Default)]
pub struct PhoneticAnalyzer;

impl PhoneticAnalyzer {
    pub fn new() -> Self {
        PhoneticAnalyzer
    }
}

impl Analyzer for PhoneticAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<_> = split_lowercase(text)
            .into_iter()
            .map(|token| match soundex(&token.text) {
                Some(code) => token.derive(code),
                None => token,
            })
            .collect();
        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &str {
        "phonetic"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
