//! Contract text normalisation
//!
//! Text extracted from PDFs often arrives letter-spaced ("E m p l o y e r")
//! and hard-wrapped. Both confuse the model and inflate prompt length.

use regex::{Captures, Regex};
use std::sync::OnceLock;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

struct Patterns {
    letter_spaced: Regex,
    whitespace: Regex,
}

impl Patterns {
    fn new() -> Self {
        Self {
            // Runs of single word characters each followed by whitespace
            letter_spaced: Regex::new(r"\b(?:\w\s)+\b").expect("letter_spaced regex must compile"),
            whitespace: Regex::new(r"\s+").expect("whitespace regex must compile"),
        }
    }
}

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(Patterns::new)
}

/// Join letter-spaced words
///
/// A run is only joined when it contains more than two spaces, so ordinary
/// short words like "a b" survive.
pub fn collapse_letter_spacing(text: &str) -> String {
    patterns()
        .letter_spaced
        .replace_all(text, |caps: &Captures<'_>| {
            let run = &caps[0];
            if run.matches(' ').count() > 2 {
                run.replace(' ', "")
            } else {
                run.to_string()
            }
        })
        .into_owned()
}

/// Replace newlines and whitespace runs by single spaces
pub fn collapse_whitespace(text: &str) -> String {
    patterns().whitespace.replace_all(text, " ").into_owned()
}

/// Full normalisation applied before extraction
///
/// # Examples
///
/// ```
/// use scrivener_extractor::preprocess;
///
/// assert_eq!(preprocess("E m p l o y e r:\n\nACME"), "Employer: ACME");
/// ```
pub fn preprocess(text: &str) -> String {
    collapse_whitespace(&collapse_letter_spacing(text))
}
