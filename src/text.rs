//! Line cleanup applied before a line is sent for synthesis.
//!
//! Two stages run in order on every line:
//!
//! 1. [`normalize_line`] trims the line, guarantees terminal punctuation,
//!    collapses whitespace and inserts a pause comma into long lines.
//! 2. [`apply_pronunciations`] rewrites whole words using a
//!    [`PronunciationDict`].
//!
//! Both are pure functions and never fail.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dictionary::PronunciationDict;

/// Lines with more words than this get a pause comma in the middle.
pub const PAUSE_WORD_THRESHOLD: usize = 20;

/// Token inserted at the midpoint of a long line.
pub const PAUSE_TOKEN: &str = ",";

const TERMINAL_PUNCTUATION: [char; 3] = ['.', '!', '?'];

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Clean up a single line for voice-over.
///
/// The midpoint comma is placed by word position (`words / 2`), not at a
/// clause boundary.
///
/// ```
/// use voiceover_rs::text::normalize_line;
///
/// assert_eq!(normalize_line("  Hello   world "), "Hello world.");
/// assert_eq!(normalize_line("Ready?"), "Ready?");
/// ```
pub fn normalize_line(line: &str) -> String {
    let mut line = line.trim().to_string();
    if !line.ends_with(TERMINAL_PUNCTUATION) {
        line.push('.');
    }

    let line = WHITESPACE_RE.replace_all(&line, " ").into_owned();

    let mut words: Vec<&str> = line.split_whitespace().collect();
    if words.len() > PAUSE_WORD_THRESHOLD {
        let midpoint = words.len() / 2;
        words.insert(midpoint, PAUSE_TOKEN);
        return words.join(" ");
    }

    line
}

/// Replace every whole-word, case-sensitive occurrence of each dictionary key.
///
/// Rules run in dictionary order, each as a single left-to-right pass over the
/// output of the previous rule. A later rule therefore sees text produced by an
/// earlier replacement.
pub fn apply_pronunciations(line: &str, dict: &PronunciationDict) -> String {
    let mut text = line.to_string();
    for (word, replacement) in dict.iter() {
        if word.is_empty() {
            continue;
        }
        text = replace_whole_word(&text, word, replacement);
    }
    text
}

/// Number of whitespace-separated words, the unit charged against a credential.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn replace_whole_word(text: &str, word: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(offset) = text[pos..].find(word) {
        let start = pos + offset;
        let end = start + word.len();

        if !ends_with_word_char(&text[..start]) && !starts_with_word_char(&text[end..]) {
            out.push_str(&text[copied..start]);
            out.push_str(replacement);
            copied = end;
            pos = end;
        } else {
            // Step one character so a match starting inside this one is still found.
            pos = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }

        if pos >= text.len() {
            break;
        }
    }

    out.push_str(&text[copied..]);
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn ends_with_word_char(s: &str) -> bool {
    s.chars().next_back().is_some_and(is_word_char)
}

fn starts_with_word_char(s: &str) -> bool {
    s.chars().next().is_some_and(is_word_char)
}
