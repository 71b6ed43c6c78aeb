//! Sentence key normalization.
//!
//! Probe files and treebanks transcribe the same sentence with different
//! punctuation, casing, spacing and sometimes diacritics. Both sides are joined
//! on a [SentenceKey], which only keeps lowercased ASCII letters and digits.
//! Non-Latin scripts are transliterated first, so that their sentences keep distinct keys.
use std::fmt;

use deunicode::deunicode_char;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalized sentence, used as the join key between corpora.
///
/// Two distinct sentences may collapse to the same key: this is a known approximation
/// and no secondary disambiguation is done.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SentenceKey(String);

impl SentenceKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SentenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SentenceKey {
    fn from(text: &str) -> Self {
        normalize(text)
    }
}

/// Build the [SentenceKey] of `text`.
///
/// Diacritics are removed (canonical decomposition, combining marks dropped), remaining
/// characters are transliterated to ASCII, then everything that is not ASCII alphanumeric
/// is stripped and the result is lowercased.
pub fn normalize(text: &str) -> SentenceKey {
    let mut key = String::with_capacity(text.len());
    for c in text.nfd().filter(|c| !is_combining_mark(*c)).nfc() {
        if c.is_ascii_alphanumeric() {
            key.push(c.to_ascii_lowercase());
        } else if let Some(ascii) = deunicode_char(c) {
            key.extend(
                ascii
                    .chars()
                    .filter(char::is_ascii_alphanumeric)
                    .map(|b| b.to_ascii_lowercase()),
            );
        }
    }
    SentenceKey(key)
}
