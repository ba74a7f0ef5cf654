// Copyright 2024 Felix Engl
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Deterministic cleanup of raw documents before tokenizing.

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Matches the scheme marker `http` and the non-whitespace run following it.
const URL_PATTERN: &str = r"http\S+";
/// Everything that is neither a word character nor whitespace.
const NON_WORD_PATTERN: &str = r"[^\w\s]";
const WHITESPACE_PATTERN: &str = r"\s+";

struct Patterns {
    url: Regex,
    non_word: Regex,
    whitespace: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        // The patterns are constants and known to compile.
        url: Regex::new(URL_PATTERN).unwrap(),
        non_word: Regex::new(NON_WORD_PATTERN).unwrap(),
        whitespace: Regex::new(WHITESPACE_PATTERN).unwrap(),
    })
}

/// Normalizes a document.
///
/// The text is brought to NFC and lower-cased, URLs are removed, every
/// character that is neither a word character nor whitespace is replaced by
/// a space and whitespace runs are collapsed to a single space.
///
/// The function is total and idempotent.
pub fn normalize_text(text: &str) -> String {
    let patterns = patterns();
    let text = text.nfc().collect::<String>().to_lowercase();
    let text = patterns.url.replace_all(&text, "");
    let text = patterns.non_word.replace_all(&text, " ");
    let text = patterns.whitespace.replace_all(&text, " ");
    text.trim().to_string()
}

/// Normalizes a document that may be absent. Absent documents become the empty string.
pub fn normalize_optional(text: Option<&str>) -> String {
    text.map(normalize_text).unwrap_or_default()
}
