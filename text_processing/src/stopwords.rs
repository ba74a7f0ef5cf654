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

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fs::File;
use std::hash::Hash;
use std::io;
use std::io::{BufRead, BufReader};
use camino::Utf8Path;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use crate::tokenizer::Tokenizer;

/// A set of stopwords in the form produced by the [Tokenizer].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StopWordList {
    raw: HashSet<CompactString>,
    normalized: HashSet<CompactString>
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ContainsKind {
    Raw,
    Normalized,
    Both
}

impl StopWordList {

    pub fn new(mut raw: HashSet<CompactString>, mut normalized: HashSet<CompactString>) -> Self {
        raw.shrink_to_fit();
        normalized.shrink_to_fit();
        Self { raw, normalized }
    }

    pub fn from_raw(raw: HashSet<CompactString>) -> Self {
        let normalized = raw
            .iter()
            .map(|value| value.nfc().collect::<CompactString>())
            .collect::<HashSet<_>>();
        Self::new(raw, normalized)
    }

    /// Brings every phrase into the canonical form of [tokenizer].
    /// Blank phrases are ignored.
    pub fn from_phrases<I, S>(phrases: I, tokenizer: &Tokenizer) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw = phrases
            .into_iter()
            .filter_map(|phrase| {
                let canonical = tokenizer.canonical_phrase(phrase.as_ref());
                (!canonical.is_empty()).then(|| CompactString::from(canonical))
            })
            .collect();
        Self::from_raw(raw)
    }

    #[inline]
    pub fn contains<Q: ?Sized>(&self, kind: ContainsKind, value: &Q) -> bool
    where
        CompactString: Borrow<Q>,
        Q: Hash + Eq, {
        match kind {
            ContainsKind::Raw => self.raw.contains(value),
            ContainsKind::Normalized => self.normalized.contains(value),
            ContainsKind::Both => self.contains_both(value),
        }
    }

    #[inline]
    pub fn contains_both<Q: ?Sized>(&self, value: &Q) -> bool
    where
        CompactString: Borrow<Q>,
        Q: Hash + Eq, {
        self.raw.contains(value) || self.normalized.contains(value)
    }

    /// The number of distinct stopwords.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Loads the newline delimited stopword file at [path] and brings every
/// line into the canonical form of [tokenizer].
///
/// A missing file results in an empty list.
pub fn load_stopwords(path: impl AsRef<Utf8Path>, tokenizer: &Tokenizer) -> Result<StopWordList, io::Error> {
    let path = path.as_ref();
    if !path.exists() {
        log::warn!("The stopword file {path} does not exist! Continue without stopwords.");
        return Ok(StopWordList::default());
    }
    let lines = BufReader::new(File::open(path)?)
        .lines()
        .collect::<Result<Vec<_>, _>>()?;
    let stopwords = StopWordList::from_phrases(lines, tokenizer);
    log::info!("Loaded {} stopwords from {path}.", stopwords.len());
    Ok(stopwords)
}

#[cfg(test)]
mod test {
    use std::io::Write;
    use crate::tokenizer::Tokenizer;
    use super::{load_stopwords, ContainsKind, StopWordList};

    #[test]
    fn phrases_are_tokenized_as_a_whole() {
        let tokenizer = Tokenizer::default();
        let stopwords = StopWordList::from_phrases(["mặc dù", "  của ", "", "   ", "của", "thì"], &tokenizer);
        assert_eq!(3, stopwords.len());
        assert!(stopwords.contains_both("mặc_dù"));
        assert!(stopwords.contains_both("của"));
        assert!(!stopwords.contains_both("mặc dù"));
        assert!(!stopwords.contains_both("mặc"));
    }

    #[test]
    fn matches_composed_forms() {
        let tokenizer = Tokenizer::default();
        let stopwords = StopWordList::from_phrases(["đa\u{309}o"], &tokenizer);
        assert!(stopwords.contains(ContainsKind::Normalized, "đảo"));
        assert!(!stopwords.contains(ContainsKind::Raw, "đảo"));
        assert!(stopwords.contains(ContainsKind::Both, "đảo"));
    }

    #[test]
    fn missing_file_is_empty() {
        let stopwords = load_stopwords("this/file/does/not/exist.txt", &Tokenizer::default()).unwrap();
        assert!(stopwords.is_empty());
    }

    #[test]
    fn loads_file() {
        let mut file = camino_tempfile::NamedUtf8TempFile::new().unwrap();
        writeln!(file, "mặc dù\nvà\n\nvà\nbị").unwrap();
        file.flush().unwrap();
        let stopwords = load_stopwords(file.path(), &Tokenizer::default()).unwrap();
        assert_eq!(3, stopwords.len());
        assert!(stopwords.contains_both("mặc_dù"));
        assert!(stopwords.contains_both("bị"));
    }
}
