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

//! Vietnamese word segmentation.
//!
//! A segmenter turns a text into a space separated sequence of words, where
//! the syllables of a compound word are joined by an underscore
//! (`"mặc dù trời mưa"` -> `"mặc_dù trời mưa"`).
//!
//! Every implementation is registered by a name and a version, a persisted
//! [`Segmenter`] only stores these and its data, never code.

use std::collections::HashSet;
use std::fmt::{Debug, Formatter};
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader};
use camino::Utf8Path;
use compact_str::CompactString;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Joins the syllables of a compound word.
pub const COMPOUND_SEPARATOR: char = '_';

/// The default upper bound of syllables in a compound.
pub const DEFAULT_MAX_COMPOUND_LEN: usize = 4;

/// Common compound words, used as the built-in lexicon of the [`LongestMatchSegmenter`].
pub const DEFAULT_LEXICON: &[&str] = &[
    "an ninh", "bác sĩ", "bảo hiểm", "bệnh viện", "bị cáo", "bộ trưởng", "cảnh báo",
    "cảnh sát", "chiếm đoạt", "chính phủ", "chính quyền", "chủ tịch", "chứng khoán",
    "cơ quan", "công an", "công ty", "cư dân", "doanh nghiệp", "dư luận", "đầu tư",
    "điều tra", "điện thoại", "đường dây", "gia đình", "giải cứu", "giao dịch",
    "giáo dục", "hà nội", "hàng chục", "hình sự", "hồ chí minh", "học sinh", "khẩn cấp",
    "khởi tố", "kinh tế", "lên tiếng", "lừa đảo", "mạng xã hội", "mặc dù", "nạn nhân",
    "ngân hàng", "người dân", "nhà đầu tư", "nhà hàng", "nhà nước", "ô tô", "phát hiện",
    "phó chủ tịch", "quốc hội", "sàn giao dịch", "sức khỏe", "tài khoản", "tâm sự",
    "thành phố", "thầy giáo", "thế giới", "thông tin", "thủ tướng", "tiền điện tử",
    "tin đồn", "tin giả", "tin tức", "trẻ em", "truy nã", "tuy nhiên", "vắc xin",
    "việt nam", "xã hội", "y tế",
];

/// Error while building or restoring a [`Segmenter`].
#[derive(Debug, Error)]
pub enum SegmenterError {
    #[error("The segmenter {name} in version {version} is not registered!")]
    UnknownSegmenter { name: CompactString, version: u16 },
    #[error("A compound must span at least two syllables but the maximum is {0}!")]
    InvalidCompoundLength(usize),
    #[error(transparent)]
    IO(#[from] io::Error),
}

/// A word segmentation service.
pub trait WordSegmenter {
    /// Segments [text] into space separated words. Compounds are joined by [`COMPOUND_SEPARATOR`].
    fn segment(&self, text: &str) -> String;
}

/// Treats every syllable as a word.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SyllableSegmenter;

impl SyllableSegmenter {
    pub const NAME: &'static str = "syllable";
    pub const VERSION: u16 = 1;
}

impl WordSegmenter for SyllableSegmenter {
    fn segment(&self, text: &str) -> String {
        text.split_whitespace().join(" ")
    }
}

/// Forward maximum matching against a lexicon of compound words.
///
/// At every position the longest run of syllables found in the lexicon is
/// joined to a single word, otherwise the syllable is kept as is.
/// The lookup ignores case, the output keeps the case of the input.
#[derive(Clone, Eq, PartialEq)]
pub struct LongestMatchSegmenter {
    max_compound_len: usize,
    lexicon: HashSet<CompactString>,
}

impl Debug for LongestMatchSegmenter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LongestMatchSegmenter")
            .field("max_compound_len", &self.max_compound_len)
            .field("lexicon_size", &self.lexicon.len())
            .finish()
    }
}

impl LongestMatchSegmenter {
    pub const NAME: &'static str = "longest-match";
    pub const VERSION: u16 = 1;

    pub fn new<I, S>(max_compound_len: usize, compounds: I) -> Result<Self, SegmenterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if max_compound_len < 2 {
            return Err(SegmenterError::InvalidCompoundLength(max_compound_len));
        }
        let mut new = Self {
            max_compound_len,
            lexicon: HashSet::new(),
        };
        new.extend(compounds);
        Ok(new)
    }

    /// A segmenter with the [`DEFAULT_LEXICON`].
    pub fn with_default_lexicon() -> Self {
        let mut new = Self {
            max_compound_len: DEFAULT_MAX_COMPOUND_LEN,
            lexicon: HashSet::new(),
        };
        new.extend(DEFAULT_LEXICON);
        new
    }

    /// Reads compounds from a newline delimited file.
    /// Syllables may be separated by whitespace or [`COMPOUND_SEPARATOR`].
    pub fn extend_from_file(&mut self, path: impl AsRef<Utf8Path>) -> Result<usize, SegmenterError> {
        let before = self.lexicon.len();
        let lines = BufReader::new(File::open(path.as_ref())?)
            .lines()
            .collect::<Result<Vec<_>, _>>()?;
        self.extend(lines);
        Ok(self.lexicon.len() - before)
    }

    pub fn max_compound_len(&self) -> usize {
        self.max_compound_len
    }

    pub fn lexicon_len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn contains_compound(&self, compound: &str) -> bool {
        Self::lexicon_key(compound).is_some_and(|key| self.lexicon.contains(&key))
    }

    /// The entries of the lexicon in lexicographic order.
    pub fn sorted_lexicon(&self) -> Vec<CompactString> {
        self.lexicon.iter().cloned().sorted().collect()
    }

    /// The lookup key of a compound, `None` if it is not a compound.
    fn lexicon_key(compound: &str) -> Option<CompactString> {
        let syllables = compound
            .split(|c: char| c.is_whitespace() || c == COMPOUND_SEPARATOR)
            .filter(|value| !value.is_empty())
            .map(|value| value.to_lowercase())
            .collect_vec();
        (syllables.len() > 1).then(|| CompactString::from(syllables.join(" ")))
    }
}

impl<S> Extend<S> for LongestMatchSegmenter where S: AsRef<str> {
    fn extend<T: IntoIterator<Item=S>>(&mut self, iter: T) {
        for value in iter {
            if let Some(key) = Self::lexicon_key(value.as_ref()) {
                self.lexicon.insert(key);
            }
        }
    }
}

impl WordSegmenter for LongestMatchSegmenter {
    fn segment(&self, text: &str) -> String {
        let syllables = text.split_whitespace().collect_vec();
        let lowered = syllables.iter().map(|value| value.to_lowercase()).collect_vec();
        let mut words = Vec::with_capacity(syllables.len());
        let mut position = 0;
        while position < syllables.len() {
            let longest = self.max_compound_len.min(syllables.len() - position);
            let matched = (2..=longest)
                .rev()
                .find(|len| {
                    let key = lowered[position..position + len].join(" ");
                    self.lexicon.contains(key.as_str())
                })
                .unwrap_or(1);
            words.push(syllables[position..position + matched].join("_"));
            position += matched;
        }
        words.join(" ")
    }
}

/// A registered segmenter implementation.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SegmenterRecord", into = "SegmenterRecord")]
pub enum Segmenter {
    Syllable(SyllableSegmenter),
    LongestMatch(LongestMatchSegmenter),
}

impl Segmenter {
    pub fn name(&self) -> &'static str {
        match self {
            Segmenter::Syllable(_) => SyllableSegmenter::NAME,
            Segmenter::LongestMatch(_) => LongestMatchSegmenter::NAME,
        }
    }

    pub fn version(&self) -> u16 {
        match self {
            Segmenter::Syllable(_) => SyllableSegmenter::VERSION,
            Segmenter::LongestMatch(_) => LongestMatchSegmenter::VERSION,
        }
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::LongestMatch(LongestMatchSegmenter::with_default_lexicon())
    }
}

impl WordSegmenter for Segmenter {
    fn segment(&self, text: &str) -> String {
        match self {
            Segmenter::Syllable(value) => value.segment(text),
            Segmenter::LongestMatch(value) => value.segment(text),
        }
    }
}

/// The persisted form of a [`Segmenter`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SegmenterRecord {
    name: CompactString,
    version: u16,
    max_compound_len: usize,
    lexicon: Vec<CompactString>,
}

impl TryFrom<SegmenterRecord> for Segmenter {
    type Error = SegmenterError;

    fn try_from(value: SegmenterRecord) -> Result<Self, Self::Error> {
        match (value.name.as_str(), value.version) {
            (SyllableSegmenter::NAME, SyllableSegmenter::VERSION) => {
                Ok(Segmenter::Syllable(SyllableSegmenter))
            }
            (LongestMatchSegmenter::NAME, LongestMatchSegmenter::VERSION) => {
                Ok(Segmenter::LongestMatch(LongestMatchSegmenter::new(value.max_compound_len, value.lexicon)?))
            }
            _ => Err(SegmenterError::UnknownSegmenter { name: value.name, version: value.version }),
        }
    }
}

impl From<Segmenter> for SegmenterRecord {
    fn from(value: Segmenter) -> Self {
        let name = CompactString::from(value.name());
        let version = value.version();
        match value {
            Segmenter::Syllable(_) => SegmenterRecord {
                name,
                version,
                max_compound_len: 1,
                lexicon: Vec::new(),
            },
            Segmenter::LongestMatch(segmenter) => SegmenterRecord {
                name,
                version,
                max_compound_len: segmenter.max_compound_len,
                lexicon: segmenter.sorted_lexicon(),
            },
        }
    }
}
