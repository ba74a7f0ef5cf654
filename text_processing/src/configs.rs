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

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use crate::segmenter::DEFAULT_MAX_COMPOUND_LEN;
use crate::tf_idf::{Idf, Norm, Tf};

/// The registered segmenters.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmenterKind {
    Syllable,
    #[default]
    LongestMatch,
}

/// The config of the word segmentation used by the tokenizer.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SegmenterConfig {
    #[serde(default)]
    pub kind: SegmenterKind,
    /// A newline delimited file with additional compounds.
    #[serde(default)]
    pub lexicon: Option<Utf8PathBuf>,
    /// Use the built-in compounds
    #[serde(default = "_default_use_default_lexicon")]
    pub use_default_lexicon: bool,
    #[serde(default = "_default_max_compound_len")]
    pub max_compound_len: usize,
}

const fn _default_use_default_lexicon() -> bool {
    true
}
const fn _default_max_compound_len() -> usize {
    DEFAULT_MAX_COMPOUND_LEN
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            kind: SegmenterKind::default(),
            lexicon: None,
            use_default_lexicon: _default_use_default_lexicon(),
            max_compound_len: _default_max_compound_len(),
        }
    }
}

/// A document frequency bound, either an absolute number of documents
/// or a ratio of the corpus size.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentFrequency {
    Count(u64),
    Ratio(f64),
}

impl DocumentFrequency {
    /// The largest document count allowed by this bound.
    pub fn upper_bound(&self, document_count: u64) -> u64 {
        match *self {
            DocumentFrequency::Count(value) => value,
            DocumentFrequency::Ratio(ratio) => (ratio * document_count as f64).floor().max(0.0) as u64,
        }
    }

    /// The smallest document count allowed by this bound.
    pub fn lower_bound(&self, document_count: u64) -> u64 {
        match *self {
            DocumentFrequency::Count(value) => value,
            DocumentFrequency::Ratio(ratio) => (ratio * document_count as f64).ceil().max(0.0) as u64,
        }
    }
}

/// The config of the TF-IDF vectorizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Tokens appearing in more documents are ignored.
    #[serde(default = "_default_max_df")]
    pub max_df: DocumentFrequency,
    /// Tokens appearing in fewer documents are ignored.
    #[serde(default = "_default_min_df")]
    pub min_df: DocumentFrequency,
    /// Keeps only the most frequent tokens.
    #[serde(default = "_default_max_features")]
    pub max_features: Option<usize>,
    #[serde(default = "_default_tf")]
    pub tf: Tf,
    #[serde(default = "_default_idf")]
    pub idf: Idf,
    #[serde(default = "_default_norm")]
    pub norm: Norm,
}

const fn _default_max_df() -> DocumentFrequency {
    DocumentFrequency::Ratio(0.85)
}
const fn _default_min_df() -> DocumentFrequency {
    DocumentFrequency::Count(2)
}
const fn _default_max_features() -> Option<usize> {
    Some(15_000)
}
const fn _default_tf() -> Tf {
    Tf::RawCount
}
const fn _default_idf() -> Idf {
    Idf::InverseDocumentFrequencySmooth
}
const fn _default_norm() -> Norm {
    Norm::L2
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_df: _default_max_df(),
            min_df: _default_min_df(),
            max_features: _default_max_features(),
            tf: _default_tf(),
            idf: _default_idf(),
            norm: _default_norm(),
        }
    }
}
