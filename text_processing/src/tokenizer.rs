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

use serde::{Deserialize, Serialize};
use crate::configs::{SegmenterConfig, SegmenterKind};
use crate::segmenter::{DEFAULT_LEXICON, LongestMatchSegmenter, Segmenter, SegmenterError, SyllableSegmenter, WordSegmenter};

/// Splits texts into underscore-joined word tokens.
///
/// The same tokenizer has to be used for the stopwords, while fitting and
/// while transforming, which is why it travels inside the vectorizer.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tokenizer {
    segmenter: Segmenter,
}

impl Tokenizer {
    pub fn new(segmenter: Segmenter) -> Self {
        Self { segmenter }
    }

    /// Creates the tokenizer described by [cfg].
    pub fn from_config(cfg: &SegmenterConfig) -> Result<Self, SegmenterError> {
        let segmenter = match cfg.kind {
            SegmenterKind::Syllable => Segmenter::Syllable(SyllableSegmenter),
            SegmenterKind::LongestMatch => {
                let mut segmenter = if cfg.use_default_lexicon {
                    LongestMatchSegmenter::new(cfg.max_compound_len, DEFAULT_LEXICON)?
                } else {
                    LongestMatchSegmenter::new(cfg.max_compound_len, std::iter::empty::<&str>())?
                };
                if let Some(lexicon) = &cfg.lexicon {
                    if lexicon.exists() {
                        let added = segmenter.extend_from_file(lexicon)?;
                        log::info!("Loaded {added} compounds from {lexicon}.");
                    } else {
                        log::warn!("The lexicon {lexicon} does not exist! Continue with {} compounds.", segmenter.lexicon_len());
                    }
                }
                Segmenter::LongestMatch(segmenter)
            }
        };
        Ok(Self::new(segmenter))
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    /// Segments [text] and splits it into tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.segmenter
            .segment(text)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// The canonical form of a whole phrase, as the segmenter writes it.
    pub fn canonical_phrase(&self, phrase: &str) -> String {
        self.segmenter.segment(phrase.trim())
    }
}
