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

use std::cmp::Reverse;
use std::collections::HashMap;
use compact_str::CompactString;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use thiserror::Error;
use crate::configs::VectorizerConfig;
use crate::corpus::{CorpusDocumentStatistics, CorpusStatisticsCollector};
use crate::sparse::{SparseError, SparseMatrix, SparseVector};
use crate::stopwords::StopWordList;
use crate::tf_idf::{Idf, IdfAlgorithm, Norm, Tf, TfAlgorithm, TfIdf};
use crate::tokenizer::Tokenizer;

#[derive(Debug, Error)]
pub enum VectorizerError {
    #[error("max_df corresponds to fewer documents than min_df ({max} < {min})!")]
    MaxBelowMin { max: u64, min: u64 },
    #[error("After pruning, no terms remain. Try a lower min_df or a higher max_df.")]
    NoTermsRemain,
    #[error("Empty vocabulary; perhaps the documents only contain stop words.")]
    EmptyVocabulary,
    #[error("The vocabulary is corrupt: {0}")]
    CorruptVocabulary(String),
    #[error(transparent)]
    Sparse(#[from] SparseError),
}

/// A token of the vocabulary and its learned idf.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VocabularyEntry(pub CompactString, pub f64);

impl Eq for VocabularyEntry {}

impl PartialEq for VocabularyEntry {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0) && float_cmp::approx_eq!(f64, self.1, other.1)
    }
}

/// The immutable mapping from token to feature index.
/// The feature index of a token is its position in lexicographic order.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<VocabularyEntry>", into = "Vec<VocabularyEntry>")]
pub struct Vocabulary {
    entries: Vec<VocabularyEntry>,
    index: HashMap<CompactString, u32>,
}

impl Vocabulary {
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index_of(&self, token: &str) -> Option<u32> {
        self.index.get(token).copied()
    }

    pub fn idf_of(&self, token: &str) -> Option<f64> {
        self.index_of(token).map(|index| self.entries[index as usize].1)
    }

    pub fn iter(&self) -> impl Iterator<Item=&VocabularyEntry> {
        self.entries.iter()
    }
}

impl TryFrom<Vec<VocabularyEntry>> for Vocabulary {
    type Error = VectorizerError;

    fn try_from(entries: Vec<VocabularyEntry>) -> Result<Self, Self::Error> {
        if let Some((a, b)) = entries.iter().tuple_windows().find(|(a, b)| a.0 >= b.0) {
            return Err(VectorizerError::CorruptVocabulary(format!("{} is not followed by a greater token but by {}", a.0, b.0)));
        }
        if let Some(entry) = entries.iter().find(|value| !value.1.is_finite()) {
            return Err(VectorizerError::CorruptVocabulary(format!("The idf of {} is {}", entry.0, entry.1)));
        }
        let index = entries
            .iter()
            .enumerate()
            .map(|(index, value)| (value.0.clone(), index as u32))
            .collect();
        Ok(Self { entries, index })
    }
}

impl From<Vocabulary> for Vec<VocabularyEntry> {
    fn from(value: Vocabulary) -> Self {
        value.entries
    }
}

/// Learns a vocabulary over tokenized documents and maps documents
/// to tf-idf weighted [SparseVector]s over that vocabulary.
///
/// The tokenizer is part of the fitted state, a document is always
/// transformed with the tokenizer the vocabulary was learned with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "TF: Serialize, IDF: Serialize",
    deserialize = "TF: DeserializeOwned, IDF: DeserializeOwned"
))]
pub struct TfIdfVectorizer<TF = Tf, IDF = Idf> {
    tokenizer: Tokenizer,
    vocabulary: Vocabulary,
    tf_idf: TfIdf<TF, IDF>,
    norm: Norm,
}

impl TfIdfVectorizer {
    /// Learns the vocabulary of [documents] as configured by [cfg] and returns the
    /// fitted vectorizer together with the vectors of [documents].
    pub fn fit<I, T>(documents: I, tokenizer: Tokenizer, stop_words: &StopWordList, cfg: &VectorizerConfig) -> Result<(Self, SparseMatrix), VectorizerError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>
    {
        Self::fit_with(documents, tokenizer, stop_words, cfg, TfIdf::new(cfg.tf, cfg.idf))
    }
}

impl<TF, IDF> TfIdfVectorizer<TF, IDF> where TF: TfAlgorithm, IDF: IdfAlgorithm {
    /// Same as [TfIdfVectorizer::fit] but with custom tf and idf algorithms.
    pub fn fit_with<I, T>(documents: I, tokenizer: Tokenizer, stop_words: &StopWordList, cfg: &VectorizerConfig, tf_idf: TfIdf<TF, IDF>) -> Result<(Self, SparseMatrix), VectorizerError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>
    {
        let documents = documents
            .into_iter()
            .map(|document| {
                tokenizer
                    .tokenize(document.as_ref())
                    .into_iter()
                    .filter(|token| !stop_words.contains_both(token.as_str()))
                    .map(CompactString::from)
                    .collect_vec()
            })
            .collect_vec();

        let mut statistics = CorpusStatisticsCollector::default();
        for document in &documents {
            statistics.add(document.iter().cloned());
        }
        if statistics.unique_word_count() == 0 {
            return Err(VectorizerError::EmptyVocabulary);
        }

        let document_count = statistics.document_count();
        let max = cfg.max_df.upper_bound(document_count);
        let min = cfg.min_df.lower_bound(document_count);
        if max < min {
            return Err(VectorizerError::MaxBelowMin { max, min });
        }

        let mut kept = statistics
            .iter()
            .filter(|(_, statistic)| min <= statistic.document_frequency && statistic.document_frequency <= max)
            .map(|(token, statistic)| (token.clone(), statistic.term_count))
            .collect_vec();
        if kept.is_empty() {
            return Err(VectorizerError::NoTermsRemain);
        }
        if let Some(max_features) = cfg.max_features {
            if kept.len() > max_features {
                kept.sort_unstable_by(|a, b| Reverse(a.1).cmp(&Reverse(b.1)).then_with(|| a.0.cmp(&b.0)));
                kept.truncate(max_features);
            }
        }
        kept.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        log::debug!(
            "Kept {} of {} tokens over {document_count} documents (df in {min}..={max}).",
            kept.len(),
            statistics.unique_word_count()
        );

        let entries = kept
            .into_iter()
            .map(|(token, _)| {
                let idf = tf_idf.calculate_idf(&statistics, &token).unwrap_or(1.0);
                VocabularyEntry(token, idf)
            })
            .collect_vec();

        let vectorizer = Self {
            tokenizer,
            vocabulary: Vocabulary::try_from(entries)?,
            tf_idf,
            norm: cfg.norm,
        };

        let mut matrix = SparseMatrix::new(vectorizer.vocabulary.len());
        for document in &documents {
            matrix.push(vectorizer.vectorize_tokens(document.iter().map(CompactString::as_str))?)?;
        }
        Ok((vectorizer, matrix))
    }

    /// Maps [text] to a vector over the vocabulary. Unknown tokens are dropped,
    /// a text without any known token results in an empty vector.
    pub fn transform(&self, text: &str) -> Result<SparseVector, VectorizerError> {
        let tokens = self.tokenizer.tokenize(text);
        self.vectorize_tokens(tokens.iter().map(String::as_str))
    }

    fn vectorize_tokens<'a, D: IntoIterator<Item=&'a str>>(&self, tokens: D) -> Result<SparseVector, VectorizerError> {
        let known = tokens
            .into_iter()
            .filter_map(|token| self.vocabulary.index_of(token));
        let (indices, mut values): (Vec<u32>, Vec<f64>) = self.tf_idf
            .calculate_tf(known)
            .into_iter()
            .sorted_unstable_by_key(|(index, _)| *index)
            .map(|(index, tf)| (index, tf * self.vocabulary.entries[index as usize].1))
            .unzip();
        self.norm.normalize(&mut values);
        Ok(SparseVector::from_entries(
            self.vocabulary.len(),
            indices.into_iter().zip(values)
        )?)
    }
}

impl<TF, IDF> TfIdfVectorizer<TF, IDF> {
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn tf_idf(&self) -> &TfIdf<TF, IDF> {
        &self.tf_idf
    }

    pub fn norm(&self) -> Norm {
        self.norm
    }

    /// The dimension of the produced vectors.
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }
}
