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

use std::collections::HashMap;
use std::hash::Hash;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use crate::corpus::CorpusDocumentStatistics;

pub mod defaults {
    use crate::tf_idf::{Idf, Tf, TfIdf};
    pub const TERM_FREQUENCY_INVERSE_SMOOTH: TfIdf<Tf, Idf> = TfIdf::new(Tf::TermFrequency, Idf::InverseDocumentFrequencySmooth);
}

/// A combination of Tf and Idf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "Tf: Serialize, Idf: Serialize",
    deserialize = "Tf: DeserializeOwned, Idf: DeserializeOwned"
))]
pub struct TfIdf<Tf, Idf> {
    pub tf: Tf,
    pub idf: Idf
}

impl<Tf, Idf> TfIdf<Tf, Idf> where Tf: TfAlgorithm {
    delegate::delegate! {
        to self.tf {
            pub fn calculate_tf<W, D: IntoIterator<Item=W>>(&self, doc: D) -> HashMap<W, f64> where W: Hash + Eq;
        }
    }
}

impl<Tf, Idf> TfIdf<Tf, Idf> where Idf: IdfAlgorithm {
    delegate::delegate! {
        to self.idf {
            pub fn calculate_idf<S: CorpusDocumentStatistics>(&self, statistics: &S, word: &S::Word) -> Option<f64>;
            pub fn calculate_idf_with_document_frequency<S: CorpusDocumentStatistics>(&self, statistics: &S, document_frequency: u64) -> f64;
        }
    }
}

impl<Tf, Idf> TfIdf<Tf, Idf> {
    pub const fn new(tf: Tf, idf: Idf) -> Self {
        Self{tf, idf}
    }
}

impl<Tf, Idf> Copy for TfIdf<Tf, Idf> where Tf: Copy, Idf: Copy {}

/// Trait for IDF Algorithms
pub trait IdfAlgorithm {
    /// Calculates the IDF value for a single word based on the provided statistics.
    /// Returns none if the word is not part of the corpus.
    #[inline]
    fn calculate_idf<S: CorpusDocumentStatistics>(&self, statistics: &S, word: &S::Word) -> Option<f64> {
        statistics
            .document_frequency(word)
            .map(|value| self.calculate_idf_with_document_frequency(statistics, value))
    }

    /// Calculates the IDF value for a word contained in [document_frequency] documents of the corpus.
    fn calculate_idf_with_document_frequency<S: CorpusDocumentStatistics>(&self, statistics: &S, document_frequency: u64) -> f64;
}

/// Default IDF Algorithms
/// From https://en.wikipedia.org/wiki/Tf%E2%80%93idf
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Idf {
    #[serde(rename = "unary")]
    Unary,
    /// `ln(n / df) + 1`
    #[serde(rename = "idf")]
    InverseDocumentFrequency,
    /// `ln((1 + n) / (1 + df)) + 1`, as if one document contained every word once.
    #[serde(rename = "idf-smooth")]
    InverseDocumentFrequencySmooth,
}

impl IdfAlgorithm for Idf {
    fn calculate_idf_with_document_frequency<S: CorpusDocumentStatistics>(&self, statistics: &S, document_frequency: u64) -> f64 {
        let document_count = statistics.document_count() as f64;
        let document_frequency = document_frequency as f64;
        match self {
            Idf::Unary => {
                1.0
            }
            Idf::InverseDocumentFrequency => {
                (document_count / document_frequency).ln() + 1.0
            }
            Idf::InverseDocumentFrequencySmooth => {
                ((1.0 + document_count) / (1.0 + document_frequency)).ln() + 1.0
            }
        }
    }
}


/// Trait for TF Algorithm
pub trait TfAlgorithm {
    /// Calculates the TF value for every word in [doc].
    fn calculate_tf<W, D: IntoIterator<Item=W>>(&self, doc: D) -> HashMap<W, f64> where W: Hash + Eq;
}

/// Default TF Algorithms
/// From https://en.wikipedia.org/wiki/Tf%E2%80%93idf
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Tf {
    #[serde(rename = "binary")]
    Binary,
    #[serde(rename = "raw")]
    RawCount,
    #[serde(rename = "term-frequency")]
    TermFrequency,
    /// `1 + ln(count)`
    #[serde(rename = "log")]
    LogNormalization,
}

impl Tf {
    /// The implementation for Tf::RawCount, used in multiple impls.
    fn raw_count<W, D: IntoIterator<Item=W>>(doc: D) -> HashMap<W, f64> where W: Hash + Eq {
        let mut result = HashMap::new();
        for word in doc {
            result
                .entry(word)
                .and_modify(|value| *value += 1.0)
                .or_insert(1.0);
        }
        result
    }
}

impl TfAlgorithm for Tf {
    fn calculate_tf<W, D: IntoIterator<Item=W>>(&self, doc: D) -> HashMap<W, f64> where W: Hash + Eq {
        match self {
            Tf::Binary => {
                doc.into_iter().map(|word| (word, 1.0)).collect()
            }
            Tf::RawCount => {
                Self::raw_count(doc)
            }
            Tf::TermFrequency => {
                let mut result = Self::raw_count(doc);
                let divider = result.values().sum::<f64>();
                for value in result.values_mut() {
                    *value /= divider;
                }
                result
            }
            Tf::LogNormalization => {
                let mut result = Self::raw_count(doc);
                for value in result.values_mut() {
                    *value = value.ln() + 1.0;
                }
                result
            }
        }
    }
}

/// Normalization of a whole document vector.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Norm {
    #[serde(rename = "none")]
    None,
    /// The absolute values sum up to 1
    #[serde(rename = "l1")]
    L1,
    /// The euclidean length is 1
    #[serde(rename = "l2")]
    L2,
}

impl Norm {
    /// Normalizes [values] in place. A zero vector stays a zero vector.
    pub fn normalize(&self, values: &mut [f64]) {
        let divider = match self {
            Norm::None => return,
            Norm::L1 => values.iter().map(|value| value.abs()).sum::<f64>(),
            Norm::L2 => values.iter().map(|value| value * value).sum::<f64>().sqrt(),
        };
        if divider > 0.0 {
            for value in values.iter_mut() {
                *value /= divider;
            }
        }
    }
}


#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;
    use itertools::Itertools;
    use crate::corpus::CorpusStatisticsCollector;
    use super::{Idf, IdfAlgorithm, Norm, Tf, TfAlgorithm};

    fn statistics() -> CorpusStatisticsCollector<&'static str> {
        let mut statistics = CorpusStatisticsCollector::default();
        statistics.add("it is going to rain today".split(' '));
        statistics.add("today i am not going outside".split(' '));
        statistics.add("i am going to watch the season premiere".split(' '));
        statistics
    }

    #[test]
    fn idf_values() {
        let statistics = statistics();
        assert_approx_eq!(f64, 1.0, Idf::InverseDocumentFrequencySmooth.calculate_idf(&statistics, &"going").unwrap());
        assert_approx_eq!(f64, 1.0, Idf::InverseDocumentFrequency.calculate_idf(&statistics, &"going").unwrap());
        assert_approx_eq!(f64, (4.0f64 / 3.0).ln() + 1.0, Idf::InverseDocumentFrequencySmooth.calculate_idf(&statistics, &"today").unwrap());
        assert_approx_eq!(f64, 3.0f64.ln() + 1.0, Idf::InverseDocumentFrequency.calculate_idf(&statistics, &"rain").unwrap());
        assert_approx_eq!(f64, 1.0, Idf::Unary.calculate_idf(&statistics, &"rain").unwrap());
        assert_eq!(None, Idf::Unary.calculate_idf(&statistics, &"snow"));
    }

    #[test]
    fn tf_values() {
        let doc = "a b a c a".split(' ').collect_vec();
        let raw = Tf::RawCount.calculate_tf(doc.clone());
        assert_approx_eq!(f64, 3.0, raw["a"]);
        assert_approx_eq!(f64, 1.0, raw["b"]);
        let binary = Tf::Binary.calculate_tf(doc.clone());
        assert_approx_eq!(f64, 1.0, binary["a"]);
        let frequency = Tf::TermFrequency.calculate_tf(doc.clone());
        assert_approx_eq!(f64, 0.6, frequency["a"]);
        let log = Tf::LogNormalization.calculate_tf(doc);
        assert_approx_eq!(f64, 3.0f64.ln() + 1.0, log["a"]);
        assert_approx_eq!(f64, 1.0, log["c"]);
    }

    #[test]
    fn norms() {
        let mut values = [3.0, 4.0];
        Norm::L2.normalize(&mut values);
        assert_approx_eq!(f64, 0.6, values[0]);
        assert_approx_eq!(f64, 0.8, values[1]);

        let mut values = [1.0, -3.0];
        Norm::L1.normalize(&mut values);
        assert_approx_eq!(f64, 0.25, values[0]);
        assert_approx_eq!(f64, -0.75, values[1]);

        let mut values = [0.0, 0.0];
        Norm::L2.normalize(&mut values);
        assert_eq!([0.0, 0.0], values);
    }

    #[test]
    fn names_are_stable() {
        assert_eq!("\"idf-smooth\"", serde_json::to_string(&Idf::InverseDocumentFrequencySmooth).unwrap());
        assert_eq!("\"raw\"", serde_json::to_string(&Tf::RawCount).unwrap());
        assert_eq!("\"l2\"", serde_json::to_string(&Norm::L2).unwrap());
    }
}
