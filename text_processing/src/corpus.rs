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
use std::fmt::{Display, Formatter};
use std::hash::Hash;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

/// The statistics over the documents in a corpus
pub trait CorpusDocumentStatistics {
    /// A word in a corpus
    type Word;
    /// The number of documents in the corpus
    fn document_count(&self) -> u64;
    /// The number of words in the corpus, repetitions included
    fn word_count(&self) -> u64;
    /// The number of unique words in the corpus
    fn unique_word_count(&self) -> usize;
    /// The number of documents containing [word]
    fn document_frequency(&self, word: &Self::Word) -> Option<u64>;
    /// How often [word] occurs in the whole corpus
    fn term_count(&self, word: &Self::Word) -> Option<u64>;
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct WordStatistic {
    /// Number of documents containing the word
    pub document_frequency: u64,
    /// Number of occurrences over all documents
    pub term_count: u64,
}

/// Collects the frequencies in a corpus
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(bound(serialize = "W: Serialize + Hash + Eq", deserialize = "W: DeserializeOwned + Hash + Eq"))]
pub struct CorpusStatisticsCollector<W> {
    document_count: u64,
    word_count: u64,
    words: HashMap<W, WordStatistic>
}

impl<W> Default for CorpusStatisticsCollector<W> {
    fn default() -> Self {
        Self {
            document_count: 0,
            word_count: 0,
            words: HashMap::new(),
        }
    }
}

impl<W> CorpusStatisticsCollector<W> where W: Hash + Eq {
    /// Adds a tokenized document.
    pub fn add<D: IntoIterator<Item=W>>(&mut self, doc: D) {
        self.document_count = self.document_count.saturating_add(1);
        let mut counts = HashMap::new();
        for value in doc {
            self.word_count = self.word_count.saturating_add(1);
            counts
                .entry(value)
                .and_modify(|value: &mut u64| *value = value.saturating_add(1))
                .or_insert(1);
        }
        for (word, count) in counts {
            let statistic = self.words.entry(word).or_default();
            statistic.term_count = statistic.term_count.saturating_add(count);
            statistic.document_frequency = statistic.document_frequency.saturating_add(1);
        }
    }

    /// Returns an iterator over the words and associated statistics
    pub fn iter(&self) -> impl Iterator<Item=(&W, &WordStatistic)> {
        self.words.iter()
    }
}

impl<W> Display for CorpusStatisticsCollector<W> where W: Hash + Eq + Ord + Display {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Document Count: {}", self.document_count)?;
        writeln!(f, "Word Count: {}", self.word_count)?;
        writeln!(f, "Unique Word Count: {}", self.unique_word_count())?;
        write!(f, "Words:")?;
        for (word, statistic) in self.words.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            write!(f, "\n  {word}: {} / {}", statistic.document_frequency, statistic.term_count)?;
        }
        Ok(())
    }
}

impl<W> CorpusDocumentStatistics for CorpusStatisticsCollector<W> where W: Hash + Eq {
    type Word = W;

    #[inline]
    fn document_count(&self) -> u64 {
        self.document_count
    }

    #[inline]
    fn word_count(&self) -> u64 {
        self.word_count
    }

    #[inline]
    fn unique_word_count(&self) -> usize {
        self.words.len()
    }

    fn document_frequency(&self, word: &W) -> Option<u64> {
        self.words.get(word).map(|value| value.document_frequency)
    }

    fn term_count(&self, word: &W) -> Option<u64> {
        self.words.get(word).map(|value| value.term_count)
    }
}

#[cfg(test)]
mod test {
    use super::{CorpusDocumentStatistics, CorpusStatisticsCollector};

    #[test]
    fn counts_documents_and_terms() {
        let mut statistics = CorpusStatisticsCollector::default();
        statistics.add("tin giả tin giả lừa_đảo".split(' '));
        statistics.add("tin thật".split(' '));
        statistics.add(std::iter::empty());
        assert_eq!(3, statistics.document_count());
        assert_eq!(7, statistics.word_count());
        assert_eq!(4, statistics.unique_word_count());
        assert_eq!(Some(2), statistics.document_frequency(&"tin"));
        assert_eq!(Some(3), statistics.term_count(&"tin"));
        assert_eq!(Some(1), statistics.document_frequency(&"giả"));
        assert_eq!(Some(2), statistics.term_count(&"giả"));
        assert_eq!(None, statistics.document_frequency(&"thế"));
    }

    #[test]
    fn displays_sorted() {
        let mut statistics = CorpusStatisticsCollector::default();
        statistics.add(["b", "a", "b"]);
        assert_eq!(
            "Document Count: 1\nWord Count: 3\nUnique Word Count: 2\nWords:\n  a: 1 / 1\n  b: 1 / 2",
            statistics.to_string()
        );
    }
}
