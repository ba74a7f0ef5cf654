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

//! Fixtures shared by the tests of this crate.

use forest::{Classifier, ForestConfig, Label, RandomForestClassifier};
use text_processing::configs::VectorizerConfig;
use text_processing::{SparseMatrix, StopWordList, TfIdfVectorizer, Tokenizer};
use crate::bundle::ModelBundle;
use crate::config::DatasetConfig;
use crate::dataset::{read_dataset, LabeledDocuments};

pub const NEWS_CSV: &str = include_str!("../testdata/news.csv");

pub fn news() -> LabeledDocuments {
    read_dataset(NEWS_CSV.as_bytes(), &DatasetConfig::default()).unwrap()
}

pub fn small_forest_config() -> ForestConfig {
    ForestConfig {
        n_trees: 40,
        min_samples_split: 2,
        min_samples_leaf: 1,
        ..ForestConfig::default()
    }
}

pub fn fitted_extractor() -> (TfIdfVectorizer, SparseMatrix, Vec<Label>) {
    let news = news();
    let stop_words = StopWordList::from_phrases(["của", "và", "cho", "trong"], &Tokenizer::default());
    let (extractor, matrix) = TfIdfVectorizer::fit(
        &news.texts,
        Tokenizer::default(),
        &stop_words,
        &VectorizerConfig::default(),
    )
    .unwrap();
    (extractor, matrix, news.labels)
}

pub fn fitted_bundle() -> ModelBundle {
    let (extractor, matrix, labels) = fitted_extractor();
    let mut classifier = RandomForestClassifier::new(small_forest_config());
    classifier.fit(&matrix, &labels).unwrap();
    ModelBundle::new(classifier, extractor).unwrap()
}
