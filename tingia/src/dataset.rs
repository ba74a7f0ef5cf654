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

use std::fs::File;
use std::io::{BufReader, Read};
use camino::{Utf8Path, Utf8PathBuf};
use forest::label::InvalidLabel;
use forest::Label;
use forest::weights::class_counts;
use text_processing::normalize_text;
use thiserror::Error;
use crate::config::DatasetConfig;

/// An error while reading the training data
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("The dataset {0} was not found!")]
    NotFound(Utf8PathBuf),
    #[error("The dataset has no column '{0}'!")]
    MissingColumn(String),
    #[error("Line {line}: {source}")]
    InvalidLabel {
        line: u64,
        #[source]
        source: InvalidLabel,
    },
    #[error("The dataset contains no valid rows!")]
    Empty,
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    CSV(#[from] csv::Error),
}

/// The normalized texts and their labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledDocuments {
    pub texts: Vec<String>,
    pub labels: Vec<Label>,
}

impl LabeledDocuments {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn push(&mut self, text: String, label: Label) {
        self.texts.push(text);
        self.labels.push(label);
    }
}

/// Reads the train data from a csv at [path].
pub fn load_dataset(path: impl AsRef<Utf8Path>, cfg: &DatasetConfig) -> Result<LabeledDocuments, DatasetError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }
    log::info!("Read the dataset {path}.");
    read_dataset(BufReader::new(File::open(path)?), cfg)
}

/// Reads the train data as csv with headers from [reader].
///
/// Texts are normalized, rows with an empty text or a label that is not a number
/// are dropped. A label that is a number other than 0 or 1 is an error.
pub fn read_dataset<R: Read>(reader: R, cfg: &DatasetConfig) -> Result<LabeledDocuments, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new();
    csv_reader.has_headers(true).flexible(true);
    let mut csv_reader = csv_reader.from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|value| value.trim() == name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    };
    let text_column = column(&cfg.text_column)?;
    let label_column = column(&cfg.label_column)?;

    let mut documents = LabeledDocuments::default();
    let mut dropped = 0usize;
    for record in csv_reader.records() {
        let record = record?;
        let Some(label) = record.get(label_column).and_then(coerce_label) else {
            dropped += 1;
            continue;
        };
        let label = label.map_err(|source| DatasetError::InvalidLabel {
            line: record.position().map_or(0, |position| position.line()),
            source,
        })?;
        let text = normalize_text(record.get(text_column).unwrap_or_default());
        if text.is_empty() {
            dropped += 1;
            continue;
        }
        documents.push(text, label);
    }

    if documents.is_empty() {
        return Err(DatasetError::Empty);
    }
    let [real, fake] = class_counts(&documents.labels);
    log::info!("Valid rows: {} ({dropped} dropped)", documents.len());
    log::info!("Label distribution: {real} x {}, {fake} x {}", Label::Real, Label::Fake);
    Ok(documents)
}

/// None if [value] is not a number.
fn coerce_label(value: &str) -> Option<Result<Label, InvalidLabel>> {
    let value = value.trim().parse::<f64>().ok()?;
    if value.is_nan() {
        None
    } else {
        Some(Label::try_from(value))
    }
}
