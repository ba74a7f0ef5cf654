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

//! The classifier and the vectorizer it was fitted with, persisted as one file.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use camino::Utf8Path;
use camino_tempfile::NamedUtf8TempFile;
use forest::{Classifier, RandomForestClassifier};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use text_processing::TfIdfVectorizer;
use thiserror::Error;
use crate::inference::{classify, InferenceError};
use crate::verdict::Verdict;

/// Marks a file as model bundle.
pub const BUNDLE_MAGIC: [u8; 8] = *b"TINGIARF";
/// The only readable layout of a bundle.
pub const BUNDLE_FORMAT_VERSION: u16 = 1;

/// An error while saving or loading a [ModelBundle]
#[derive(Debug, Error)]
pub enum BundleError {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Serialisation(#[from] bincode::Error),
    #[error("The file is not a model bundle!")]
    NotABundle,
    #[error("The bundle has the format version {found} but only {expected} is supported!")]
    UnsupportedVersion { found: u16, expected: u16 },
    #[error("The classifier expects {classifier} features but the vocabulary has {vocabulary} tokens!")]
    FeatureMismatch { classifier: usize, vocabulary: usize },
}

#[derive(Debug, Serialize, Deserialize)]
struct BundleHeader {
    magic: [u8; 8],
    format_version: u16,
}

impl BundleHeader {
    const fn current() -> Self {
        Self {
            magic: BUNDLE_MAGIC,
            format_version: BUNDLE_FORMAT_VERSION,
        }
    }

    fn check(&self) -> Result<(), BundleError> {
        if self.magic != BUNDLE_MAGIC {
            return Err(BundleError::NotABundle);
        }
        if self.format_version != BUNDLE_FORMAT_VERSION {
            return Err(BundleError::UnsupportedVersion {
                found: self.format_version,
                expected: BUNDLE_FORMAT_VERSION,
            });
        }
        Ok(())
    }
}

/// A classifier paired with the vectorizer that produced its training data.
///
/// Both halves are only ever saved and loaded together.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBundle<C = RandomForestClassifier> {
    classifier: C,
    extractor: TfIdfVectorizer,
}

impl<C: Classifier> ModelBundle<C> {
    /// Fails if [classifier] was not fitted on the vocabulary of [extractor].
    pub fn new(classifier: C, extractor: TfIdfVectorizer) -> Result<Self, BundleError> {
        if classifier.n_features() != extractor.n_features() {
            return Err(BundleError::FeatureMismatch {
                classifier: classifier.n_features(),
                vocabulary: extractor.n_features(),
            });
        }
        Ok(Self { classifier, extractor })
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn extractor(&self) -> &TfIdfVectorizer {
        &self.extractor
    }

    /// Classifies a raw [document].
    pub fn predict(&self, document: &str) -> Result<Verdict, InferenceError> {
        classify(&self.classifier, &self.extractor, document)
    }
}

impl<C: Classifier + Serialize> ModelBundle<C> {
    /// Writes the bundle to [path]. The data is written to a temporary file next
    /// to [path] first and renamed afterwards, a failed save leaves nothing behind.
    pub fn save(&self, path: impl AsRef<Utf8Path>) -> Result<(), BundleError> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        std::fs::create_dir_all(parent)?;
        let mut temp = NamedUtf8TempFile::new_in(parent)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            bincode::serialize_into(&mut writer, &BundleHeader::current())?;
            bincode::serialize_into(&mut writer, &(&self.classifier, &self.extractor))?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|err| err.error)?;
        log::info!("Saved the model bundle to {path}.");
        Ok(())
    }
}

impl<C: Classifier + DeserializeOwned> ModelBundle<C> {
    /// Reads a bundle written by [ModelBundle::save].
    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self, BundleError> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let header: BundleHeader = bincode::deserialize_from(&mut reader)?;
        header.check()?;
        let (classifier, extractor): (C, TfIdfVectorizer) = bincode::deserialize_from(&mut reader)?;
        let bundle = Self::new(classifier, extractor)?;
        log::debug!("Loaded the model bundle {path} with {} features.", bundle.extractor.n_features());
        Ok(bundle)
    }
}
