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

/// Paths to the data used and produced by the application.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename(serialize = "Paths"))]
pub struct PathsConfig {
    /// The labeled training data (CSV)
    #[serde(default = "_default_dataset")]
    pub dataset: Utf8PathBuf,
    /// Newline delimited stopwords, ignored if missing
    #[serde(default = "_default_stopwords")]
    pub stopwords: Utf8PathBuf,
    /// Newline delimited compounds for the segmenter
    #[serde(default)]
    pub lexicon: Option<Utf8PathBuf>,
    /// The model bundle
    #[serde(default = "_default_model")]
    pub model: Utf8PathBuf,
    /// Folder of the log file
    #[serde(default = "_default_log_dir")]
    pub log_dir: Utf8PathBuf,
}

fn _default_dataset() -> Utf8PathBuf {
    "data/du_lieu_tin_tuc.csv".into()
}
fn _default_stopwords() -> Utf8PathBuf {
    "data/vietnamese-stopwords.txt".into()
}
fn _default_model() -> Utf8PathBuf {
    "data/fake_news_rf_model.bin".into()
}
fn _default_log_dir() -> Utf8PathBuf {
    ".".into()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            dataset: _default_dataset(),
            stopwords: _default_stopwords(),
            lexicon: None,
            model: _default_model(),
            log_dir: _default_log_dir(),
        }
    }
}

impl PathsConfig {
    pub fn log_file(&self) -> Utf8PathBuf {
        self.log_dir.join("tingia.log")
    }
}
