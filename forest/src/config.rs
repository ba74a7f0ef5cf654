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
use crate::error::ForestError;

/// How the samples of a class are weighted.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassWeight {
    /// Every sample weighs 1
    Uniform,
    /// Classes are weighted inversely to their frequency: `n_samples / (n_classes * count)`
    #[default]
    Balanced,
}

/// The number of features drawn at every split.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaxFeatures {
    /// `floor(sqrt(n_features))`
    #[default]
    Sqrt,
    /// `floor(log2(n_features))`
    Log2,
    All,
    Count(usize),
}

impl MaxFeatures {
    /// The number of features for [n_features] available features, at least 1.
    pub fn resolve(&self, n_features: usize) -> usize {
        let value = match *self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2().floor() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Count(value) => value.min(n_features),
        };
        value.max(1)
    }
}

/// The config of the random forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the forest
    #[serde(default = "_default_n_trees")]
    pub n_trees: usize,
    /// Maximum depth of each tree
    #[serde(default = "_default_max_depth")]
    pub max_depth: usize,
    /// Minimum samples to split a node
    #[serde(default = "_default_min_samples_split")]
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    #[serde(default = "_default_min_samples_leaf")]
    pub min_samples_leaf: usize,
    #[serde(default)]
    pub max_features: MaxFeatures,
    #[serde(default)]
    pub class_weight: ClassWeight,
    /// Bootstrap sampling
    #[serde(default = "_default_bootstrap")]
    pub bootstrap: bool,
    /// Random seed, the tree at index `i` uses `seed + i`
    #[serde(default = "_default_seed")]
    pub seed: u64,
    /// Size of a dedicated thread pool, the global pool is used if not set
    #[serde(default)]
    pub threads: Option<usize>,
}

const fn _default_n_trees() -> usize {
    300
}
const fn _default_max_depth() -> usize {
    20
}
const fn _default_min_samples_split() -> usize {
    5
}
const fn _default_min_samples_leaf() -> usize {
    2
}
const fn _default_bootstrap() -> bool {
    true
}
const fn _default_seed() -> u64 {
    42
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: _default_n_trees(),
            max_depth: _default_max_depth(),
            min_samples_split: _default_min_samples_split(),
            min_samples_leaf: _default_min_samples_leaf(),
            max_features: MaxFeatures::default(),
            class_weight: ClassWeight::default(),
            bootstrap: _default_bootstrap(),
            seed: _default_seed(),
            threads: None,
        }
    }
}

impl ForestConfig {
    pub fn validate(&self) -> Result<(), ForestError> {
        if self.n_trees == 0 {
            return Err(ForestError::InvalidConfig("n_trees must be at least 1".to_string()));
        }
        if self.max_depth == 0 {
            return Err(ForestError::InvalidConfig("max_depth must be at least 1".to_string()));
        }
        if self.min_samples_split < 2 {
            return Err(ForestError::InvalidConfig("min_samples_split must be at least 2".to_string()));
        }
        if self.min_samples_leaf == 0 {
            return Err(ForestError::InvalidConfig("min_samples_leaf must be at least 1".to_string()));
        }
        if matches!(self.max_features, MaxFeatures::Count(0)) {
            return Err(ForestError::InvalidConfig("max_features must be at least 1".to_string()));
        }
        if self.threads == Some(0) {
            return Err(ForestError::InvalidConfig("threads must be at least 1".to_string()));
        }
        Ok(())
    }
}
