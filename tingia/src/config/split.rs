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

/// The holdout used to evaluate a trained model.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq)]
pub struct SplitConfig {
    /// The share of every class used for testing, between 0 and 1 (exclusive)
    #[serde(default = "_default_test_size")]
    pub test_size: f64,
    #[serde(default = "_default_seed")]
    pub seed: u64,
}

const fn _default_test_size() -> f64 {
    0.2
}
const fn _default_seed() -> u64 {
    42
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_size: _default_test_size(),
            seed: _default_seed(),
        }
    }
}
