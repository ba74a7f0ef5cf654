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

/// The columns of the training data.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DatasetConfig {
    #[serde(default = "_default_text_column")]
    pub text_column: String,
    /// Values have to be numbers, 0 for real and 1 for fake news
    #[serde(default = "_default_label_column")]
    pub label_column: String,
}

fn _default_text_column() -> String {
    "content".to_string()
}
fn _default_label_column() -> String {
    "label".to_string()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            text_column: _default_text_column(),
            label_column: _default_label_column(),
        }
    }
}
