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

use forest::Label;
use serde::{Deserialize, Serialize};

/// The answer for a single document.
///
/// Serializes to `{"isFake", "label", "confidence", "originalText"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    is_fake: bool,
    label: Label,
    confidence: f64,
    original_text: String,
}

impl Verdict {
    /// A verdict for [label], the confidence is clamped to `[0, 1]`.
    pub fn new(label: Label, confidence: f64, original_text: String) -> Self {
        Self {
            is_fake: label.is_fake(),
            label,
            confidence: if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) },
            original_text,
        }
    }

    /// The verdict for a document without any known token.
    pub fn fallback(original_text: String) -> Self {
        Self::new(Label::Real, 0.0, original_text)
    }

    pub fn is_fake(&self) -> bool {
        self.is_fake
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// The normalized input text
    pub fn original_text(&self) -> &str {
        &self.original_text
    }
}
