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

//! Classification of Vietnamese news as real or fake with TF-IDF features and a
//! random forest.

pub mod app;
pub mod bundle;
pub mod config;
pub mod dataset;
pub mod inference;
pub mod split;
pub mod training;
pub mod verdict;

#[cfg(test)]
mod test_impls;

pub use bundle::{BundleError, ModelBundle};
pub use config::Configs;
pub use dataset::DatasetError;
pub use inference::{InferenceError, InferenceReport};
pub use training::{TrainingError, TrainingReport};
pub use verdict::Verdict;
