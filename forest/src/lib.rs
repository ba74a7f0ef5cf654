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

//! Random forest classification of sparse document vectors.

pub mod config;
pub mod error;
pub mod label;
pub mod metrics;
pub mod random_forest;
pub mod traits;
pub mod tree;
pub mod weights;

pub use config::ForestConfig;
pub use error::ForestError;
pub use label::Label;
pub use random_forest::RandomForestClassifier;
pub use traits::{Classifier, Probabilities};
