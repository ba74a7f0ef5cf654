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

use thiserror::Error;
use crate::label::Label;

/// An error while fitting or querying a classifier
#[derive(Debug, Error)]
pub enum ForestError {
    #[error("Got {samples} samples but {labels} labels!")]
    LengthMismatch { samples: usize, labels: usize },
    #[error("Can not fit without any sample!")]
    EmptyMatrix,
    #[error("Only the class {0} is present, at least two classes are needed!")]
    SingleClass(Label),
    #[error("Expected {expected} features but got {actual}!")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("The classifier is not fitted!")]
    NotFitted,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
