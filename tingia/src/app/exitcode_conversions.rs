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

use std::process::ExitCode;
use crate::app::instruction::InstructionError;
use crate::bundle::BundleError;
use crate::dataset::DatasetError;
use crate::inference::InferenceError;
use crate::training::TrainingError;

impl From<&InstructionError> for ExitCode {
    fn from(value: &InstructionError) -> Self {
        match value {
            InstructionError::IOError(_) => ExitCode::from(2),
            InstructionError::ConfigError(_) => ExitCode::from(3),
            InstructionError::ConfigSerialisationError(_) => ExitCode::from(4),
            InstructionError::ConfigAlreadyExists(_) => ExitCode::from(5),
        }
    }
}

/// Every failed prediction exits with 1, the details are in the printed JSON.
impl From<&InferenceError> for ExitCode {
    fn from(_: &InferenceError) -> Self {
        ExitCode::from(1)
    }
}

impl From<&TrainingError> for ExitCode {
    fn from(value: &TrainingError) -> Self {
        match value {
            TrainingError::Dataset(value) => match value {
                DatasetError::NotFound(_) => 11u8,
                DatasetError::MissingColumn(_) => 12,
                DatasetError::InvalidLabel { .. } => 13,
                DatasetError::Empty => 14,
                DatasetError::IO(_) => 15,
                DatasetError::CSV(_) => 16,
            }
            .into(),
            TrainingError::Stopwords(_) => ExitCode::from(20),
            TrainingError::Segmenter(_) => ExitCode::from(21),
            TrainingError::Vectorizer(_) => ExitCode::from(30),
            TrainingError::Split(_) => ExitCode::from(40),
            TrainingError::Classifier(_) => ExitCode::from(50),
            TrainingError::Bundle(value) => match value {
                BundleError::IO(_) => 60u8,
                BundleError::Serialisation(_) => 61,
                BundleError::NotABundle
                | BundleError::UnsupportedVersion { .. }
                | BundleError::FeatureMismatch { .. } => 62,
            }
            .into(),
            TrainingError::Inference(_) => ExitCode::from(70),
        }
    }
}
