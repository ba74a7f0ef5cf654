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

mod args;
mod exitcode_conversions;
mod instruction;
mod logging;

use std::process::ExitCode;
pub use args::{RunMode, TingiaArgs};
pub use instruction::{prepare_instruction, Instruction, InstructionError};
pub use logging::{configure_logging, LoggingError};
use crate::config::Configs;
use crate::inference::{run, InferenceReport};
use crate::training::train;

pub fn exec_args(args: TingiaArgs) -> ExitCode {
    let predicting = matches!(args.mode, RunMode::Predict { .. });
    match prepare_instruction(args) {
        Ok(Instruction::Train(configs)) => {
            init_logging(&configs);
            match train(&configs) {
                Ok(report) => {
                    println!("{report}");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    log::error!("Training failed: {err}");
                    (&err).into()
                }
            }
        }
        Ok(Instruction::Predict { configs, text }) => {
            init_logging(&configs);
            let result = run(&configs.paths.model, &text, std::io::stdin().lock());
            let exit_code = match &result {
                Ok(verdict) => {
                    log::info!("Classified as {} with {:.4}.", verdict.label(), verdict.confidence());
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    log::warn!("Prediction failed: {err}");
                    err.into()
                }
            };
            println!("{}", InferenceReport::from(result).to_json());
            exit_code
        }
        Ok(Instruction::Nothing) => ExitCode::SUCCESS,
        Err(err) if predicting => {
            eprintln!("Failed with: {err}");
            println!("{}", InferenceReport::Error { error: err.to_string() }.to_json());
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Failed with: {err}");
            (&err).into()
        }
    }
}

fn init_logging(configs: &Configs) {
    if let Err(err) = configure_logging(configs) {
        eprintln!("Failed to configure the logging: {err}");
    }
}
