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

use std::fs::File;
use std::io::BufWriter;
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use crate::app::args::{RunMode, TingiaArgs};
use crate::config::Configs;

/// The log level of a prediction without a configured level.
pub const PREDICT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Warn;

/// The kind of instruction provided by the args.
#[derive(Debug)]
pub enum Instruction {
    Train(Configs),
    Predict { configs: Configs, text: Vec<String> },
    Nothing,
}

#[derive(Debug, Error)]
pub enum InstructionError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error(transparent)]
    ConfigError(#[from] config::ConfigError),
    #[error(transparent)]
    ConfigSerialisationError(#[from] serde_json::Error),
    #[error("The config {0} already exists, delete it before regenerating!")]
    ConfigAlreadyExists(Utf8PathBuf),
}

fn load_configs(folder: Option<Utf8PathBuf>) -> Result<Configs, InstructionError> {
    Ok(match folder {
        None => Configs::discover_or_default(),
        Some(path) => Configs::load_from(path),
    }?)
}

/// Writes the default config as `tingia.json` to [folder].
pub fn write_default_config(folder: &Utf8Path) -> Result<Utf8PathBuf, InstructionError> {
    std::fs::create_dir_all(folder)?;
    let path = folder.join("tingia.json");
    if path.exists() {
        return Err(InstructionError::ConfigAlreadyExists(path));
    }
    let file = File::options().create_new(true).write(true).open(&path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &Configs::default())?;
    Ok(path)
}

/// Consumes the args and returns everything necessary to execute tingia
pub fn prepare_instruction(args: TingiaArgs) -> Result<Instruction, InstructionError> {
    match args.mode {
        RunMode::Train {
            config,
            dataset,
            model,
            stopwords,
            log_level,
            log_to_file,
        } => {
            let mut configs = load_configs(config)?;
            if let Some(dataset) = dataset {
                configs.paths.dataset = dataset;
            }
            if let Some(model) = model {
                configs.paths.model = model;
            }
            if let Some(stopwords) = stopwords {
                configs.paths.stopwords = stopwords;
            }
            if let Some(log_level) = log_level {
                configs.system.log_level = Some(log_level);
            }
            configs.system.log_to_file |= log_to_file;
            Ok(Instruction::Train(configs))
        }
        RunMode::Predict {
            config,
            model,
            log_level,
            text,
        } => {
            let mut configs = load_configs(config)?;
            if let Some(model) = model {
                configs.paths.model = model;
            }
            configs.system.log_level = log_level
                .or(configs.system.log_level)
                .or(Some(PREDICT_LOG_LEVEL));
            Ok(Instruction::Predict { configs, text })
        }
        RunMode::Init { config } => {
            let folder = config.unwrap_or_else(|| Utf8PathBuf::from("."));
            let path = write_default_config(&folder)?;
            println!("Created the default config at {path}.");
            Ok(Instruction::Nothing)
        }
    }
}

#[cfg(test)]
mod test {
    use camino::Utf8Path;
    use camino_tempfile::tempdir;
    use crate::app::args::{RunMode, TingiaArgs};
    use crate::config::Configs;
    use super::{prepare_instruction, write_default_config, Instruction, InstructionError, PREDICT_LOG_LEVEL};

    #[test]
    fn default_config_is_loadable() {
        let dir = tempdir().unwrap();
        let path = write_default_config(dir.path()).unwrap();
        assert!(path.exists());
        let loaded: Configs = serde_json::from_reader(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(Configs::default(), loaded);
        assert!(matches!(
            write_default_config(dir.path()),
            Err(InstructionError::ConfigAlreadyExists(_))
        ));
    }

    #[test]
    fn args_override_the_config() {
        let dir = tempdir().unwrap();
        let args = TingiaArgs {
            mode: RunMode::Predict {
                config: Some(dir.path().to_path_buf()),
                model: Some(dir.path().join("model.bin")),
                log_level: Some(log::LevelFilter::Error),
                text: vec!["tin".to_string()],
            },
        };
        match prepare_instruction(args).unwrap() {
            Instruction::Predict { configs, text } => {
                assert_eq!(dir.path().join("model.bin"), configs.paths.model);
                assert_eq!(log::LevelFilter::Error, configs.system.log_level());
                assert_eq!(vec!["tin"], text);
            }
            other => panic!("Expected predict but got {other:?}"),
        }
    }

    fn predict_log_level(config_dir: &Utf8Path, log_level: Option<log::LevelFilter>) -> log::LevelFilter {
        let args = TingiaArgs {
            mode: RunMode::Predict {
                config: Some(config_dir.to_path_buf()),
                model: None,
                log_level,
                text: Vec::new(),
            },
        };
        match prepare_instruction(args).unwrap() {
            Instruction::Predict { configs, .. } => configs.system.log_level(),
            other => panic!("Expected predict but got {other:?}"),
        }
    }

    #[test]
    fn predict_log_level_precedence() {
        let empty = tempdir().unwrap();
        assert_eq!(PREDICT_LOG_LEVEL, predict_log_level(empty.path(), None));

        let configured = tempdir().unwrap();
        std::fs::write(
            configured.path().join("tingia.json"),
            r#"{"system": {"log_level": "Debug"}}"#,
        ).unwrap();
        assert_eq!(log::LevelFilter::Debug, predict_log_level(configured.path(), None));
        assert_eq!(
            log::LevelFilter::Error,
            predict_log_level(configured.path(), Some(log::LevelFilter::Error))
        );
    }
}
