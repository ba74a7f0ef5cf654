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

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Tells real from fake Vietnamese news.
pub struct TingiaArgs {
    /// The mode of tingia
    #[command(subcommand)]
    pub mode: RunMode,
}

#[derive(Subcommand, Debug)]
pub enum RunMode {
    /// Trains the random forest on a labeled dataset and saves the model bundle.
    Train {
        /// The folder containing the configs.
        #[arg(short, long)]
        config: Option<Utf8PathBuf>,
        /// The labeled csv, overrides the config.
        #[arg(long)]
        dataset: Option<Utf8PathBuf>,
        /// Where to save the model bundle, overrides the config.
        #[arg(long)]
        model: Option<Utf8PathBuf>,
        /// The stopword file, overrides the config.
        #[arg(long)]
        stopwords: Option<Utf8PathBuf>,
        /// Overrides the log level from the config.
        #[arg(long)]
        log_level: Option<log::LevelFilter>,
        /// Log to file
        #[arg(long)]
        log_to_file: bool,
    },
    /// Classifies a text, read from the arguments or stdin, and prints the verdict as JSON.
    Predict {
        /// The folder containing the configs.
        #[arg(short, long)]
        config: Option<Utf8PathBuf>,
        /// The model bundle, overrides the config.
        #[arg(long)]
        model: Option<Utf8PathBuf>,
        /// Overrides the log level from the config, warn if neither is set. Only stderr is used for logging.
        #[arg(long)]
        log_level: Option<log::LevelFilter>,
        /// The text to classify, stdin is read if missing.
        text: Vec<String>,
    },
    /// Writes the default config to a folder.
    Init {
        /// The target folder, the working directory if not set.
        #[arg(short, long)]
        config: Option<Utf8PathBuf>,
    },
}
