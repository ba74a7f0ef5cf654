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

/// Config of the system, basically logging.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename(serialize = "System"))]
pub struct SystemConfig {
    /// The log level of the application, each mode has its own default if missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<log::LevelFilter>,

    /// Log to a file?
    #[serde(default)]
    pub log_to_file: bool,
}

impl SystemConfig {
    pub const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;

    /// The configured level or [Self::DEFAULT_LOG_LEVEL].
    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.unwrap_or(Self::DEFAULT_LOG_LEVEL)
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            log_to_file: false,
        }
    }
}
