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

use camino::Utf8Path;
use config::Config;
use forest::ForestConfig;
use serde::{Deserialize, Serialize};
use text_processing::configs::{SegmenterConfig, VectorizerConfig};
use text_processing::segmenter::SegmenterError;
use text_processing::Tokenizer;
use crate::config::{DatasetConfig, PathsConfig, SplitConfig, SystemConfig};

/// A collection of all configs used for training and inference.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename(serialize = "Config"))]
pub struct Configs {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub segmenter: SegmenterConfig,
    #[serde(default)]
    pub vectorizer: VectorizerConfig,
    #[serde(default)]
    pub forest: ForestConfig,
    #[serde(default)]
    pub split: SplitConfig,
}

impl Configs {
    /// Loads the configs from the working directory and [folder].
    /// Later sources override earlier ones, environment variables with the
    /// prefix `TINGIA` override everything.
    pub fn load_from<P: AsRef<Utf8Path>>(folder: P) -> Result<Self, config::ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("./config").required(false))
            .add_source(config::File::with_name("./tingia").required(false))
            .add_source(config::File::with_name(folder.as_ref().join("tingia").as_str()).required(false))
            .add_source(config::File::with_name(folder.as_ref().join("config").as_str()).required(false))
            .add_source(config::Environment::with_prefix("TINGIA").separator(".").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Tries to find a config at the default locations
    pub fn discover_or_default() -> Result<Self, config::ConfigError> {
        match Config::builder()
            .add_source(config::File::with_name("./config").required(false))
            .add_source(config::File::with_name("./tingia").required(false))
            .add_source(config::File::with_name("data/config").required(false))
            .add_source(config::File::with_name("data/tingia").required(false))
            .add_source(config::Environment::with_prefix("TINGIA").separator(".").try_parsing(true))
            .build()
        {
            Ok(value) => value.try_deserialize(),
            Err(_) => Ok(Default::default()),
        }
    }

    /// The segmenter config, a lexicon in the paths is used if the segmenter names none.
    pub fn segmenter_config(&self) -> SegmenterConfig {
        let mut segmenter = self.segmenter.clone();
        if segmenter.lexicon.is_none() {
            segmenter.lexicon = self.paths.lexicon.clone();
        }
        segmenter
    }

    pub fn tokenizer(&self) -> Result<Tokenizer, SegmenterError> {
        Tokenizer::from_config(&self.segmenter_config())
    }
}

#[cfg(test)]
mod test {
    use std::fs::File;
    use std::io::BufWriter;
    use camino::Utf8PathBuf;
    use camino_tempfile::tempdir;
    use scopeguard::defer;
    use text_processing::configs::{DocumentFrequency, SegmenterKind};
    use super::Configs;

    #[test]
    fn can_create_hierarchical_config() {
        let dir = tempdir().unwrap();
        let mut config = Configs::default();
        config.split.seed = 99;
        config.segmenter.kind = SegmenterKind::Syllable;
        config.forest.n_trees = 10;
        serde_json::to_writer(
            BufWriter::new(File::create(dir.path().join("tingia.json")).unwrap()),
            &config,
        )
        .unwrap();

        std::env::set_var("TINGIA.SYSTEM.LOG_TO_FILE", "true");
        std::env::set_var("TINGIA.VECTORIZER.MAX_DF", "0.9");
        std::env::set_var("TINGIA.VECTORIZER.MIN_DF", "3");
        defer! {
            std::env::remove_var("TINGIA.SYSTEM.LOG_TO_FILE");
            std::env::remove_var("TINGIA.VECTORIZER.MAX_DF");
            std::env::remove_var("TINGIA.VECTORIZER.MIN_DF");
        }

        let loaded = Configs::load_from(dir.path()).unwrap();
        config.system.log_to_file = true;
        config.vectorizer.max_df = DocumentFrequency::Ratio(0.9);
        config.vectorizer.min_df = DocumentFrequency::Count(3);
        assert_eq!(config, loaded);
    }

    #[test]
    fn partial_configs_use_defaults() {
        let loaded: Configs = serde_json::from_str(r#"{"paths": {"model": "out/model.bin"}}"#).unwrap();
        assert_eq!(Utf8PathBuf::from("out/model.bin"), loaded.paths.model);
        assert_eq!(Configs::default().paths.dataset, loaded.paths.dataset);
        assert_eq!(Configs::default().forest, loaded.forest);
        assert_eq!(0.2, loaded.split.test_size);
    }

    #[test]
    fn lexicon_of_the_paths_is_a_fallback() {
        let mut config = Configs::default();
        assert_eq!(None, config.segmenter_config().lexicon);
        config.paths.lexicon = Some("data/lexicon.txt".into());
        assert_eq!(Some(Utf8PathBuf::from("data/lexicon.txt")), config.segmenter_config().lexicon);
        config.segmenter.lexicon = Some("other.txt".into());
        assert_eq!(Some(Utf8PathBuf::from("other.txt")), config.segmenter_config().lexicon);
    }
}
