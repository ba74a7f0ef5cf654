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

//! Training of a [ModelBundle] from a labeled dataset.

use std::fmt::{Display, Formatter};
use camino::Utf8PathBuf;
use forest::metrics::ClassificationReport;
use forest::{Classifier, ForestError, Label, RandomForestClassifier};
use text_processing::segmenter::SegmenterError;
use text_processing::{load_stopwords, StopWordList, TfIdfVectorizer, Tokenizer, VectorizerError};
use thiserror::Error;
use crate::bundle::{BundleError, ModelBundle};
use crate::config::Configs;
use crate::dataset::{load_dataset, DatasetError, LabeledDocuments};
use crate::inference::InferenceError;
use crate::split::{stratified_split, SplitError, TrainTestSplit};
use crate::verdict::Verdict;

/// Headlines classified after every training as a sanity check.
pub const SMOKE_TEST_HEADLINES: [&str; 5] = [
    "Lập sàn giao dịch giả, lừa đảo hàng chục tỷ đồng của nhà đầu tư",
    "Công an Hà Nội phát hiện 20 tấn gà 'bẩn' sắp tuồn ra chợ, nhà hàng",
    "Tâm sự của thầy giáo lên tiếng giải cứu 2 cháu nhỏ bị cha xích nhốt",
    "cứu thêm 4 nạn nhân trong ô-tô sau vụ sập cầu Phong Châu",
    "Phó chủ tịch Pfizer bị bắt",
];

/// An error aborting a training run.
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("Failed to read the stopwords: {0}")]
    Stopwords(#[source] std::io::Error),
    #[error(transparent)]
    Segmenter(#[from] SegmenterError),
    #[error(transparent)]
    Vectorizer(#[from] VectorizerError),
    #[error(transparent)]
    Split(#[from] SplitError),
    #[error(transparent)]
    Classifier(#[from] ForestError),
    #[error(transparent)]
    Bundle(#[from] BundleError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// A headline of the smoke test and what the trained model says about it.
#[derive(Debug, Clone, PartialEq)]
pub struct SmokeTest {
    pub headline: String,
    pub verdict: Verdict,
}

/// The outcome of a training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Number of valid rows in the dataset
    pub documents: usize,
    pub vocabulary_size: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub evaluation: ClassificationReport,
    pub smoke_tests: Vec<SmokeTest>,
    pub bundle_path: Utf8PathBuf,
}

impl Display for TrainingReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Documents: {}", self.documents)?;
        writeln!(f, "Vocabulary: {} tokens", self.vocabulary_size)?;
        writeln!(f, "Train / Test: {} / {}", self.train_size, self.test_size)?;
        writeln!(f)?;
        writeln!(f, "{}", self.evaluation)?;
        writeln!(f, "Test accuracy: {:.2}%", self.evaluation.accuracy * 100.0)?;
        writeln!(f, "Saved the model to {}", self.bundle_path)?;
        writeln!(f)?;
        write!(f, "Smoke test:")?;
        for smoke_test in &self.smoke_tests {
            write!(
                f,
                "\n  {}\n  Result: {} | Confidence: {:.2}%",
                smoke_test.headline,
                smoke_test.verdict.label(),
                smoke_test.verdict.confidence() * 100.0
            )?;
        }
        Ok(())
    }
}

/// A bundle fitted on the train split and its evaluation on the test split.
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub bundle: ModelBundle,
    pub split: TrainTestSplit,
    pub evaluation: ClassificationReport,
}

/// Fits the vectorizer on all [documents] and the forest on the train split,
/// then evaluates the forest on the test split.
pub fn fit_model(
    documents: &LabeledDocuments,
    tokenizer: Tokenizer,
    stop_words: &StopWordList,
    configs: &Configs,
) -> Result<FittedModel, TrainingError> {
    log::info!("Extract the TF-IDF features...");
    let (extractor, matrix) = TfIdfVectorizer::fit(&documents.texts, tokenizer, stop_words, &configs.vectorizer)?;
    log::info!("Number of features: {}", extractor.n_features());

    let split = stratified_split(&documents.labels, &configs.split)?;
    let select_labels = |rows: &[usize]| rows.iter().map(|row| documents.labels[*row]).collect::<Vec<Label>>();

    let mut classifier = RandomForestClassifier::new(configs.forest.clone());
    classifier.fit(&matrix.select(&split.train), &select_labels(&split.train))?;
    log::info!("Training finished.");

    let truth = select_labels(&split.test);
    let predicted = classifier.predict_all(&matrix.select(&split.test))?;
    let evaluation = ClassificationReport::new(&truth, &predicted)?;
    log::info!("Evaluation on {} samples:\n{evaluation}", truth.len());

    Ok(FittedModel {
        bundle: ModelBundle::new(classifier, extractor)?,
        split,
        evaluation,
    })
}

/// Classifies the [SMOKE_TEST_HEADLINES] with [bundle].
pub fn smoke_test(bundle: &ModelBundle) -> Result<Vec<SmokeTest>, TrainingError> {
    SMOKE_TEST_HEADLINES
        .iter()
        .map(|headline| -> Result<SmokeTest, TrainingError> {
            let verdict = bundle.predict(headline)?;
            log::info!(
                "{headline} -> {} ({:.2}%)",
                verdict.label(),
                verdict.confidence() * 100.0
            );
            Ok(SmokeTest {
                headline: headline.to_string(),
                verdict,
            })
        })
        .collect()
}

/// Trains and saves a model as configured by [configs].
pub fn train(configs: &Configs) -> Result<TrainingReport, TrainingError> {
    log::info!("Start training the random forest for real and fake news.");
    let documents = load_dataset(&configs.paths.dataset, &configs.dataset)?;
    let tokenizer = configs.tokenizer()?;
    let stop_words = load_stopwords(&configs.paths.stopwords, &tokenizer).map_err(TrainingError::Stopwords)?;

    let FittedModel { bundle, split, evaluation } = fit_model(&documents, tokenizer, &stop_words, configs)?;
    bundle.save(&configs.paths.model)?;
    let smoke_tests = smoke_test(&bundle)?;

    Ok(TrainingReport {
        documents: documents.len(),
        vocabulary_size: bundle.extractor().n_features(),
        train_size: split.train.len(),
        test_size: split.test.len(),
        evaluation,
        smoke_tests,
        bundle_path: configs.paths.model.clone(),
    })
}
