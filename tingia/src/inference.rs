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

//! Classification of a single document with a persisted [ModelBundle].

use std::io::Read;
use camino::{Utf8Path, Utf8PathBuf};
use forest::{Classifier, ForestError, Label};
use serde::Serialize;
use text_processing::{normalize_text, TfIdfVectorizer, VectorizerError};
use thiserror::Error;
use crate::bundle::{BundleError, ModelBundle};
use crate::verdict::Verdict;

/// Everything that can stop a prediction.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("No text provided")]
    NoInput,
    #[error("Model not found at {0}")]
    ModelMissing(Utf8PathBuf),
    #[error(transparent)]
    Bundle(#[from] BundleError),
    #[error(transparent)]
    Vectorizer(#[from] VectorizerError),
    #[error(transparent)]
    Classifier(#[from] ForestError),
    #[error(transparent)]
    IO(#[from] std::io::Error),
}

/// The document is [args] joined by a space, or everything in [input] if there
/// are no args. A document that is blank after trimming counts as missing.
pub fn acquire_document<R: Read>(args: &[String], mut input: R) -> Result<String, InferenceError> {
    let document = if args.is_empty() {
        let mut buffer = String::new();
        input.read_to_string(&mut buffer)?;
        buffer
    } else {
        args.join(" ")
    };
    let document = document.trim();
    if document.is_empty() {
        Err(InferenceError::NoInput)
    } else {
        Ok(document.to_string())
    }
}

/// Normalizes and vectorizes [document] and asks [classifier] for a label.
///
/// A document without a single token of the vocabulary is [Label::Real] with a
/// confidence of 0, the classifier is not consulted for it.
pub fn classify<C>(classifier: &C, extractor: &TfIdfVectorizer, document: &str) -> Result<Verdict, InferenceError>
where
    C: Classifier + ?Sized,
{
    let normalized = normalize_text(document);
    let vector = extractor.transform(&normalized)?;
    if vector.is_empty() {
        log::debug!("No known token in \"{normalized}\", falling back to {}.", Label::Real);
        return Ok(Verdict::fallback(normalized));
    }
    let label = classifier.predict(&vector)?;
    let confidence = classifier.predict_proba(&vector)?.of(label);
    Ok(Verdict::new(label, confidence, normalized))
}

/// Acquires the document, loads the bundle at [model] and classifies the document.
pub fn run<R: Read>(model: impl AsRef<Utf8Path>, args: &[String], input: R) -> Result<Verdict, InferenceError> {
    let document = acquire_document(args, input)?;
    let model = model.as_ref();
    if !model.exists() {
        return Err(InferenceError::ModelMissing(model.to_path_buf()));
    }
    let bundle: ModelBundle = ModelBundle::load(model)?;
    bundle.predict(&document)
}

/// The single JSON line written for a prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InferenceReport {
    Verdict(Verdict),
    Error { error: String },
}

impl InferenceReport {
    pub fn is_error(&self) -> bool {
        matches!(self, InferenceReport::Error { .. })
    }

    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(value) => value,
            Err(err) => serde_json::json!({ "error": err.to_string() }).to_string(),
        }
    }
}

impl From<Result<Verdict, InferenceError>> for InferenceReport {
    fn from(value: Result<Verdict, InferenceError>) -> Self {
        match value {
            Ok(verdict) => InferenceReport::Verdict(verdict),
            Err(err) => InferenceReport::Error { error: err.to_string() },
        }
    }
}

#[cfg(test)]
mod test {
    use camino_tempfile::tempdir;
    use float_cmp::assert_approx_eq;
    use forest::{Classifier, ForestError, Label, Probabilities};
    use mockall::mock;
    use text_processing::configs::VectorizerConfig;
    use text_processing::{SparseMatrix, SparseVector, StopWordList, TfIdfVectorizer, Tokenizer};
    use crate::test_impls::{fitted_bundle, fitted_extractor, news};
    use crate::verdict::Verdict;
    use super::{acquire_document, classify, run, InferenceError, InferenceReport};

    mock! {
        Forest {}
        impl Classifier for Forest {
            fn fit(&mut self, x: &SparseMatrix, y: &[Label]) -> Result<(), ForestError>;
            fn predict(&self, x: &SparseVector) -> Result<Label, ForestError>;
            fn predict_proba(&self, x: &SparseVector) -> Result<Probabilities, ForestError>;
            fn n_features(&self) -> usize;
        }
    }

    #[test]
    fn args_are_joined() {
        let args = vec!["  Lừa".to_string(), "đảo  ".to_string()];
        assert_eq!("Lừa đảo", acquire_document(&args, "ignored".as_bytes()).unwrap());
        assert_eq!("tin tức", acquire_document(&[], "\n tin tức \n".as_bytes()).unwrap());
    }

    #[test]
    fn blank_input_is_missing() {
        assert!(matches!(acquire_document(&[], " \n\t".as_bytes()), Err(InferenceError::NoInput)));
        assert!(matches!(acquire_document(&[" ".to_string()], "text".as_bytes()), Err(InferenceError::NoInput)));
        assert_eq!("No text provided", InferenceError::NoInput.to_string());
    }

    #[test]
    fn unknown_tokens_skip_the_classifier() {
        let (extractor, _, _) = fitted_extractor();
        let mut classifier = MockForest::new();
        classifier.expect_predict().never();
        classifier.expect_predict_proba().never();
        let verdict = classify(&classifier, &extractor, "Qwerty, XYZ!!! http://example.com").unwrap();
        assert_eq!(Verdict::fallback("qwerty xyz".to_string()), verdict);
        assert!(!verdict.is_fake());
        assert_eq!(0.0, verdict.confidence());
    }

    #[test]
    fn stopwords_only_skip_the_classifier() {
        let tokenizer = Tokenizer::default();
        let stop_words = StopWordList::from_phrases(["lừa đảo", "của"], &tokenizer);
        let (extractor, _) = TfIdfVectorizer::fit(
            &news().texts,
            tokenizer,
            &stop_words,
            &VectorizerConfig::default(),
        )
        .unwrap();
        assert!(extractor.transform("lừa đảo của").unwrap().is_empty());

        let mut classifier = MockForest::new();
        classifier.expect_predict().never();
        classifier.expect_predict_proba().never();
        let verdict = classify(&classifier, &extractor, "Lừa đảo của!").unwrap();
        assert_eq!(Verdict::fallback("lừa đảo của".to_string()), verdict);
        assert_eq!(Label::Real, verdict.label());
        assert_eq!(0.0, verdict.confidence());
    }

    #[test]
    fn confidence_is_the_probability_of_the_label() {
        let (extractor, _, _) = fitted_extractor();
        let mut classifier = MockForest::new();
        classifier.expect_predict().times(1).returning(|_| Ok(Label::Fake));
        classifier
            .expect_predict_proba()
            .times(1)
            .returning(|_| Ok(Probabilities::new(0.2, 0.8)));
        let verdict = classify(&classifier, &extractor, "Cảnh báo lừa đảo!").unwrap();
        assert!(verdict.is_fake());
        assert_eq!(Label::Fake, verdict.label());
        assert_approx_eq!(f64, 0.8, verdict.confidence());
        assert_eq!("cảnh báo lừa đảo", verdict.original_text());
    }

    #[test]
    fn classifier_errors_are_reported() {
        let (extractor, _, _) = fitted_extractor();
        let mut classifier = MockForest::new();
        classifier.expect_predict().returning(|_| Err(ForestError::NotFitted));
        let report = InferenceReport::from(classify(&classifier, &extractor, "lừa đảo"));
        assert!(report.is_error());
        assert_eq!(r#"{"error":"The classifier is not fitted!"}"#, report.to_json());
    }

    #[test]
    fn missing_model() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let result = run(&path, &["lừa đảo".to_string()], "".as_bytes());
        assert!(matches!(&result, Err(InferenceError::ModelMissing(missing)) if missing == &path));
        assert_eq!(
            serde_json::json!({ "error": format!("Model not found at {path}") }).to_string(),
            InferenceReport::from(result).to_json()
        );
    }

    #[test]
    fn input_is_checked_before_the_model() {
        let dir = tempdir().unwrap();
        let result = run(dir.path().join("model.bin"), &[], "".as_bytes());
        assert!(matches!(result, Err(InferenceError::NoInput)));
        assert_eq!(r#"{"error":"No text provided"}"#, InferenceReport::from(result).to_json());
    }

    #[test]
    fn predicts_with_a_saved_bundle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let bundle = fitted_bundle();
        bundle.save(&path).unwrap();
        let verdict = run(&path, &[], "Cảnh báo lừa đảo chiếm đoạt tiền qua mạng".as_bytes()).unwrap();
        assert_eq!(Label::Fake, verdict.label());
        assert!(verdict.confidence() > 0.5);
        assert!(verdict.confidence() <= 1.0);
        let json: serde_json::Value = serde_json::from_str(&InferenceReport::Verdict(verdict).to_json()).unwrap();
        assert_eq!(serde_json::Value::Bool(true), json["isFake"]);
        assert_eq!("Fake", json["label"]);
    }
}
