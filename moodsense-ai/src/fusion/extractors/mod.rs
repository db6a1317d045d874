// Signal Extractors - Independent Per-Source Analysis
//
// Two adapters: free text (sentiment) and face image (expression).
// Each wraps an external capability behind a trait so the scoring logic
// can run against any implementation, including test doubles.

use crate::fusion::{Confidence, EmotionDistribution};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

pub mod text_signal;
pub mod visual_signal;

pub use text_signal::TextSignalAdapter;
pub use visual_signal::VisualSignalAdapter;

/// General-purpose text polarity primitive
///
/// Implementations map cleaned text onto a polarity in [-1.0, 1.0].
pub trait PolarityEstimator: Send + Sync {
    /// Estimator identifier (e.g., "Lexicon", "Valence")
    fn source_id(&self) -> &'static str;

    /// Estimate polarity of already-cleaned text
    ///
    /// # Returns
    /// * `Ok(polarity)` - Value in [-1.0, 1.0]
    /// * `Err(_)` - Estimation failed (logged, treated as 0.0 by the adapter)
    fn polarity(&self, text: &str) -> Result<f64>;
}

/// Raw output of a facial-emotion classifier for one face
#[derive(Debug, Clone, PartialEq)]
pub struct FaceAnalysis {
    /// Emotion label → percentage (0-100)
    pub emotion: EmotionDistribution,
    /// Label the classifier considers dominant
    pub dominant_emotion: String,
    pub age: Option<f64>,
    pub dominant_gender: Option<String>,
    /// Gender label → percentage (0-100)
    pub gender: BTreeMap<String, f64>,
}

/// Facial-emotion classifier failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    /// No face found in the image
    #[error("No face detected in image")]
    NoFace,

    /// A face was found but could not be classified
    #[error("Classification failed on detected face: {0}")]
    FaceDetected(String),

    /// Transport, service, or decoding failure
    #[error("Classification failed: {0}")]
    Failed(String),
}

impl ClassifierError {
    /// Whether the classifier confirmed a face before failing
    pub fn face_detected(&self) -> bool {
        matches!(self, ClassifierError::FaceDetected(_))
    }
}

/// Facial-emotion classification capability (including face detection)
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Classifier identifier (e.g., "DeepFace")
    fn source_id(&self) -> &'static str;

    /// Classify the dominant face in an encoded JPEG/PNG image
    ///
    /// A single attempt; retries are the caller's concern.
    async fn classify(&self, image: &[u8]) -> std::result::Result<FaceAnalysis, ClassifierError>;

    /// Get expected confidence range for this classifier
    fn confidence_range(&self) -> (Confidence, Confidence) {
        (0.0, 1.0) // Default: full range
    }
}

/// Split cleaned text into word tokens for the polarity estimators
///
/// Splits on whitespace and trims the punctuation kept by text cleaning,
/// so "great!" scores like "great".
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| matches!(c, '.' | ',' | '!' | '?')))
        .filter(|w| !w.is_empty())
}
