// Visual Signal Adapter
//
// Face image → emotion distribution → mood score and stress level via
// fixed per-emotion value tables. Classifier failures never escape this
// adapter; they become `VisualSignal { success: false, .. }`.

use crate::fusion::extractors::{EmotionClassifier, FaceAnalysis};
use crate::fusion::{round_to, EmotionDistribution, FacialEmotion, VisualSignal, NEUTRAL_SCORE};
use std::sync::Arc;
use tracing::{debug, warn};

/// Facial-expression adapter over an [`EmotionClassifier`]
pub struct VisualSignalAdapter {
    classifier: Arc<dyn EmotionClassifier>,
}

impl VisualSignalAdapter {
    pub fn new(classifier: Arc<dyn EmotionClassifier>) -> Self {
        Self { classifier }
    }

    /// Analyze facial expression in an encoded image
    ///
    /// Single classification attempt. Unsupported formats, missing faces and
    /// classifier errors yield `success = false`; `face_detected` is true
    /// only when the classifier confirmed a face before failing. A face with
    /// no usable emotion scores is a neutral (5.0) success.
    pub async fn analyze_image(&self, image: &[u8]) -> VisualSignal {
        if !is_supported_image(image) {
            warn!("Rejected image: not a JPEG or PNG ({} bytes)", image.len());
            return VisualSignal::failure(false, "Unsupported image format (expected JPEG or PNG)");
        }

        match self.classifier.classify(image).await {
            Ok(analysis) => self.signal_from_analysis(analysis),
            Err(e) => {
                warn!("{} failed: {}", self.classifier.source_id(), e);
                VisualSignal::failure(e.face_detected(), e.to_string())
            }
        }
    }

    fn signal_from_analysis(&self, analysis: FaceAnalysis) -> VisualSignal {
        let dominant = match analysis.dominant_emotion.parse::<FacialEmotion>() {
            Ok(emotion) => Some(emotion),
            Err(e) => {
                warn!("{}: {}", self.classifier.source_id(), e);
                None
            }
        };

        // Empty or unrecognised distributions score neutral 5.0
        let mood_score = mood_from_emotions(&analysis.emotion);
        let stress_level = stress_from_emotions(&analysis.emotion);

        let (min_conf, max_conf) = self.classifier.confidence_range();
        let dominant_pct = percentage_for(&analysis.emotion, &analysis.dominant_emotion);
        let confidence = (dominant_pct / 100.0).clamp(min_conf, max_conf);

        let gender_confidence = analysis
            .dominant_gender
            .as_ref()
            .and_then(|g| analysis.gender.get(g))
            .map(|pct| round_to(pct / 100.0, 2));

        debug!(
            "Visual analysis: dominant={}, mood={:.1}, stress={:.1}, confidence={:.2}",
            analysis.dominant_emotion, mood_score, stress_level, confidence
        );

        VisualSignal {
            success: true,
            dominant_emotion: dominant,
            emotion_distribution: analysis.emotion,
            mood_score: round_to(mood_score, 1),
            stress_level: round_to(stress_level, 1),
            confidence: round_to(confidence, 2),
            face_detected: true,
            error: None,
            age: analysis.age,
            gender: analysis.dominant_gender,
            gender_confidence,
        }
    }
}

/// Whether the bytes are a JPEG or PNG image
pub fn is_supported_image(bytes: &[u8]) -> bool {
    matches!(
        infer::get(bytes).map(|kind| kind.mime_type()),
        Some("image/jpeg") | Some("image/png")
    )
}

/// Mood score (1-10) as the percentage-weighted mean of per-emotion mood values
pub fn mood_from_emotions(distribution: &EmotionDistribution) -> f64 {
    weighted_emotion_value(distribution, FacialEmotion::mood_value)
}

/// Stress level (1-10) as the percentage-weighted mean of per-emotion stress values
pub fn stress_from_emotions(distribution: &EmotionDistribution) -> f64 {
    weighted_emotion_value(distribution, FacialEmotion::stress_value)
}

/// Weighted mean over recognised emotions; neutral 5.0 when total weight is zero
///
/// Non-positive or non-finite percentages carry no weight.
fn weighted_emotion_value(
    distribution: &EmotionDistribution,
    value_of: fn(&FacialEmotion) -> f64,
) -> f64 {
    let mut total_value = 0.0;
    let mut total_weight = 0.0;

    for (label, percentage) in distribution {
        let Ok(emotion) = label.parse::<FacialEmotion>() else {
            continue;
        };
        if !percentage.is_finite() || *percentage <= 0.0 {
            continue;
        }
        let weight = percentage / 100.0;
        total_value += value_of(&emotion) * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        total_value / total_weight
    } else {
        NEUTRAL_SCORE
    }
}

/// Percentage reported for a label, matching labels case-insensitively
fn percentage_for(distribution: &EmotionDistribution, label: &str) -> f64 {
    distribution
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(label))
        .map(|(_, v)| *v)
        .unwrap_or(0.0)
}
