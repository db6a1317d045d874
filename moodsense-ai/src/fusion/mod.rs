// Fusion Module - Multi-Source Mood/Stress Fusion
//
// Architecture: Signal adapters (extractors) → Fusion engine (fusers)
// Text and visual signals are computed independently, then blended into
// bounded mood/stress scores with a confidence estimate and advice.

pub mod extractors;
pub mod fusers;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Source confidence score (0.0-1.0)
pub type Confidence = f64;

/// Facial emotion label → reported percentage (0-100)
///
/// Percentages need not sum to exactly 100 (upstream rounding).
pub type EmotionDistribution = BTreeMap<String, f64>;

/// Weight of the text signal when both signals are usable
pub const TEXT_WEIGHT: f64 = 0.6;

/// Weight of the visual signal when both signals are usable
pub const VISUAL_WEIGHT: f64 = 0.4;

/// Neutral mood/stress value used whenever no signal is available
pub const NEUTRAL_SCORE: f64 = 5.0;

/// Confidence reported when no signal ran at all
pub const NEUTRAL_CONFIDENCE: Confidence = 0.5;

/// Lower bound of every mood/stress score
pub const MIN_SCORE: f64 = 1.0;

/// Upper bound of every mood/stress score
pub const MAX_SCORE: f64 = 10.0;

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Clamp a score into [MIN_SCORE, MAX_SCORE]
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(MIN_SCORE, MAX_SCORE)
}

/// Sentiment label derived from the combined text score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    #[serde(rename = "very positive")]
    VeryPositive,
    #[serde(rename = "positive")]
    Positive,
    #[serde(rename = "neutral")]
    Neutral,
    #[serde(rename = "negative")]
    Negative,
    #[serde(rename = "very negative")]
    VeryNegative,
}

impl SentimentLabel {
    /// Map a 1-10 score onto a label
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            SentimentLabel::VeryPositive
        } else if score >= 6.0 {
            SentimentLabel::Positive
        } else if score >= 4.0 {
            SentimentLabel::Neutral
        } else if score >= 2.0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::VeryNegative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::VeryPositive => "very positive",
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
            SentimentLabel::VeryNegative => "very negative",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Emotion tag detected in free text
///
/// The first eight come from keyword groups; `Positive`/`Negative` (and
/// `Neutral`) are also used as the polarity fallback when no group matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEmotion {
    Happy,
    Stressed,
    Tired,
    Anxious,
    Frustrated,
    Productive,
    Motivated,
    Neutral,
    Positive,
    Negative,
}

impl TextEmotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextEmotion::Happy => "happy",
            TextEmotion::Stressed => "stressed",
            TextEmotion::Tired => "tired",
            TextEmotion::Anxious => "anxious",
            TextEmotion::Frustrated => "frustrated",
            TextEmotion::Productive => "productive",
            TextEmotion::Motivated => "motivated",
            TextEmotion::Neutral => "neutral",
            TextEmotion::Positive => "positive",
            TextEmotion::Negative => "negative",
        }
    }
}

impl std::fmt::Display for TextEmotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed 7-label facial emotion vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacialEmotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

impl FacialEmotion {
    pub const ALL: [FacialEmotion; 7] = [
        FacialEmotion::Angry,
        FacialEmotion::Disgust,
        FacialEmotion::Fear,
        FacialEmotion::Happy,
        FacialEmotion::Sad,
        FacialEmotion::Surprise,
        FacialEmotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FacialEmotion::Angry => "angry",
            FacialEmotion::Disgust => "disgust",
            FacialEmotion::Fear => "fear",
            FacialEmotion::Happy => "happy",
            FacialEmotion::Sad => "sad",
            FacialEmotion::Surprise => "surprise",
            FacialEmotion::Neutral => "neutral",
        }
    }

    /// Mood value (1-10) associated with this expression
    pub fn mood_value(&self) -> f64 {
        match self {
            FacialEmotion::Angry => 2.0,
            FacialEmotion::Disgust => 2.5,
            FacialEmotion::Fear => 3.0,
            FacialEmotion::Sad => 3.5,
            FacialEmotion::Neutral => 5.0,
            FacialEmotion::Surprise => 7.0,
            FacialEmotion::Happy => 8.5,
        }
    }

    /// Stress value (1-10) associated with this expression
    pub fn stress_value(&self) -> f64 {
        match self {
            FacialEmotion::Angry => 8.0,
            FacialEmotion::Disgust => 7.5,
            FacialEmotion::Fear => 9.0,
            FacialEmotion::Sad => 7.0,
            FacialEmotion::Neutral => 5.0,
            FacialEmotion::Surprise => 4.0,
            FacialEmotion::Happy => 2.0,
        }
    }
}

impl FromStr for FacialEmotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_lowercase();
        FacialEmotion::ALL
            .into_iter()
            .find(|e| e.as_str() == label)
            .ok_or_else(|| format!("Unknown facial emotion '{}'", s))
    }
}

impl std::fmt::Display for FacialEmotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-estimator sub-scores behind a text score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTextScores {
    /// Polarity estimator A (-1.0 to 1.0)
    pub estimator_a: f64,
    /// Polarity estimator B (-1.0 to 1.0)
    pub estimator_b: f64,
    /// Keyword rule score (1.0 to 10.0)
    pub keyword: f64,
}

/// Result of the Text Signal Adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSignal {
    /// Mood score (1.0-10.0, one decimal)
    pub score: f64,
    pub label: SentimentLabel,
    /// Mean absolute polarity of the two estimators (0.0-1.0)
    pub confidence: Confidence,
    /// Up to 3 detected emotion tags
    pub emotions: Vec<TextEmotion>,
    /// Up to 5 most frequent content words
    pub keywords: Vec<String>,
    /// Stress derived from the text and its mood score (1.0-10.0)
    pub stress: f64,
    /// Present only when the text was long enough to analyze
    pub raw_scores: Option<RawTextScores>,
}

impl TextSignal {
    /// Default returned for input too sparse to analyze
    pub fn neutral() -> Self {
        Self {
            score: NEUTRAL_SCORE,
            label: SentimentLabel::Neutral,
            confidence: 0.0,
            emotions: vec![],
            keywords: vec![],
            stress: NEUTRAL_SCORE,
            raw_scores: None,
        }
    }

    /// Whether this signal may contribute to fusion
    pub fn is_usable(&self) -> bool {
        self.raw_scores.is_some()
    }
}

/// Result of the Visual Signal Adapter
///
/// When `success` is false, `mood_score`, `stress_level` and `confidence`
/// carry no information and are never read by the fusion step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualSignal {
    pub success: bool,
    pub dominant_emotion: Option<FacialEmotion>,
    pub emotion_distribution: EmotionDistribution,
    pub mood_score: f64,
    pub stress_level: f64,
    pub confidence: Confidence,
    pub face_detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender_confidence: Option<Confidence>,
}

impl VisualSignal {
    /// Unsuccessful analysis
    ///
    /// `face_detected` distinguishes "no face" from "classifier error on a face".
    pub fn failure(face_detected: bool, error: impl Into<String>) -> Self {
        Self {
            success: false,
            dominant_emotion: None,
            emotion_distribution: EmotionDistribution::new(),
            mood_score: NEUTRAL_SCORE,
            stress_level: NEUTRAL_SCORE,
            confidence: 0.0,
            face_detected,
            error: Some(error.into()),
            age: None,
            gender: None,
            gender_confidence: None,
        }
    }

    /// Whether this signal may contribute to fusion
    pub fn is_usable(&self) -> bool {
        self.success
    }
}

/// Values reported directly by the subject
///
/// Each field independently replaces the corresponding fused value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualOverride {
    pub mood: Option<f64>,
    pub stress: Option<f64>,
}

impl ManualOverride {
    pub fn none() -> Self {
        Self::default()
    }

    /// Check both values lie within [MIN_SCORE, MAX_SCORE]
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [("manual_mood", self.mood), ("manual_stress", self.stress)] {
            if let Some(v) = value {
                if !(MIN_SCORE..=MAX_SCORE).contains(&v) {
                    return Err(format!(
                        "{} must be between {} and {} (got {})",
                        name, MIN_SCORE, MAX_SCORE, v
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Fused mood/stress estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionResult {
    /// Final mood (1.0-10.0, one decimal)
    pub final_mood: f64,
    /// Final stress (1.0-10.0, one decimal)
    pub final_stress: f64,
    /// Overall confidence (0.0-1.0), independent of manual overrides
    pub confidence: Confidence,
    pub text_analysis: Option<TextSignal>,
    pub visual_analysis: Option<VisualSignal>,
    /// At most 3 recommendations, highest priority first
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_thresholds() {
        assert_eq!(SentimentLabel::from_score(8.0), SentimentLabel::VeryPositive);
        assert_eq!(SentimentLabel::from_score(7.9), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(6.0), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(4.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(2.0), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_score(1.9), SentimentLabel::VeryNegative);
    }

    #[test]
    fn test_label_serializes_with_spaces() {
        let json = serde_json::to_string(&SentimentLabel::VeryNegative).unwrap();
        assert_eq!(json, "\"very negative\"");
    }

    #[test]
    fn test_facial_emotion_parse_is_case_insensitive() {
        assert_eq!("Happy".parse::<FacialEmotion>(), Ok(FacialEmotion::Happy));
        assert_eq!(" fear ".parse::<FacialEmotion>(), Ok(FacialEmotion::Fear));
        assert!("contempt".parse::<FacialEmotion>().is_err());
    }

    #[test]
    fn test_round_to_one_decimal() {
        assert_eq!(round_to(6.000000000000001, 1), 6.0);
        assert_eq!(round_to(4.26, 1), 4.3);
        assert_eq!(round_to(0.456, 2), 0.46);
    }

    #[test]
    fn test_manual_override_validation() {
        assert!(ManualOverride { mood: Some(1.0), stress: Some(10.0) }.validate().is_ok());
        assert!(ManualOverride { mood: Some(0.5), stress: None }.validate().is_err());
        assert!(ManualOverride { mood: None, stress: Some(11.0) }.validate().is_err());
        assert!(ManualOverride::none().validate().is_ok());
    }

    #[test]
    fn test_failed_visual_signal_is_not_usable() {
        let signal = VisualSignal::failure(true, "model crashed");
        assert!(!signal.is_usable());
        assert!(signal.face_detected);
        assert_eq!(signal.error.as_deref(), Some("model crashed"));
    }
}
