// Text Signal Adapter
//
// Free text → mood score (1-10), label, confidence, emotion tags, stress.
// Score = 40% estimator A + 40% estimator B + 20% keyword rules.

use crate::fusion::extractors::PolarityEstimator;
use crate::fusion::{
    clamp_score, round_to, RawTextScores, SentimentLabel, TextEmotion, TextSignal, MAX_SCORE,
    MIN_SCORE, NEUTRAL_SCORE,
};
use crate::services::{LexiconPolarity, ValencePolarity};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Inputs shorter than this (after trimming) get the neutral default
const MIN_TEXT_CHARS: usize = 3;

const ESTIMATOR_A_WEIGHT: f64 = 0.4;
const ESTIMATOR_B_WEIGHT: f64 = 0.4;
const KEYWORD_WEIGHT: f64 = 0.2;

const MAX_EMOTIONS: usize = 3;
const MAX_KEYWORDS: usize = 5;

/// Polarity above/below which the fallback emotion is positive/negative
const EMOTION_POLARITY_THRESHOLD: f64 = 0.3;

/// Stress added per stress-lexicon occurrence
const STRESS_PER_WORD: f64 = 0.5;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"http\S+|www\S+|https\S+").expect("valid URL pattern"));

static DISALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z\s.,!?]").expect("valid character filter"));

const POSITIVE_KEYWORDS: &[&str] = &[
    "happy", "great", "good", "excellent", "awesome", "fantastic",
    "productive", "progress", "achieved", "completed", "success",
    "excited", "motivated", "energized", "optimistic", "positive",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "sad", "depressed",
    "angry", "frustrated", "annoyed", "disappointed", "failure",
    "stuck", "blocked", "problem", "issue", "difficult", "hard",
];

const STRESS_KEYWORDS: &[&str] = &[
    "stress", "stressed", "overwhelmed", "busy", "tired", "exhausted",
    "anxious", "worried", "pressure", "deadline", "rush", "hectic",
    "burnout", "drained", "fatigued", "swamped", "crazy", "insane",
];

/// Lexicon counted by `derive_stress`
const STRESS_LEXICON: &[&str] = &[
    "stress", "stressed", "pressure", "deadline", "rush",
    "overwhelmed", "burnout", "anxious", "worried",
];

/// Emotion keyword groups, in detection order
const EMOTION_GROUPS: &[(TextEmotion, &[&str])] = &[
    (TextEmotion::Happy, &["happy", "joy", "excited", "great", "good"]),
    (TextEmotion::Stressed, &["stress", "stressed", "pressure", "busy"]),
    (TextEmotion::Tired, &["tired", "exhausted", "fatigued", "sleepy"]),
    (TextEmotion::Anxious, &["anxious", "worried", "nervous", "concerned"]),
    (TextEmotion::Frustrated, &["frustrated", "annoyed", "angry", "mad"]),
    (TextEmotion::Productive, &["productive", "focused", "efficient", "progress"]),
    (TextEmotion::Motivated, &["motivated", "energized", "inspired", "determined"]),
    (TextEmotion::Neutral, &["okay", "fine", "alright", "normal"]),
];

const STOP_WORDS: &[&str] = &[
    "i", "am", "is", "are", "was", "were", "be", "been",
    "have", "has", "had", "do", "does", "did", "will",
    "would", "should", "could", "can", "may", "might",
    "the", "a", "an", "and", "but", "or", "for", "nor",
    "on", "at", "by", "to", "in", "of", "with", "about",
];

/// Text sentiment adapter over two independent polarity estimators
pub struct TextSignalAdapter {
    estimator_a: Box<dyn PolarityEstimator>,
    estimator_b: Box<dyn PolarityEstimator>,
}

impl Default for TextSignalAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSignalAdapter {
    /// Adapter backed by the built-in lexicon estimators
    pub fn new() -> Self {
        Self::with_estimators(Box::new(LexiconPolarity::new()), Box::new(ValencePolarity::new()))
    }

    pub fn with_estimators(
        estimator_a: Box<dyn PolarityEstimator>,
        estimator_b: Box<dyn PolarityEstimator>,
    ) -> Self {
        Self {
            estimator_a,
            estimator_b,
        }
    }

    /// Analyze free text into a [`TextSignal`]
    ///
    /// Text shorter than 3 characters after trimming yields
    /// [`TextSignal::neutral`] without further processing.
    pub fn analyze_sentiment(&self, text: &str) -> TextSignal {
        if text.trim().chars().count() < MIN_TEXT_CHARS {
            debug!("Text too short for sentiment analysis, using neutral default");
            return TextSignal::neutral();
        }

        let cleaned = clean_text(text);

        let polarity_a = self.estimate(self.estimator_a.as_ref(), &cleaned);
        let polarity_b = self.estimate(self.estimator_b.as_ref(), &cleaned);
        let keyword = keyword_score(&cleaned);

        let combined = (polarity_a + 1.0) * 5.0 * ESTIMATOR_A_WEIGHT
            + (polarity_b + 1.0) * 5.0 * ESTIMATOR_B_WEIGHT
            + keyword * KEYWORD_WEIGHT;
        let combined = clamp_score(combined);
        let label = SentimentLabel::from_score(combined);
        let score = round_to(combined, 1);

        let confidence = round_to((polarity_a.abs() + polarity_b.abs()) / 2.0, 2);
        let emotions = detect_emotions(&cleaned, polarity_a);
        let stress = self.derive_stress(Some(text), score);

        debug!(
            "Text sentiment: {}={:.3}, {}={:.3}, keyword={:.2} → score={:.1}, confidence={:.2}",
            self.estimator_a.source_id(),
            polarity_a,
            self.estimator_b.source_id(),
            polarity_b,
            keyword,
            score,
            confidence
        );

        TextSignal {
            score,
            label,
            confidence,
            emotions,
            keywords: extract_keywords(&cleaned),
            stress,
            raw_scores: Some(RawTextScores {
                estimator_a: polarity_a,
                estimator_b: polarity_b,
                keyword,
            }),
        }
    }

    /// Derive stress (1-10) from text and its mood score
    ///
    /// Base stress is `max(1, 10 - mood_score)`; every occurrence of a
    /// stress-lexicon word adds 0.5, capped at 10. Empty or absent text is
    /// neutral (5.0) regardless of mood.
    pub fn derive_stress(&self, text: Option<&str>, mood_score: f64) -> f64 {
        let text = match text {
            Some(t) if !t.trim().is_empty() => t,
            _ => return NEUTRAL_SCORE,
        };

        let cleaned = clean_text(text);
        let base = (MAX_SCORE - mood_score).max(MIN_SCORE);
        let occurrences = cleaned
            .split_whitespace()
            .filter(|w| STRESS_LEXICON.contains(w))
            .count();

        let stress = if occurrences > 0 {
            (base + occurrences as f64 * STRESS_PER_WORD).min(MAX_SCORE)
        } else {
            base
        };

        round_to(stress, 1)
    }

    fn estimate(&self, estimator: &dyn PolarityEstimator, cleaned: &str) -> f64 {
        match estimator.polarity(cleaned) {
            Ok(p) if p.is_finite() => p.clamp(-1.0, 1.0),
            Ok(p) => {
                warn!("{} returned non-finite polarity {}, using 0.0", estimator.source_id(), p);
                0.0
            }
            Err(e) => {
                warn!("{} polarity estimation failed: {}, using 0.0", estimator.source_id(), e);
                0.0
            }
        }
    }
}

/// Lower-case, strip URLs and disallowed characters, collapse whitespace
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_urls = URL_PATTERN.replace_all(&lowered, "");
    let filtered = DISALLOWED_CHARS.replace_all(&without_urls, "");
    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keyword rule score (1-10), neutral 5.0 when nothing matched
///
/// Rule matching is on whitespace-separated words, so "great!" does not
/// match "great".
pub fn keyword_score(cleaned: &str) -> f64 {
    let mut positive = 0usize;
    let mut negative = 0usize;
    let mut stress = 0usize;

    for word in cleaned.split_whitespace() {
        if POSITIVE_KEYWORDS.contains(&word) {
            positive += 1;
        }
        if NEGATIVE_KEYWORDS.contains(&word) {
            negative += 1;
        }
        if STRESS_KEYWORDS.contains(&word) {
            stress += 1;
        }
    }

    let total = positive + negative + stress;
    if total == 0 {
        return NEUTRAL_SCORE;
    }

    let total = total as f64;
    let score = NEUTRAL_SCORE + 3.0 * (positive as f64 / total)
        - 3.0 * (negative as f64 / total)
        - 2.0 * (stress as f64 / total);

    clamp_score(score)
}

/// Emotion tags from keyword groups, falling back to polarity
pub fn detect_emotions(cleaned: &str, polarity: f64) -> Vec<TextEmotion> {
    let words: Vec<&str> = cleaned.split_whitespace().collect();

    let mut emotions: Vec<TextEmotion> = EMOTION_GROUPS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| words.contains(k)))
        .map(|(emotion, _)| *emotion)
        .collect();
    emotions.dedup();
    emotions.truncate(MAX_EMOTIONS);

    if emotions.is_empty() {
        let fallback = if polarity > EMOTION_POLARITY_THRESHOLD {
            TextEmotion::Positive
        } else if polarity < -EMOTION_POLARITY_THRESHOLD {
            TextEmotion::Negative
        } else {
            TextEmotion::Neutral
        };
        emotions.push(fallback);
    }

    emotions
}

/// Most frequent content words (ties keep first-occurrence order)
pub fn extract_keywords(cleaned: &str) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for word in cleaned.split_whitespace() {
        if word.chars().count() <= 2 || STOP_WORDS.contains(&word) {
            continue;
        }
        match counts.iter_mut().find(|(w, _)| *w == word) {
            Some((_, count)) => *count += 1,
            None => counts.push((word, 1)),
        }
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(w, _)| w.to_string())
        .collect()
}
