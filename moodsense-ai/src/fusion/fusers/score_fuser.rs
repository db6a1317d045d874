// Score Fuser - Weighted / Either / Neither Combination
//
// Mood, stress and confidence all fuse the same way: a 0.6/0.4 blend when
// both signals are usable, the lone value when only one is, and a fixed
// default when neither is.

use crate::fusion::{
    clamp_score, round_to, Confidence, TextSignal, VisualSignal, NEUTRAL_CONFIDENCE,
    NEUTRAL_SCORE, TEXT_WEIGHT, VISUAL_WEIGHT,
};

/// Combine two optional values with the fixed text/visual weights
pub fn weighted_or_single(text: Option<f64>, visual: Option<f64>, default: f64) -> f64 {
    match (text, visual) {
        (Some(t), Some(v)) => t * TEXT_WEIGHT + v * VISUAL_WEIGHT,
        (Some(t), None) => t,
        (None, Some(v)) => v,
        (None, None) => default,
    }
}

fn usable_text(text: Option<&TextSignal>) -> Option<&TextSignal> {
    text.filter(|t| t.is_usable())
}

fn usable_visual(visual: Option<&VisualSignal>) -> Option<&VisualSignal> {
    visual.filter(|v| v.is_usable())
}

/// Final mood (1-10, one decimal); a manual value wins unconditionally
pub fn fuse_mood(
    text: Option<&TextSignal>,
    visual: Option<&VisualSignal>,
    manual: Option<f64>,
) -> f64 {
    let mood = manual.unwrap_or_else(|| {
        weighted_or_single(
            usable_text(text).map(|t| t.score),
            usable_visual(visual).map(|v| v.mood_score),
            NEUTRAL_SCORE,
        )
    });
    round_to(clamp_score(mood), 1)
}

/// Final stress (1-10, one decimal); a manual value wins unconditionally
pub fn fuse_stress(
    text: Option<&TextSignal>,
    visual: Option<&VisualSignal>,
    manual: Option<f64>,
) -> f64 {
    let stress = manual.unwrap_or_else(|| {
        weighted_or_single(
            usable_text(text).map(|t| t.stress),
            usable_visual(visual).map(|v| v.stress_level),
            NEUTRAL_SCORE,
        )
    });
    round_to(clamp_score(stress), 1)
}

/// Overall confidence (0-1) from the signals only; manual values never count
pub fn fuse_confidence(text: Option<&TextSignal>, visual: Option<&VisualSignal>) -> Confidence {
    let confidence = weighted_or_single(
        usable_text(text).map(|t| t.confidence),
        usable_visual(visual).map(|v| v.confidence),
        NEUTRAL_CONFIDENCE,
    );
    confidence.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::{RawTextScores, SentimentLabel};

    fn text(score: f64, stress: f64, confidence: f64) -> TextSignal {
        TextSignal {
            score,
            label: SentimentLabel::from_score(score),
            confidence,
            emotions: vec![],
            keywords: vec![],
            stress,
            raw_scores: Some(RawTextScores {
                estimator_a: 0.0,
                estimator_b: 0.0,
                keyword: 5.0,
            }),
        }
    }

    fn visual(mood: f64, stress: f64, confidence: f64) -> VisualSignal {
        VisualSignal {
            mood_score: mood,
            stress_level: stress,
            confidence,
            success: true,
            face_detected: true,
            error: None,
            ..VisualSignal::failure(true, "")
        }
    }

    #[test]
    fn test_both_signals_weighted() {
        // 8.0*0.6 + 3.0*0.4
        let mood = fuse_mood(Some(&text(8.0, 2.0, 0.5)), Some(&visual(3.0, 8.0, 0.9)), None);
        assert_eq!(mood, 6.0);
        let stress = fuse_stress(Some(&text(8.0, 2.0, 0.5)), Some(&visual(3.0, 8.0, 0.9)), None);
        assert_eq!(stress, 4.4);
    }

    #[test]
    fn test_single_signal_passes_through() {
        assert_eq!(fuse_mood(Some(&text(7.3, 2.7, 0.4)), None, None), 7.3);
        assert_eq!(fuse_mood(None, Some(&visual(3.5, 7.0, 0.6)), None), 3.5);
    }

    #[test]
    fn test_failed_visual_is_ignored() {
        let failed = VisualSignal::failure(false, "no face");
        assert_eq!(fuse_mood(None, Some(&failed), None), 5.0);
        assert_eq!(fuse_stress(None, Some(&failed), None), 5.0);
        assert_eq!(fuse_confidence(None, Some(&failed)), 0.5);
    }

    #[test]
    fn test_sparse_text_is_ignored() {
        let sparse = TextSignal::neutral();
        assert_eq!(fuse_mood(Some(&sparse), Some(&visual(8.5, 2.0, 0.9)), None), 8.5);
        assert_eq!(fuse_confidence(Some(&sparse), Some(&visual(8.5, 2.0, 0.9))), 0.9);
    }

    #[test]
    fn test_manual_values_win() {
        let t = text(8.0, 2.0, 0.5);
        assert_eq!(fuse_mood(Some(&t), None, Some(2.0)), 2.0);
        assert_eq!(fuse_stress(Some(&t), None, Some(9.0)), 9.0);
    }

    #[test]
    fn test_confidence_weighted() {
        // 0.5*0.6 + 0.9*0.4
        let c = fuse_confidence(Some(&text(8.0, 2.0, 0.5)), Some(&visual(3.0, 8.0, 0.9)));
        assert!((c - 0.66).abs() < 1e-9);
    }
}
