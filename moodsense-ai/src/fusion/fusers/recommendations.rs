// Recommendations - Fixed-Priority Rule List
//
// Rules fire in a fixed order (mood, stress, facial emotion, text emotions);
// generic wellness tips pad short lists. At most MAX_RECOMMENDATIONS survive.

use crate::fusion::{FacialEmotion, TextEmotion, TextSignal, VisualSignal};

pub const MAX_RECOMMENDATIONS: usize = 3;

/// Mood strictly below this triggers the low-mood rules
pub const LOW_MOOD_THRESHOLD: f64 = 4.0;

/// Stress strictly above this triggers the high-stress rules
pub const HIGH_STRESS_THRESHOLD: f64 = 7.0;

const LOW_MOOD: [&str; 2] = [
    "Consider taking a short break or doing something you enjoy",
    "Practice deep breathing or mindfulness exercises",
];

const HIGH_STRESS: [&str; 2] = [
    "High stress detected - try the 4-7-8 breathing technique",
    "Consider delegating tasks or discussing workload with team",
];

const ANGER: &str = "Anger detected - try counting to 10 or taking a walk";
const SADNESS: &str = "Feeling down? Listen to uplifting music or talk to someone";
const FEAR: &str = "Anxiety detected - practice grounding techniques";

const FATIGUE: &str = "Fatigue detected - ensure proper rest and hydration";
const PRODUCTIVITY: &str = "Great productivity! Maintain momentum with short breaks";

pub const GENERIC_TIPS: [&str; 2] = [
    "Stay hydrated and take regular screen breaks",
    "Practice good posture and stretch periodically",
];

/// Build the ranked recommendation list for a fused estimate
pub fn generate(
    mood: f64,
    stress: f64,
    text: Option<&TextSignal>,
    visual: Option<&VisualSignal>,
) -> Vec<String> {
    let mut recommendations: Vec<&str> = Vec::new();

    if mood < LOW_MOOD_THRESHOLD {
        recommendations.extend(LOW_MOOD);
    }

    if stress > HIGH_STRESS_THRESHOLD {
        recommendations.extend(HIGH_STRESS);
    }

    let dominant = visual
        .filter(|v| v.is_usable())
        .and_then(|v| v.dominant_emotion);
    match dominant {
        Some(FacialEmotion::Angry) => recommendations.push(ANGER),
        Some(FacialEmotion::Sad) => recommendations.push(SADNESS),
        Some(FacialEmotion::Fear) => recommendations.push(FEAR),
        _ => {}
    }

    if let Some(text) = text {
        if text.emotions.contains(&TextEmotion::Tired) {
            recommendations.push(FATIGUE);
        }
        if text.emotions.contains(&TextEmotion::Productive) {
            recommendations.push(PRODUCTIVITY);
        }
    }

    if recommendations.len() < MAX_RECOMMENDATIONS {
        recommendations.extend(GENERIC_TIPS);
    }

    recommendations
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(String::from)
        .collect()
}
