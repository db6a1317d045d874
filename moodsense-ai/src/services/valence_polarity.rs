//! Rule-based valence polarity estimator
//!
//! Sums word valences (-4..4) adjusted by booster words, negation, a
//! contrastive "but", and exclamation emphasis, then normalises the sum into
//! [-1, 1] with `x / sqrt(x² + ALPHA)`.

use crate::fusion::extractors::{tokenize, PolarityEstimator};
use anyhow::Result;

/// Normalisation constant approximating the maximum expected valence sum
const ALPHA: f64 = 15.0;

/// Magnitude added or removed by a booster word
const BOOSTER_INCREMENT: f64 = 0.293;

/// Scalar applied to a negated valence
const NEGATION_SCALAR: f64 = -0.74;

/// Tokens before a valence word that boosters and negators can reach
const LOOKBACK: usize = 3;

/// Per-distance damping of booster effect (1, 2, or 3 tokens back)
const BOOSTER_DAMPING: [f64; LOOKBACK] = [1.0, 0.95, 0.9];

/// Emphasis per exclamation mark, counted up to `MAX_EXCLAMATIONS`
const EXCLAMATION_EMPHASIS: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;

/// Weights on either side of a contrastive "but"
const BEFORE_BUT_WEIGHT: f64 = 0.5;
const AFTER_BUT_WEIGHT: f64 = 1.5;

const VALENCE_LEXICON: &[(&str, f64)] = &[
    // Positive
    ("good", 1.9),
    ("great", 3.1),
    ("excellent", 2.7),
    ("awesome", 3.1),
    ("fantastic", 2.6),
    ("amazing", 2.8),
    ("wonderful", 2.7),
    ("best", 3.2),
    ("better", 1.9),
    ("happy", 2.7),
    ("glad", 2.0),
    ("love", 3.2),
    ("nice", 1.8),
    ("fun", 2.3),
    ("excited", 1.4),
    ("positive", 2.6),
    ("productive", 1.5),
    ("progress", 1.5),
    ("success", 2.7),
    ("successful", 2.8),
    ("achieved", 1.8),
    ("motivated", 1.6),
    ("energized", 1.8),
    ("inspired", 2.2),
    ("optimistic", 1.3),
    ("proud", 2.1),
    ("calm", 1.3),
    ("relaxed", 2.2),
    ("fine", 0.8),
    ("okay", 0.9),
    ("thanks", 1.9),
    ("perfect", 2.7),
    // Negative
    ("bad", -2.5),
    ("terrible", -2.1),
    ("awful", -2.0),
    ("horrible", -2.5),
    ("worst", -3.1),
    ("worse", -2.1),
    ("sad", -2.1),
    ("angry", -2.3),
    ("frustrated", -2.4),
    ("annoyed", -1.6),
    ("disappointed", -1.9),
    ("depressed", -2.3),
    ("miserable", -2.2),
    ("upset", -1.6),
    ("tired", -1.9),
    ("exhausted", -1.5),
    ("drained", -1.5),
    ("difficult", -1.5),
    ("hard", -0.4),
    ("stuck", -1.2),
    ("blocked", -1.2),
    ("anxious", -1.0),
    ("worried", -1.2),
    ("nervous", -1.1),
    ("stressed", -1.4),
    ("stress", -1.8),
    ("pressure", -1.2),
    ("overwhelmed", -1.5),
    ("burnout", -1.9),
    ("failure", -2.3),
    ("problem", -1.7),
    ("hate", -2.7),
    ("bored", -1.1),
    ("lonely", -1.8),
];

/// Booster words; negative entries dampen instead of amplify
const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", BOOSTER_INCREMENT),
    ("completely", BOOSTER_INCREMENT),
    ("extremely", BOOSTER_INCREMENT),
    ("highly", BOOSTER_INCREMENT),
    ("incredibly", BOOSTER_INCREMENT),
    ("really", BOOSTER_INCREMENT),
    ("so", BOOSTER_INCREMENT),
    ("super", BOOSTER_INCREMENT),
    ("totally", BOOSTER_INCREMENT),
    ("very", BOOSTER_INCREMENT),
    ("barely", -BOOSTER_INCREMENT),
    ("hardly", -BOOSTER_INCREMENT),
    ("marginally", -BOOSTER_INCREMENT),
    ("slightly", -BOOSTER_INCREMENT),
    ("somewhat", -BOOSTER_INCREMENT),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "dont", "doesnt", "didnt", "isnt", "wasnt",
    "arent", "cant", "cannot", "wont", "without", "nothing", "nor", "neither",
];

fn lookup(table: &[(&str, f64)], word: &str) -> Option<f64> {
    table.iter().find(|(w, _)| *w == word).map(|(_, v)| *v)
}

/// Estimator B: normalised sum of valences
#[derive(Debug, Default, Clone, Copy)]
pub struct ValencePolarity;

impl ValencePolarity {
    pub fn new() -> Self {
        Self
    }

    /// Valence of the word at `i`, adjusted by its preceding context
    fn contextual_valence(tokens: &[&str], i: usize, base: f64) -> f64 {
        let mut valence = base;

        for distance in 1..=LOOKBACK {
            let Some(prev) = i.checked_sub(distance) else {
                break;
            };
            if let Some(boost) = lookup(BOOSTERS, tokens[prev]) {
                let scaled = boost * BOOSTER_DAMPING[distance - 1];
                valence += if base < 0.0 { -scaled } else { scaled };
            }
        }

        let negated = tokens[i.saturating_sub(LOOKBACK)..i]
            .iter()
            .any(|t| NEGATORS.contains(t));
        if negated {
            valence *= NEGATION_SCALAR;
        }

        valence
    }

    fn compound(&self, text: &str) -> f64 {
        let tokens: Vec<&str> = tokenize(text).collect();
        let but_index = tokens.iter().position(|t| *t == "but");

        let mut sum = 0.0;
        let mut matched = false;
        for (i, token) in tokens.iter().enumerate() {
            let Some(base) = lookup(VALENCE_LEXICON, token) else {
                continue;
            };
            matched = true;

            let mut valence = Self::contextual_valence(&tokens, i, base);
            if let Some(b) = but_index {
                valence *= if i < b { BEFORE_BUT_WEIGHT } else { AFTER_BUT_WEIGHT };
            }
            sum += valence;
        }

        if !matched || sum == 0.0 {
            return 0.0;
        }

        let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
        let emphasis = exclamations as f64 * EXCLAMATION_EMPHASIS;
        sum += if sum > 0.0 { emphasis } else { -emphasis };

        (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
    }
}

impl PolarityEstimator for ValencePolarity {
    fn source_id(&self) -> &'static str {
        "Valence"
    }

    fn polarity(&self, text: &str) -> Result<f64> {
        Ok(self.compound(text))
    }
}
