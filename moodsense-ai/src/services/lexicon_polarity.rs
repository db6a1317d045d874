//! Averaged-lexicon polarity estimator
//!
//! Each opinion word carries a polarity in [-1, 1]. An immediately preceding
//! intensifier scales it; a negator within the two preceding tokens flips and
//! halves it. The estimate is the mean over all opinion words found.

use crate::fusion::extractors::{tokenize, PolarityEstimator};
use anyhow::Result;

/// Multiplier applied to a negated polarity
const NEGATION_FACTOR: f64 = -0.5;

/// How many preceding tokens a negator reaches
const NEGATION_WINDOW: usize = 2;

const POLARITY_LEXICON: &[(&str, f64)] = &[
    // Positive
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("awesome", 1.0),
    ("fantastic", 0.9),
    ("amazing", 0.6),
    ("wonderful", 1.0),
    ("best", 1.0),
    ("better", 0.5),
    ("happy", 0.8),
    ("glad", 0.5),
    ("love", 0.5),
    ("nice", 0.6),
    ("fun", 0.3),
    ("excited", 0.375),
    ("positive", 0.23),
    ("productive", 0.4),
    ("successful", 0.75),
    ("success", 0.6),
    ("motivated", 0.4),
    ("optimistic", 0.5),
    ("proud", 0.8),
    ("calm", 0.3),
    ("relaxed", 0.4),
    ("fine", 0.42),
    ("okay", 0.5),
    ("easy", 0.43),
    ("helpful", 0.5),
    ("smooth", 0.4),
    ("perfect", 1.0),
    // Negative
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("worst", -1.0),
    ("worse", -0.4),
    ("sad", -0.5),
    ("angry", -0.5),
    ("frustrated", -0.7),
    ("frustrating", -0.7),
    ("annoyed", -0.5),
    ("annoying", -0.8),
    ("disappointed", -0.75),
    ("depressed", -0.6),
    ("miserable", -1.0),
    ("upset", -0.5),
    ("tired", -0.4),
    ("exhausted", -0.4),
    ("difficult", -0.5),
    ("hard", -0.29),
    ("stuck", -0.3),
    ("boring", -1.0),
    ("bored", -0.5),
    ("anxious", -0.25),
    ("worried", -0.4),
    ("stressed", -0.5),
    ("overwhelmed", -0.5),
    ("failure", -0.3),
    ("lonely", -0.5),
    ("hate", -0.8),
];

/// Modifiers scaling the opinion word right after them
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("extremely", 1.5),
    ("so", 1.2),
    ("super", 1.3),
    ("incredibly", 1.4),
    ("quite", 1.1),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("barely", 0.4),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "dont", "doesnt", "didnt", "isnt", "wasnt",
    "arent", "cant", "cannot", "wont", "nothing", "neither", "nor",
];

fn lookup(table: &[(&str, f64)], word: &str) -> Option<f64> {
    table.iter().find(|(w, _)| *w == word).map(|(_, v)| *v)
}

/// Estimator A: mean polarity of opinion words
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconPolarity;

impl LexiconPolarity {
    pub fn new() -> Self {
        Self
    }

    fn score(&self, text: &str) -> f64 {
        let tokens: Vec<&str> = tokenize(text).collect();
        let mut polarities = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let Some(base) = lookup(POLARITY_LEXICON, token) else {
                continue;
            };

            let intensity = i
                .checked_sub(1)
                .and_then(|prev| lookup(INTENSIFIERS, tokens[prev]))
                .unwrap_or(1.0);

            let negated = tokens[i.saturating_sub(NEGATION_WINDOW)..i]
                .iter()
                .any(|t| NEGATORS.contains(t));

            let mut polarity = base * intensity;
            if negated {
                polarity *= NEGATION_FACTOR;
            }
            polarities.push(polarity.clamp(-1.0, 1.0));
        }

        if polarities.is_empty() {
            return 0.0;
        }

        let mean = polarities.iter().sum::<f64>() / polarities.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

impl PolarityEstimator for LexiconPolarity {
    fn source_id(&self) -> &'static str {
        "Lexicon"
    }

    fn polarity(&self, text: &str) -> Result<f64> {
        Ok(self.score(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polarity(text: &str) -> f64 {
        LexiconPolarity::new().polarity(text).unwrap()
    }

    #[test]
    fn test_no_opinion_words_is_zero() {
        assert_eq!(polarity("the meeting is at noon"), 0.0);
        assert_eq!(polarity(""), 0.0);
    }

    #[test]
    fn test_mean_of_matched_words() {
        // (0.7 + -0.7) / 2
        assert!(polarity("good start, bad finish").abs() < 1e-9);
        assert!((polarity("a great day") - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_intensifier_scales_and_clamps() {
        assert!((polarity("very good") - 0.91).abs() < 1e-9);
        assert_eq!(polarity("extremely excellent"), 1.0);
        assert!((polarity("slightly bad") + 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_negation_flips_and_halves() {
        assert!((polarity("not good") + 0.35).abs() < 1e-9);
        assert!((polarity("never really bad") - 0.42).abs() < 1e-9);
    }

    #[test]
    fn test_negation_window_is_bounded() {
        // "not" is three tokens before "happy"
        assert!((polarity("not that i am happy") - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_result_stays_in_range() {
        let p = polarity("terrible awful horrible worst miserable");
        assert_eq!(p, -1.0);
    }
}
