// Fusion Engine - Multi-Signal Mood/Stress Combination
//
// Text and visual adapters run independently; their usable outputs are then
// blended by the score fuser, manual values replace fused ones, and the
// recommendation rules run over the final rounded values.

pub mod recommendations;
pub mod score_fuser;

use crate::fusion::extractors::{TextSignalAdapter, VisualSignalAdapter};
use crate::fusion::{round_to, FusionResult, ManualOverride, TextSignal, VisualSignal};
use tracing::{debug, info, warn};

/// Error reported when an image arrives but no classifier is configured
pub const VISUAL_NOT_CONFIGURED: &str = "Image analysis is not configured";

/// Stateless fusion service, built once by the host and shared by handle
pub struct FusionEngine {
    text: TextSignalAdapter,
    visual: Option<VisualSignalAdapter>,
}

impl FusionEngine {
    pub fn new(text: TextSignalAdapter, visual: Option<VisualSignalAdapter>) -> Self {
        Self { text, visual }
    }

    /// Engine with the built-in text estimators and no image classifier
    pub fn text_only() -> Self {
        Self::new(TextSignalAdapter::new(), None)
    }

    pub fn has_visual(&self) -> bool {
        self.visual.is_some()
    }

    /// Analyze whatever inputs were supplied and fuse them
    ///
    /// Never fails: absent or failed signals fall back to neutral defaults.
    /// Both sub-analyses complete before any fused value is computed.
    pub async fn analyze_combined(
        &self,
        text: Option<&str>,
        image: Option<&[u8]>,
        manual: ManualOverride,
    ) -> FusionResult {
        let text_analysis = text
            .filter(|t| !t.trim().is_empty())
            .map(|t| self.text.analyze_sentiment(t));

        let visual_analysis = match image {
            Some(bytes) => Some(self.analyze_image(bytes).await),
            None => None,
        };

        self.fuse(text_analysis, visual_analysis, manual)
    }

    async fn analyze_image(&self, image: &[u8]) -> VisualSignal {
        match &self.visual {
            Some(adapter) => adapter.analyze_image(image).await,
            None => {
                warn!("Image supplied but no emotion classifier is configured");
                VisualSignal::failure(false, VISUAL_NOT_CONFIGURED)
            }
        }
    }

    /// Fuse already-computed signals
    pub fn fuse(
        &self,
        text_analysis: Option<TextSignal>,
        visual_analysis: Option<VisualSignal>,
        manual: ManualOverride,
    ) -> FusionResult {
        let text = text_analysis.as_ref();
        let visual = visual_analysis.as_ref();

        if let Some(t) = text {
            debug!(
                "Text signal: score={:.1}, stress={:.1}, confidence={:.2}, usable={}",
                t.score,
                t.stress,
                t.confidence,
                t.is_usable()
            );
        }
        if let Some(v) = visual {
            debug!(
                "Visual signal: success={}, mood={:.1}, stress={:.1}, confidence={:.2}",
                v.success, v.mood_score, v.stress_level, v.confidence
            );
        }

        let final_mood = score_fuser::fuse_mood(text, visual, manual.mood.map(|m| round_to(m, 1)));
        let final_stress =
            score_fuser::fuse_stress(text, visual, manual.stress.map(|s| round_to(s, 1)));
        let confidence = score_fuser::fuse_confidence(text, visual);

        let recommendations = recommendations::generate(final_mood, final_stress, text, visual);

        info!(
            "Fused estimate: mood={:.1}, stress={:.1}, confidence={:.2} (manual mood={}, manual stress={})",
            final_mood,
            final_stress,
            confidence,
            manual.mood.is_some(),
            manual.stress.is_some()
        );

        FusionResult {
            final_mood,
            final_stress,
            confidence,
            text_analysis,
            visual_analysis,
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::NEUTRAL_CONFIDENCE;

    #[tokio::test]
    async fn test_no_inputs_give_neutral_defaults() {
        let result = FusionEngine::text_only()
            .analyze_combined(None, None, ManualOverride::none())
            .await;

        assert_eq!(result.final_mood, 5.0);
        assert_eq!(result.final_stress, 5.0);
        assert_eq!(result.confidence, NEUTRAL_CONFIDENCE);
        assert!(result.text_analysis.is_none());
        assert!(result.visual_analysis.is_none());
        assert_eq!(result.recommendations.len(), 2);
    }

    #[tokio::test]
    async fn test_blank_text_is_skipped() {
        let result = FusionEngine::text_only()
            .analyze_combined(Some("   "), None, ManualOverride::none())
            .await;
        assert!(result.text_analysis.is_none());
    }

    #[tokio::test]
    async fn test_image_without_classifier_fails_softly() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let result = FusionEngine::text_only()
            .analyze_combined(None, Some(&png), ManualOverride::none())
            .await;

        let visual = result.visual_analysis.unwrap();
        assert!(!visual.success);
        assert!(!visual.face_detected);
        assert_eq!(result.final_mood, 5.0);
    }

    #[tokio::test]
    async fn test_manual_values_are_rounded() {
        let manual = ManualOverride {
            mood: Some(7.26),
            stress: None,
        };
        let result = FusionEngine::text_only()
            .analyze_combined(None, None, manual)
            .await;
        assert_eq!(result.final_mood, 7.3);
        assert_eq!(result.final_stress, 5.0);
    }
}
