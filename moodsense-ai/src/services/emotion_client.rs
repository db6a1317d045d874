//! Facial-emotion classification client
//!
//! Talks to a DeepFace-compatible REST service (`POST {endpoint}/analyze`).
//! One request per image; no retry.

use crate::fusion::extractors::{ClassifierError, EmotionClassifier, FaceAnalysis};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("moodsense-ai/", env!("CARGO_PKG_VERSION"));

/// Service message fragment meaning no face was found
const NO_FACE_MARKER: &str = "face could not be detected";

/// Analyze request body
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    img: String,
    actions: [&'a str; 3],
    enforce_detection: bool,
    detector_backend: &'a str,
}

/// Analyze response body
#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    results: Vec<FaceResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FaceResult {
    #[serde(default)]
    emotion: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    dominant_emotion: Option<String>,
    #[serde(default)]
    age: Option<f64>,
    #[serde(default)]
    dominant_gender: Option<String>,
    #[serde(default)]
    gender: BTreeMap<String, f64>,
}

/// HTTP client for a DeepFace-compatible facial analysis service
pub struct HttpEmotionClassifier {
    http_client: reqwest::Client,
    analyze_url: String,
    detector_backend: String,
}

impl HttpEmotionClassifier {
    pub fn new(
        endpoint: &str,
        timeout: Duration,
        detector_backend: impl Into<String>,
    ) -> Result<Self, ClassifierError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ClassifierError::Failed(e.to_string()))?;

        Ok(Self {
            http_client,
            analyze_url: format!("{}/analyze", endpoint.trim_end_matches('/')),
            detector_backend: detector_backend.into(),
        })
    }

    pub fn analyze_url(&self) -> &str {
        &self.analyze_url
    }

    fn data_uri(image: &[u8]) -> String {
        let mime = infer::get(image)
            .map(|kind| kind.mime_type())
            .unwrap_or("image/jpeg");
        format!("data:{};base64,{}", mime, BASE64.encode(image))
    }
}

/// Map a parsed service response onto a classification outcome
fn interpret_response(response: AnalyzeResponse) -> Result<FaceAnalysis, ClassifierError> {
    if let Some(message) = response.error {
        return Err(classify_error_message(message));
    }

    let face = response
        .results
        .into_iter()
        .next()
        .ok_or(ClassifierError::NoFace)?;

    // A result entry means the service located a face
    let emotion = face.emotion.ok_or_else(|| {
        ClassifierError::FaceDetected("no emotion scores returned".to_string())
    })?;
    let dominant_emotion = face.dominant_emotion.ok_or_else(|| {
        ClassifierError::FaceDetected("no dominant emotion returned".to_string())
    })?;

    Ok(FaceAnalysis {
        emotion,
        dominant_emotion,
        age: face.age,
        dominant_gender: face.dominant_gender,
        gender: face.gender,
    })
}

fn classify_error_message(message: String) -> ClassifierError {
    if message.to_lowercase().contains(NO_FACE_MARKER) {
        ClassifierError::NoFace
    } else {
        ClassifierError::Failed(message)
    }
}

#[async_trait]
impl EmotionClassifier for HttpEmotionClassifier {
    fn source_id(&self) -> &'static str {
        "DeepFace"
    }

    async fn classify(&self, image: &[u8]) -> Result<FaceAnalysis, ClassifierError> {
        let request = AnalyzeRequest {
            img: Self::data_uri(image),
            actions: ["emotion", "age", "gender"],
            enforce_detection: true,
            detector_backend: &self.detector_backend,
        };

        debug!("Sending {} byte image to {}", image.len(), self.analyze_url);

        let response = self
            .http_client
            .post(&self.analyze_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClassifierError::Failed(format!("Network error: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClassifierError::Failed(format!("Network error: {}", e)))?;

        match serde_json::from_str::<AnalyzeResponse>(&body) {
            Ok(parsed) => interpret_response(parsed),
            Err(_) if !status.is_success() => Err(classify_error_message(format!(
                "API error {}: {}",
                status.as_u16(),
                body
            ))),
            Err(e) => Err(ClassifierError::Failed(format!("Parse error: {}", e))),
        }
    }
}
