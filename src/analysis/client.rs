//! `Analyzer` trait and the `/api/text` backend client.
//!
//! [`ApiAnalyzer`] wraps the input in the analysis instruction, sends it in a
//! generative-model request envelope and digs the `{ipa, thought_groups}`
//! object out of the reply.  Connection details come from
//! [`BackendConfig`]; generation settings from [`AnalysisConfig`].

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::{AnalysisConfig, BackendConfig};

use super::prompt::PromptBuilder;
use super::recover::{extract_generated_text, recover_json};
use super::validator::validate_thought_groups;
use super::AnalysisError;

// ---------------------------------------------------------------------------
// AnalysisResult
// ---------------------------------------------------------------------------

/// IPA transcription plus thought-group segmentation of one input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub ipa: String,
    pub thought_groups: Vec<String>,
}

/// The object the model is asked to produce.  Both fields are optional so a
/// partial answer can still be repaired.
#[derive(Debug, Deserialize)]
struct ModelAnswer {
    #[serde(default)]
    ipa: Option<String>,
    #[serde(default)]
    thought_groups: Option<Vec<String>>,
}

impl ModelAnswer {
    /// Apply the thought-group rule: an invalid or missing list becomes the
    /// whole input as a single group.
    fn into_result(self, text: &str) -> AnalysisResult {
        let thought_groups = match self.thought_groups {
            Some(groups) if validate_thought_groups(Some(&groups)) => groups,
            other => {
                log::warn!(
                    "analysis: thought groups rejected ({} groups), using whole text",
                    other.as_ref().map_or(0, Vec::len)
                );
                vec![text.to_string()]
            }
        };
        AnalysisResult {
            ipa: self.ipa.unwrap_or_default(),
            thought_groups,
        }
    }
}

// ---------------------------------------------------------------------------
// Analyzer trait
// ---------------------------------------------------------------------------

/// Async trait for IPA + thought-group analysis.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn Analyzer>` between request handlers.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalysisError>;
}

// ---------------------------------------------------------------------------
// ApiAnalyzer
// ---------------------------------------------------------------------------

/// Calls `POST {backend}/api/text`.
pub struct ApiAnalyzer {
    client: reqwest::Client,
    backend: BackendConfig,
    config: AnalysisConfig,
    prompt_builder: PromptBuilder,
}

impl ApiAnalyzer {
    /// Build an `ApiAnalyzer` from the backend and analysis settings.
    pub fn from_config(backend: &BackendConfig, config: &AnalysisConfig) -> Self {
        Self {
            client: backend.http_client(),
            backend: backend.clone(),
            config: config.clone(),
            prompt_builder: PromptBuilder::new(&config.prompt_language),
        }
    }

    /// The generative-model request envelope for `text`.
    fn request_body(&self, text: &str) -> serde_json::Value {
        json!({
            "model": self.config.model,
            "generationConfig": {
                "responseMimeType": "application/json",
                "temperature":      self.config.temperature,
                "topK":             self.config.top_k,
                "topP":             self.config.top_p,
                "candidateCount":   1
            },
            "contents": [
                { "role": "user", "parts": [{ "text": self.prompt_builder.build(text) }] }
            ]
        })
    }
}

#[async_trait]
impl Analyzer for ApiAnalyzer {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        let url = self
            .backend
            .endpoint("/api/text")
            .ok_or(AnalysisError::Configuration)?;

        log::debug!("analysis: POST {url} ({} chars)", text.len());

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(text))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AnalysisError::RemoteAnalysis(body));
        }

        let envelope = recover_json(&body)?;
        let generated = extract_generated_text(&envelope);
        let answer: ModelAnswer = serde_json::from_value(recover_json(&generated)?)
            .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

        Ok(answer.into_result(text))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    /// Wrap `generated` in a response envelope the way the backend does.
    fn envelope(generated: &str) -> String {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": generated }] } }]
        })
        .to_string()
    }

    fn analyzer_for(url: &str) -> ApiAnalyzer {
        ApiAnalyzer::from_config(&BackendConfig::with_base_url(url), &AnalysisConfig::default())
    }

    #[test]
    fn request_body_carries_generation_settings() {
        let analyzer = analyzer_for("http://localhost");
        let body = analyzer.request_body("Hello there");

        assert_eq!(body["model"], "gemini-2.0-flash-lite-preview-02-05");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["temperature"], 0.0);
        assert_eq!(body["generationConfig"]["topK"], 1);
        assert_eq!(body["generationConfig"]["candidateCount"], 1);
        assert!((body["generationConfig"]["topP"].as_f64().unwrap() - 0.1).abs() < 1e-6);

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["role"], "user");
        let prompt = contents[0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("<<<Hello there>>>"));
    }

    #[tokio::test]
    async fn missing_backend_is_a_configuration_error() {
        let analyzer = ApiAnalyzer::from_config(&BackendConfig::default(), &AnalysisConfig::default());
        let err = analyzer.analyze("Hello").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration));
    }

    #[tokio::test]
    async fn valid_answer_is_returned_as_is() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/text")
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .with_status(200)
            .with_body(envelope(
                r#"{"ipa":"həˈləʊ ðeə","thought_groups":["Hello there","how are you"]}"#,
            ))
            .create_async()
            .await;

        let result = analyzer_for(&server.url())
            .analyze("Hello there how are you")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.ipa, "həˈləʊ ðeə");
        assert_eq!(result.thought_groups, vec!["Hello there", "how are you"]);
    }

    #[tokio::test]
    async fn answer_wrapped_in_prose_is_recovered() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/text")
            .with_status(200)
            .with_body(envelope(r#"blah {"ipa":"x","thought_groups":["a"]} blah"#))
            .create_async()
            .await;

        // "a" ends in a function word, so the groups fall back to the input.
        let result = analyzer_for(&server.url()).analyze("I saw a").await.unwrap();
        assert_eq!(result.ipa, "x");
        assert_eq!(result.thought_groups, vec!["I saw a"]);
    }

    #[tokio::test]
    async fn envelope_with_trailing_noise_is_recovered() {
        let mut server = mockito::Server::new_async().await;
        let body = format!(
            "data: {}\n",
            envelope(r#"{"ipa":"aɪ ɡəʊ","thought_groups":["I go"]}"#)
        );
        server
            .mock("POST", "/api/text")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let result = analyzer_for(&server.url()).analyze("I go").await.unwrap();
        assert_eq!(result.thought_groups, vec!["I go"]);
    }

    #[tokio::test]
    async fn invalid_groups_fall_back_to_whole_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/text")
            .with_status(200)
            .with_body(envelope(
                r#"{"ipa":"aɪ ɡəʊ tə ðə","thought_groups":["I go to the","market"]}"#,
            ))
            .create_async()
            .await;

        let result = analyzer_for(&server.url())
            .analyze("I go to the market")
            .await
            .unwrap();
        assert_eq!(result.thought_groups, vec!["I go to the market"]);
    }

    #[tokio::test]
    async fn missing_groups_fall_back_to_whole_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/text")
            .with_status(200)
            .with_body(envelope(r#"{"ipa":"haɪ"}"#))
            .create_async()
            .await;

        let result = analyzer_for(&server.url()).analyze("Hi").await.unwrap();
        assert_eq!(result.ipa, "haɪ");
        assert_eq!(result.thought_groups, vec!["Hi"]);
    }

    #[tokio::test]
    async fn non_success_status_carries_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/text")
            .with_status(502)
            .with_body("upstream quota exceeded")
            .create_async()
            .await;

        let err = analyzer_for(&server.url()).analyze("Hi").await.unwrap_err();
        match err {
            AnalysisError::RemoteAnalysis(body) => assert_eq!(body, "upstream quota exceeded"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_envelope_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/text")
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let err = analyzer_for(&server.url()).analyze("Hi").await.unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/text")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let err = analyzer_for(&server.url()).analyze("Hi").await.unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn wrongly_typed_groups_are_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/text")
            .with_status(200)
            .with_body(envelope(r#"{"ipa":"x","thought_groups":"Hi"}"#))
            .create_async()
            .await;

        let err = analyzer_for(&server.url()).analyze("Hi").await.unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    /// Verify that `ApiAnalyzer` is object-safe (usable as `dyn Analyzer`).
    #[test]
    fn analyzer_is_object_safe() {
        let analyzer: Box<dyn Analyzer> = Box::new(analyzer_for("http://localhost"));
        drop(analyzer);
    }
}
