//! The classifier adapter.
//!
//! Sends each candidate line to an OpenAI-compatible chat endpoint at zero
//! sampling temperature and hands the raw answer text to
//! [`Classification::from_response`] for defensive parsing. Transport and
//! parse failures never propagate; they degrade to an unset classification
//! and the pipeline moves on to the next line.

use std::fmt::Write as _;
use std::time::Duration;

use anyhow::Context as _;
use keyscan_core::prelude::*;

/// Model calls can be slow on local inference servers.
const MODEL_TIMEOUT: Duration = Duration::from_secs(120);

/// Classifier client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug)]
pub struct Classifier {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl Classifier {
    /// Creates a classifier against `base_url` (e.g. `http://host/v1`).
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(MODEL_TIMEOUT)
            .build()
            .context("failed to build classifier HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
            model: model.into(),
        })
    }

    /// Classifies one candidate line.
    ///
    /// Never fails: any transport error or unusable response yields a
    /// classification with both fields unset.
    pub async fn classify_line(&self, line: &str) -> Classification {
        match self.request(line).await {
            Ok(content) => Classification::from_response(line, &content),
            Err(error) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(%error, "classifier request failed; treating line as unclassified");
                #[cfg(not(feature = "tracing"))]
                let _ = error;
                Classification::empty(line)
            }
        }
    }

    async fn request(&self, line: &str) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": system_prompt() },
                { "role": "user", "content": format!("Analyze the following variable:\n{line}\n") },
            ],
        });

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response: serde_json::Value = request
            .send()
            .await
            .context("chat completion request failed")?
            .error_for_status()
            .context("chat completion returned an error status")?
            .json()
            .await
            .context("chat completion response was not valid JSON")?;

        response
            .pointer("/choices/0/message/content")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .context("chat completion response had no message content")
    }
}

/// The fixed system instruction sent with every candidate line.
fn system_prompt() -> String {
    let mut providers = String::new();
    for (i, provider) in Provider::all().iter().enumerate() {
        if i > 0 {
            providers.push_str(", ");
        }
        let _ = write!(providers, "\"{provider}\"");
    }

    format!(
        "You are a highly specialized AI assistant tasked with analyzing a single \
         variable from a .env file. Your primary task is to determine if the value \
         of the variable contains a potentially valid API key. Your output must be \
         in a strict JSON format with two keys: `confidence` and `provider`.\n\n\
         The `confidence` key indicates how confident you are that the value is a \
         potentially valid API key. The confidence value must be a string value \
         from the following list: \"NONE\", \"LOW\", \"MEDIUM\", \"HIGH\".\n\
         The `provider` key indicates the provider of the API key. The value must \
         be a value from the following list: {providers}\n\
         A potentially valid API key does not include example values or \
         placeholder values. A potentially valid API key should be directly usable \
         for authenticating an API request. Do not overthink."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn chat_response(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [ { "message": { "role": "assistant", "content": content } } ]
        })
    }

    fn classifier_for(server: &MockServer, api_key: Option<&str>) -> Classifier {
        Classifier::new(format!("{}/v1", server.uri()), api_key.map(String::from), "test-model")
            .unwrap_or_else(|_| unreachable!("classifier should build"))
    }

    #[test]
    fn prompt_names_every_provider_label() {
        let prompt = system_prompt();
        for provider in Provider::all() {
            assert!(prompt.contains(&format!("\"{provider}\"")), "missing {provider}");
        }
    }

    #[tokio::test]
    async fn parses_a_clean_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({ "temperature": 0, "model": "test-model" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(chat_response("{\"confidence\":\"HIGH\",\"provider\":\"openai\"}")),
            )
            .mount(&server)
            .await;

        let classification = classifier_for(&server, None)
            .classify_line("API_KEY=\"sk-live-abc\"")
            .await;

        assert_eq!(classification.confidence, Some(Confidence::High));
        assert_eq!(classification.provider, Some(Provider::OpenAi));
    }

    #[tokio::test]
    async fn sends_bearer_auth_when_key_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("Authorization", "Bearer sk-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("{}")))
            .expect(1)
            .mount(&server)
            .await;

        let _ = classifier_for(&server, Some("sk-123")).classify_line("K=v").await;
    }

    #[tokio::test]
    async fn transport_failure_degrades_to_unset() {
        let server = MockServer::start().await;
        let classifier = classifier_for(&server, None);
        drop(server);

        let classification = classifier.classify_line("K=v").await;
        assert_eq!(classification.confidence, None);
        assert_eq!(classification.provider, None);
        assert_eq!(classification.line, "K=v");
    }

    #[tokio::test]
    async fn error_status_degrades_to_unset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let classification = classifier_for(&server, None).classify_line("K=v").await;
        assert_eq!(classification.confidence, None);
    }

    #[tokio::test]
    async fn answer_wrapped_in_prose_still_parses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(
                "Sure! Looking at {this} line...\n{\"confidence\":\"MEDIUM\",\"provider\":\"groq\"}\nDone.",
            )))
            .mount(&server)
            .await;

        let classification = classifier_for(&server, None).classify_line("GROQ_KEY=gsk_1").await;
        assert_eq!(classification.confidence, Some(Confidence::Medium));
        assert_eq!(classification.provider, Some(Provider::Groq));
    }
}
