//! Probe registry mapping providers to verification endpoints.

use std::collections::HashMap;
use std::time::Duration;

use crate::USER_AGENT;
use crate::provider::Provider;
use crate::verify::{AuthScheme, ProbeSpec, Validity, VerificationError};

/// Fixed probe timeout, deliberately shorter than document-fetch timeouts.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Central registry of verification probes, one per provider with a known
/// free authenticated endpoint.
///
/// Owns the HTTP client used for probing. Providers without an entry verify
/// as [`Validity::Unknown`] unconditionally.
pub struct ProbeRegistry {
    probes: HashMap<Provider, ProbeSpec>,
    client: reqwest::Client,
}

impl ProbeRegistry {
    /// Creates a registry pre-loaded with every builtin probe.
    pub fn builtin() -> Result<Self, VerificationError> {
        Self::with_probes(builtin_probes())
    }

    /// Creates a registry from an explicit probe table.
    ///
    /// Used by tests to aim probes at a mock server; production code goes
    /// through [`ProbeRegistry::builtin`].
    pub fn with_probes(
        probes: impl IntoIterator<Item = (Provider, ProbeSpec)>,
    ) -> Result<Self, VerificationError> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| VerificationError::ClientInit(e.to_string()))?;

        Ok(Self {
            probes: probes.into_iter().collect(),
            client,
        })
    }

    /// Returns `true` if the provider has a configured probe.
    #[must_use]
    pub fn supports(&self, provider: Provider) -> bool {
        self.probes.contains_key(&provider)
    }

    /// Returns the number of configured probes.
    #[must_use]
    pub fn probe_count(&self) -> usize {
        self.probes.len()
    }

    /// Probes the provider's endpoint with the candidate key.
    ///
    /// Exactly HTTP 200 means [`Validity::Valid`]; any other status means
    /// [`Validity::Invalid`]; a transport failure (timeout, DNS, TLS) or a
    /// provider with no probe means [`Validity::Unknown`].
    pub async fn verify(&self, provider: Provider, key: &str) -> Validity {
        let Some(probe) = self.probes.get(&provider) else {
            return Validity::Unknown;
        };

        let mut request = match &probe.auth {
            AuthScheme::Bearer => self.client.get(&probe.url).bearer_auth(key),
            AuthScheme::Header(name) => self.client.get(&probe.url).header(name.as_str(), key),
            AuthScheme::Query(param) => self.client.get(&probe.url).query(&[(param.as_str(), key)]),
        };

        for (name, value) in &probe.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        match request.send().await {
            Ok(response) if response.status().as_u16() == 200 => Validity::Valid,
            Ok(_) => Validity::Invalid,
            Err(_) => Validity::Unknown,
        }
    }
}

impl std::fmt::Debug for ProbeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeRegistry")
            .field("probe_count", &self.probes.len())
            .finish_non_exhaustive()
    }
}

/// The builtin probe table.
///
/// Endpoints are model-listing style URLs that are free to call. Providers
/// absent from this table have no safe free endpoint: DeepInfra's models
/// endpoint is unauthenticated, Azure and AWS endpoints are deployment or
/// region specific, and NVIDIA and Black Forest Labs expose no free
/// authenticated endpoint at all.
fn builtin_probes() -> Vec<(Provider, ProbeSpec)> {
    vec![
        (
            Provider::OpenAi,
            ProbeSpec::bearer("https://api.openai.com/v1/models"),
        ),
        (
            Provider::Anthropic,
            ProbeSpec::header("https://api.anthropic.com/v1/models", "x-api-key")
                .with_header("anthropic-version", "2023-06-01"),
        ),
        (
            Provider::Google,
            ProbeSpec::query("https://generativelanguage.googleapis.com/v1/models", "key"),
        ),
        (
            Provider::Gemini,
            ProbeSpec::query("https://generativelanguage.googleapis.com/v1/models", "key"),
        ),
        (Provider::Grok, ProbeSpec::bearer("https://api.x.ai/v1/models")),
        (Provider::Xai, ProbeSpec::bearer("https://api.x.ai/v1/models")),
        (
            Provider::Groq,
            ProbeSpec::bearer("https://api.groq.com/openai/v1/models"),
        ),
        (
            Provider::DeepSeek,
            ProbeSpec::bearer("https://api.deepseek.com/models"),
        ),
        (
            Provider::Mistral,
            ProbeSpec::bearer("https://api.mistral.ai/v1/models"),
        ),
        (
            Provider::Cohere,
            ProbeSpec::bearer("https://api.cohere.ai/v1/models"),
        ),
        (
            Provider::Together,
            ProbeSpec::bearer("https://api.together.xyz/v1/models"),
        ),
        // The OpenRouter models endpoint does not require a key; the
        // credits endpoint does.
        (
            Provider::OpenRouter,
            ProbeSpec::bearer("https://openrouter.ai/api/v1/credits"),
        ),
        (
            Provider::Replicate,
            ProbeSpec::bearer("https://api.replicate.com/v1/models"),
        ),
        (
            Provider::Fireworks,
            ProbeSpec::bearer("https://api.fireworks.ai/v1/models"),
        ),
        (
            Provider::HuggingFace,
            ProbeSpec::bearer("https://huggingface.co/api/whoami-v2"),
        ),
        (
            Provider::StabilityAi,
            ProbeSpec::bearer("https://api.stability.ai/v1/engines/list"),
        ),
    ]
}
