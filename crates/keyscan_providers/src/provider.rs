//! The closed set of API key providers the classifier may name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A service that issues the kind of API key keyscan hunts for.
///
/// The classifier model is constrained to answer with one of these labels.
/// Anything outside the set degrades to "no signal" during parsing, so
/// adding a provider is an enum edit plus an optional probe table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    /// OpenAI platform keys (`sk-...`).
    #[serde(rename = "openai")]
    OpenAi,
    /// Anthropic API keys (`sk-ant-...`).
    #[serde(rename = "anthropic")]
    Anthropic,
    /// Google AI Studio keys.
    #[serde(rename = "google")]
    Google,
    /// Gemini keys; verified through the same endpoint as `Google`.
    #[serde(rename = "gemini")]
    Gemini,
    /// Grok keys; alias the model sometimes uses for xAI.
    #[serde(rename = "grok")]
    Grok,
    /// xAI platform keys.
    #[serde(rename = "xai")]
    Xai,
    /// Groq cloud keys.
    #[serde(rename = "groq")]
    Groq,
    /// DeepSeek platform keys.
    #[serde(rename = "deepseek")]
    DeepSeek,
    /// Mistral platform keys.
    #[serde(rename = "mistral")]
    Mistral,
    /// Cohere platform keys.
    #[serde(rename = "cohere")]
    Cohere,
    /// Black Forest Labs keys. No free probe endpoint is known.
    #[serde(rename = "black_forest_labs")]
    BlackForestLabs,
    /// Together AI keys.
    #[serde(rename = "together")]
    Together,
    /// Perplexity keys. No free probe endpoint is known.
    #[serde(rename = "perplexity")]
    Perplexity,
    /// OpenRouter keys.
    #[serde(rename = "openrouter")]
    OpenRouter,
    /// Replicate keys.
    #[serde(rename = "replicate")]
    Replicate,
    /// Fireworks AI keys.
    #[serde(rename = "fireworks")]
    Fireworks,
    /// DeepInfra keys. The models endpoint is unauthenticated, so no probe.
    #[serde(rename = "deepinfra")]
    DeepInfra,
    /// Azure keys. Verification endpoints are deployment specific.
    #[serde(rename = "azure")]
    Azure,
    /// Azure OpenAI keys. Verification endpoints are deployment specific.
    #[serde(rename = "azure_openai")]
    AzureOpenAi,
    /// AWS credentials. Verification is region specific.
    #[serde(rename = "aws")]
    Aws,
    /// Bedrock credentials; alias the model sometimes uses for AWS.
    #[serde(rename = "bedrock")]
    Bedrock,
    /// AWS Bedrock credentials.
    #[serde(rename = "aws_bedrock")]
    AwsBedrock,
    /// Hugging Face tokens.
    #[serde(rename = "huggingface")]
    HuggingFace,
    /// Stability AI keys.
    #[serde(rename = "stability_ai")]
    StabilityAi,
    /// NVIDIA API keys. No free probe endpoint is known.
    #[serde(rename = "nvidia")]
    Nvidia,
    /// GitHub tokens.
    #[serde(rename = "github")]
    GitHub,
    /// GitHub Copilot tokens.
    #[serde(rename = "copilot")]
    Copilot,
    /// A real key whose issuer is not in this list.
    #[serde(rename = "other")]
    Other,
}

const ALL_PROVIDERS: &[Provider] = &[
    Provider::OpenAi,
    Provider::Anthropic,
    Provider::Google,
    Provider::Gemini,
    Provider::Grok,
    Provider::Xai,
    Provider::Groq,
    Provider::DeepSeek,
    Provider::Mistral,
    Provider::Cohere,
    Provider::BlackForestLabs,
    Provider::Together,
    Provider::Perplexity,
    Provider::OpenRouter,
    Provider::Replicate,
    Provider::Fireworks,
    Provider::DeepInfra,
    Provider::Azure,
    Provider::AzureOpenAi,
    Provider::Aws,
    Provider::Bedrock,
    Provider::AwsBedrock,
    Provider::HuggingFace,
    Provider::StabilityAi,
    Provider::Nvidia,
    Provider::GitHub,
    Provider::Copilot,
    Provider::Other,
];

impl Provider {
    /// Every provider label, in the order presented to the classifier prompt.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        ALL_PROVIDERS
    }

    /// Parses a classifier-emitted label into a provider.
    ///
    /// Returns `None` for anything outside the closed set; a hallucinated
    /// label is a normal outcome, not an error.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let provider = match label {
            "openai" => Self::OpenAi,
            "anthropic" => Self::Anthropic,
            "google" => Self::Google,
            "gemini" => Self::Gemini,
            "grok" => Self::Grok,
            "xai" => Self::Xai,
            "groq" => Self::Groq,
            "deepseek" => Self::DeepSeek,
            "mistral" => Self::Mistral,
            "cohere" => Self::Cohere,
            "black_forest_labs" => Self::BlackForestLabs,
            "together" => Self::Together,
            "perplexity" => Self::Perplexity,
            "openrouter" => Self::OpenRouter,
            "replicate" => Self::Replicate,
            "fireworks" => Self::Fireworks,
            "deepinfra" => Self::DeepInfra,
            "azure" => Self::Azure,
            "azure_openai" => Self::AzureOpenAi,
            "aws" => Self::Aws,
            "bedrock" => Self::Bedrock,
            "aws_bedrock" => Self::AwsBedrock,
            "huggingface" => Self::HuggingFace,
            "stability_ai" => Self::StabilityAi,
            "nvidia" => Self::Nvidia,
            "github" => Self::GitHub,
            "copilot" => Self::Copilot,
            "other" => Self::Other,
            _ => return None,
        };
        Some(provider)
    }

    /// Returns the wire label for this provider (e.g. `"azure_openai"`).
    #[must_use]
    pub const fn as_label(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::Gemini => "gemini",
            Self::Grok => "grok",
            Self::Xai => "xai",
            Self::Groq => "groq",
            Self::DeepSeek => "deepseek",
            Self::Mistral => "mistral",
            Self::Cohere => "cohere",
            Self::BlackForestLabs => "black_forest_labs",
            Self::Together => "together",
            Self::Perplexity => "perplexity",
            Self::OpenRouter => "openrouter",
            Self::Replicate => "replicate",
            Self::Fireworks => "fireworks",
            Self::DeepInfra => "deepinfra",
            Self::Azure => "azure",
            Self::AzureOpenAi => "azure_openai",
            Self::Aws => "aws",
            Self::Bedrock => "bedrock",
            Self::AwsBedrock => "aws_bedrock",
            Self::HuggingFace => "huggingface",
            Self::StabilityAi => "stability_ai",
            Self::Nvidia => "nvidia",
            Self::GitHub => "github",
            Self::Copilot => "copilot",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
