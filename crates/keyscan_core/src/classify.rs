//! Classifier output types and defensive model-response parsing.
//!
//! The model's answer is untrusted free text that usually, but not always,
//! contains a JSON object. Parsing never fails: anything malformed or
//! outside the closed enumerations degrades to unset fields, and the
//! pipeline treats unset as "no signal".

use std::fmt;

use keyscan_providers::Provider;
use serde::{Deserialize, Serialize};

/// The classifier's self-reported certainty that a line holds a real key.
///
/// Variants are ordered (`None < Low < Medium < High`) so the decision
/// policy can compare against a threshold with `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Confidence {
    /// The line does not contain a credential.
    #[serde(rename = "NONE")]
    None,
    /// Possibly a credential, likely a placeholder or example.
    #[serde(rename = "LOW")]
    Low,
    /// Plausibly a real credential.
    #[serde(rename = "MEDIUM")]
    Medium,
    /// Almost certainly a real credential.
    #[serde(rename = "HIGH")]
    High,
}

impl Confidence {
    /// Parses a classifier-emitted confidence label.
    ///
    /// Returns `None` for anything outside the closed set.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "NONE" => Some(Self::None),
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }

    /// Returns the wire label for this confidence level.
    #[must_use]
    pub const fn as_label(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// A parsed classifier judgement for one candidate line.
///
/// Unset fields mean the model's answer did not parse or named something
/// outside the closed enumerations. That is a common, valid outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Parsed confidence level, if the model produced a recognised one.
    pub confidence: Option<Confidence>,
    /// Parsed provider, if the model produced a recognised one.
    pub provider: Option<Provider>,
    /// The candidate line this judgement is about.
    pub line: String,
}

impl Classification {
    /// A classification with both fields unset.
    #[must_use]
    pub fn empty(line: impl Into<String>) -> Self {
        Self {
            confidence: None,
            provider: None,
            line: line.into(),
        }
    }

    /// Parses a raw model response into a classification.
    ///
    /// The response may wrap the JSON object in prose or markdown fences;
    /// the last balanced `{...}` span is taken as the answer. Any parse
    /// failure leaves both fields unset rather than erroring.
    #[must_use]
    pub fn from_response(line: impl Into<String>, response: &str) -> Self {
        let line = line.into();

        let Some(span) = extract_json_object(response) else {
            return Self::empty(line);
        };

        let object: serde_json::Value = match serde_json::from_str(span) {
            Ok(object) => object,
            Err(_error) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_error, "classifier response JSON did not parse");
                return Self::empty(line);
            }
        };

        let confidence = object
            .get("confidence")
            .and_then(serde_json::Value::as_str)
            .and_then(Confidence::from_label);
        let provider = object
            .get("provider")
            .and_then(serde_json::Value::as_str)
            .and_then(Provider::from_label);

        Self {
            confidence,
            provider,
            line,
        }
    }
}

/// Finds the last balanced `{...}` span in free text.
///
/// Scans in reverse: the first `}` seen fixes the end, and the first `{`
/// found after it closes the span. Models sometimes emit commentary with
/// incidental braces before their real answer, which is why the last span
/// wins over the first. The returned slice is not guaranteed to be valid
/// JSON; callers still parse it.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<&str> {
    let mut end = None;
    for (i, ch) in text.char_indices().rev() {
        match ch {
            '}' if end.is_none() => end = Some(i),
            '{' => {
                if let Some(end) = end {
                    return text.get(i..=end);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_takes_the_last_balanced_span() {
        let text = "noise {\"a\":1} more {\"confidence\":\"HIGH\",\"provider\":\"openai\"} trailing";
        assert_eq!(
            extract_json_object(text),
            Some("{\"confidence\":\"HIGH\",\"provider\":\"openai\"}")
        );
    }

    #[test]
    fn unbalanced_open_brace_yields_nothing() {
        assert_eq!(extract_json_object("some { unclosed"), None);
        assert_eq!(extract_json_object("}{"), None);
    }

    #[test]
    fn plain_text_yields_nothing() {
        assert_eq!(extract_json_object("no braces here"), None);
        assert_eq!(extract_json_object(""), None);
    }

    #[test]
    fn markdown_fenced_answer_is_found() {
        let text = "Here is my answer:\n```json\n{\"confidence\": \"LOW\", \"provider\": \"groq\"}\n```\n";
        let classification = Classification::from_response("GROQ_KEY=gsk_x", text);
        assert_eq!(classification.confidence, Some(Confidence::Low));
        assert_eq!(classification.provider, Some(Provider::Groq));
    }

    #[test]
    fn recognised_fields_parse() {
        let classification =
            Classification::from_response("K=v", "{\"confidence\":\"MEDIUM\",\"provider\":\"mistral\"}");
        assert_eq!(classification.confidence, Some(Confidence::Medium));
        assert_eq!(classification.provider, Some(Provider::Mistral));
        assert_eq!(classification.line, "K=v");
    }

    #[test]
    fn hallucinated_labels_degrade_to_unset() {
        let classification =
            Classification::from_response("K=v", "{\"confidence\":\"VERY HIGH\",\"provider\":\"skynet\"}");
        assert_eq!(classification.confidence, None);
        assert_eq!(classification.provider, None);
    }

    #[test]
    fn invalid_json_degrades_to_unset() {
        let classification = Classification::from_response("K=v", "{confidence: HIGH}");
        assert_eq!(classification.confidence, None);
        assert_eq!(classification.provider, None);
    }

    #[test]
    fn missing_fields_stay_unset() {
        let classification = Classification::from_response("K=v", "{\"confidence\":\"HIGH\"}");
        assert_eq!(classification.confidence, Some(Confidence::High));
        assert_eq!(classification.provider, None);
    }

    #[test]
    fn non_string_fields_stay_unset() {
        let classification = Classification::from_response("K=v", "{\"confidence\":3,\"provider\":null}");
        assert_eq!(classification.confidence, None);
        assert_eq!(classification.provider, None);
    }

    #[test]
    fn confidence_levels_are_ordered() {
        assert!(Confidence::None < Confidence::Low);
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }

    #[test]
    fn confidence_labels_round_trip() {
        for level in [Confidence::None, Confidence::Low, Confidence::Medium, Confidence::High] {
            assert_eq!(Confidence::from_label(level.as_label()), Some(level));
        }
        assert_eq!(Confidence::from_label("high"), None);
    }
}
