//! The persist/discard decision policy.
//!
//! Splits into two stages: a cheap gate applied before any verification
//! probe is spent, and the final acceptance rule combining the model's
//! confidence with the live-check outcome.

use keyscan_providers::{Provider, Validity};

use crate::classify::{Classification, Confidence};

/// Decides whether a classification is worth a verification probe.
///
/// Lines with an unset confidence, an unset provider, or a confidence of
/// `NONE` are discarded here, saving the network call entirely.
#[must_use]
pub fn verification_gate(classification: &Classification) -> Option<(Confidence, Provider)> {
    let confidence = classification.confidence?;
    let provider = classification.provider?;

    if confidence == Confidence::None {
        return None;
    }

    Some((confidence, provider))
}

/// Decides whether a verified classification becomes a persisted finding.
///
/// A confirmed-live key always persists. An inconclusive check persists
/// only with at least medium confidence. A high-confidence judgement
/// persists even over a failed live check, so an imperfect verifier cannot
/// drop a true positive.
#[must_use]
pub fn accept(confidence: Confidence, validity: Validity) -> bool {
    validity == Validity::Valid
        || (validity == Validity::Unknown && confidence >= Confidence::Medium)
        || confidence == Confidence::High
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_key_is_accepted_at_any_gated_confidence() {
        assert!(accept(Confidence::Low, Validity::Valid));
        assert!(accept(Confidence::Medium, Validity::Valid));
        assert!(accept(Confidence::High, Validity::Valid));
    }

    #[test]
    fn high_confidence_overrides_a_failed_check() {
        assert!(accept(Confidence::High, Validity::Invalid));
        assert!(accept(Confidence::High, Validity::Unknown));
    }

    #[test]
    fn unknown_check_needs_medium_confidence() {
        assert!(accept(Confidence::Medium, Validity::Unknown));
        assert!(!accept(Confidence::Low, Validity::Unknown));
    }

    #[test]
    fn medium_confidence_with_invalid_check_is_rejected() {
        assert!(!accept(Confidence::Medium, Validity::Invalid));
        assert!(!accept(Confidence::Low, Validity::Invalid));
    }

    #[test]
    fn gate_discards_unset_fields() {
        let mut classification = Classification::empty("K=v");
        assert_eq!(verification_gate(&classification), None);

        classification.confidence = Some(Confidence::High);
        assert_eq!(verification_gate(&classification), None);

        classification.confidence = None;
        classification.provider = Some(Provider::OpenAi);
        assert_eq!(verification_gate(&classification), None);
    }

    #[test]
    fn gate_discards_none_confidence() {
        let mut classification = Classification::empty("K=v");
        classification.confidence = Some(Confidence::None);
        classification.provider = Some(Provider::OpenAi);
        assert_eq!(verification_gate(&classification), None);
    }

    #[test]
    fn gate_passes_low_and_above() {
        let mut classification = Classification::empty("K=v");
        classification.confidence = Some(Confidence::Low);
        classification.provider = Some(Provider::Cohere);
        assert_eq!(
            verification_gate(&classification),
            Some((Confidence::Low, Provider::Cohere))
        );
    }
}
