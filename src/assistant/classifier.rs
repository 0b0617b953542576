//! Intent classification
//!
//! Ordered substring rules over the lowercased message, evaluated in
//! priority order: fees (with the pending-clarification short-circuit),
//! rates, referrals, agent handoff, generic fallback. Pure — no network,
//! no speech, no transcript access — so every rule is directly testable.

use crate::models::FeeGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Fee question; `group` is `None` when Customer/Business could not be
    /// determined from the message and a clarification prompt is needed.
    FeeInquiry { group: Option<FeeGroup> },
    RateInquiry,
    ReferralInquiry,
    AgentHandoff,
    Fallback,
}

/// Clarification sub-state carried between turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingState {
    #[default]
    None,
    AwaitingFeeGroup,
}

/// Static keyword lists — zero allocation
const RATE_KEYWORDS: &[&str] = &["rate", "dollar", "naira", "fx"];

const REFERRAL_KEYWORDS: &[&str] = &["referral", "refer", "invite"];

const AGENT_KEYWORDS: &[&str] = &[
    "agent",
    "live agent",
    "human agent",
    "talk to agent",
    "speak to agent",
    "connect to agent",
    "video help",
    "video call",
    "call agent",
    "video support",
    "don't understand",
    "dont understand",
    "need help",
    "want help",
    "help me",
    "i need help",
    "i dont understand",
    "i don't understand",
    "confused",
    "need assistance",
    "human help",
    "connect me",
    "transfer me",
    "speak to someone",
    "talk to someone",
];

/// Classify one message against the current clarification state.
pub fn classify(text: &str, pending: PendingState) -> Intent {
    let lower = text.to_lowercase();

    let group = detect_group(&lower, pending);
    let resolves_pending = pending == PendingState::AwaitingFeeGroup && group.is_some();

    if lower.contains("fee") || resolves_pending {
        return Intent::FeeInquiry { group };
    }

    if RATE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return Intent::RateInquiry;
    }

    if REFERRAL_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return Intent::ReferralInquiry;
    }

    if AGENT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return Intent::AgentHandoff;
    }

    Intent::Fallback
}

/// Business wins when both group words appear. "company" only counts while
/// a clarification is pending.
fn detect_group(lower: &str, pending: PendingState) -> Option<FeeGroup> {
    let awaiting = pending == PendingState::AwaitingFeeGroup;

    if lower.contains("business") || (awaiting && lower.contains("company")) {
        Some(FeeGroup::Business)
    } else if lower.contains("customer") {
        Some(FeeGroup::Customer)
    } else {
        None
    }
}
