//! Response Classifier.
//!
//! Decides whether a query reply came from an accessory and rewrites the
//! reply's field labels into the short keys used in the accessory list.

use tadisc_common::accessory::{AccessoryRecord, InvalidReason, InvalidResponse};
use tadisc_common::network::host::QueryOutcome;

/// Literal rewrites applied to a normalized reply, in this order.
///
/// None of the patterns contains another, and no replacement produces a
/// later pattern.
pub static FIELD_REWRITES: &[(&str, &str)] = &[
    ("ethaddr=", "MAC="),
    ("PS9: ", "Batt="),
    ("PS8: ", "PoeV="),
    ("EtherType: ", "NsType="),
    ("Device ID: ", "NsDev="),
    ("Addresses: ", "NsAddr="),
    ("Platform: ", "NsPlatform="),
    ("Port ID: ", "NsPort="),
    ("Vlan ID:", "NsVlan="),
    // escaped newline sent by some firmware, not a real line break
    ("\\n", ";"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Valid(String),
    Invalid(InvalidReason),
}

pub fn classify(reply: &[u8], marker: &str) -> Classification {
    if reply.is_empty() {
        return Classification::Invalid(InvalidReason::NoResponse);
    }

    let Ok(text) = std::str::from_utf8(reply) else {
        return Classification::Invalid(InvalidReason::DecodeError);
    };

    if !text.contains(marker) {
        return Classification::Invalid(InvalidReason::MarkerNotFound);
    }

    Classification::Valid(normalize(text))
}

/// Collapses whitespace runs to single spaces and applies [`FIELD_REWRITES`].
pub fn normalize(text: &str) -> String {
    let collapsed: String = text.split_whitespace().collect::<Vec<&str>>().join(" ");

    FIELD_REWRITES
        .iter()
        .fold(collapsed, |acc, (from, to)| acc.replace(from, to))
}

/// Classifies a query outcome and binds the verdict to its host.
pub fn classify_outcome(
    outcome: &QueryOutcome,
    marker: &str,
) -> Result<AccessoryRecord, InvalidResponse> {
    match classify(&outcome.reply, marker) {
        Classification::Valid(attributes) => Ok(AccessoryRecord::new(outcome.host, attributes)),
        Classification::Invalid(reason) => Err(InvalidResponse {
            host: outcome.host,
            reason,
            text: std::str::from_utf8(&outcome.reply)
                .ok()
                .filter(|text| !text.is_empty())
                .map(str::to_owned),
        }),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
