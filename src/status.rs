//! # Network Status - Result Codes of the Wireless Stack
//!
//! Every call into the network stack reports one of a closed set of result
//! codes. This module gives them a typed form ([`NetworkStatus`]) and a fixed
//! human-readable label for diagnostics.
//!
//! The raw numbering follows the stack's C enumeration (0..=12). Codes outside
//! that range can still reach [`describe_status`] from a foreign stack binding;
//! they map to `"Unknown"`.

/// Label returned for any code outside the documented set
pub const UNKNOWN_STATUS_LABEL: &str = "Unknown";

/// Result codes reported by the network stack
///
/// `Success` is part of the set so that raw codes round-trip, but the
/// [`crate::NetworkStack`] methods return `Ok(..)` instead of
/// `Err(NetworkStatus::Success)`.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NetworkStatus {
    Success = 0,
    Timeout = 1,
    BadParam = 2,
    NoMem = 3,
    NoFrame = 4,
    NoLink = 5,
    NoJoin = 6,
    NoChannel = 7,
    NoPeerUnlink = 8,
    TxCcaFail = 9,
    NoPayload = 10,
    NoApAddress = 11,
    NoAck = 12,
}

impl NetworkStatus {
    /// Every documented status, in code order
    pub const ALL: [NetworkStatus; 13] = [
        NetworkStatus::Success,
        NetworkStatus::Timeout,
        NetworkStatus::BadParam,
        NetworkStatus::NoMem,
        NetworkStatus::NoFrame,
        NetworkStatus::NoLink,
        NetworkStatus::NoJoin,
        NetworkStatus::NoChannel,
        NetworkStatus::NoPeerUnlink,
        NetworkStatus::TxCcaFail,
        NetworkStatus::NoPayload,
        NetworkStatus::NoApAddress,
        NetworkStatus::NoAck,
    ];

    /// Raw code as reported by the stack
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Fixed label for this status
    pub const fn describe(self) -> &'static str {
        match self {
            NetworkStatus::Success => "SUCCESS",
            NetworkStatus::Timeout => "TIMEOUT",
            NetworkStatus::BadParam => "BAD_PARAM",
            NetworkStatus::NoMem => "NOMEM",
            NetworkStatus::NoFrame => "NO_FRAME",
            NetworkStatus::NoLink => "NO_LINK",
            NetworkStatus::NoJoin => "NO_JOIN",
            NetworkStatus::NoChannel => "NO_CHANNEL",
            NetworkStatus::NoPeerUnlink => "NO_PEER_UNLINK",
            NetworkStatus::TxCcaFail => "TX_CCA_FAIL",
            NetworkStatus::NoPayload => "NO_PAYLOAD",
            NetworkStatus::NoApAddress => "NO_AP_ADDRESS",
            NetworkStatus::NoAck => "NO_ACK",
        }
    }
}

impl TryFrom<u8> for NetworkStatus {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        NetworkStatus::ALL.get(code as usize).copied().ok_or(code)
    }
}

impl core::fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Maps a raw stack result code to its diagnostic label
///
/// Total: unmapped codes yield [`UNKNOWN_STATUS_LABEL`].
///
/// # Example
/// ```rust
/// use hub_end_device::describe_status;
///
/// assert_eq!(describe_status(12), "NO_ACK");
/// assert_eq!(describe_status(200), "Unknown");
/// ```
pub fn describe_status(code: u8) -> &'static str {
    match NetworkStatus::try_from(code) {
        Ok(status) => status.describe(),
        Err(_) => UNKNOWN_STATUS_LABEL,
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn documented_codes_have_distinct_non_empty_labels() {
        let mut seen = HashSet::new();
        for status in NetworkStatus::ALL {
            let label = describe_status(status.code());
            assert!(!label.is_empty());
            assert_ne!(label, UNKNOWN_STATUS_LABEL);
            assert!(seen.insert(label), "duplicate label {label}");
        }
        assert_eq!(seen.len(), 13);
    }

    #[test]
    fn codes_outside_the_set_fall_back_to_unknown() {
        for code in 13..=u8::MAX {
            assert_eq!(describe_status(code), UNKNOWN_STATUS_LABEL);
        }
    }

    #[test]
    fn raw_codes_follow_stack_numbering() {
        assert_eq!(NetworkStatus::try_from(0), Ok(NetworkStatus::Success));
        assert_eq!(NetworkStatus::try_from(9), Ok(NetworkStatus::TxCcaFail));
        assert_eq!(NetworkStatus::try_from(12), Ok(NetworkStatus::NoAck));
        assert_eq!(NetworkStatus::try_from(13), Err(13));
        assert_eq!(NetworkStatus::NoAck.to_string(), "NO_ACK");
    }
}
