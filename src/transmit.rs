//! # Transmit - Acknowledged Send with Bounded Retry
//!
//! One button press becomes one 2-byte message `[target_indicator, tid]`.
//! The message is sent with the ack-request option up to `misses_in_a_row`
//! times per cycle:
//!
//! 1. An acknowledged attempt ends the send; display indicator 1 toggles.
//! 2. If every attempt of the cycle came back "no ack", display indicator 2 toggles
//!    and the [`RetryPolicy`] decides between a new cycle and giving up.
//! 3. A cycle that failed for other reasons (e.g. the clear channel
//!    assessment) ends the send without a rescan: the frame never left, so
//!    the channel is not suspect.
//!
//! Nothing here is fatal. The worst case is a dropped message.

use crate::indicators::{Indicator, Indicators};
use crate::network_stacks::{LinkId, NetworkStack, TxOptions};
use crate::retry_policy::{RetryDecision, RetryPolicy};
use crate::NetworkStatus;
use log::{Level, log};

/// Size of an outbound message
pub const MESSAGE_SIZE: usize = 2;

/// Why a message was dropped
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SendFailure {
    /// Every attempt went unacknowledged and the policy gave up
    Unacknowledged,
    /// The rescan probe after a fully unacknowledged cycle failed
    ProbeFailed(NetworkStatus),
    /// No attempt succeeded and not all of them missed only the ack
    TransmitFailed(NetworkStatus),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SendOutcome {
    /// Acknowledged on the `attempts`-th transmission
    Acked { attempts: u32 },
    /// Dropped after `attempts` transmissions
    Abandoned { attempts: u32, reason: SendFailure },
}

impl SendOutcome {
    pub fn is_acked(&self) -> bool {
        matches!(self, SendOutcome::Acked { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            SendOutcome::Acked { attempts } | SendOutcome::Abandoned { attempts, .. } => *attempts,
        }
    }
}

/// Builds the message asking the access point to toggle `target_indicator`
pub const fn build_message(target_indicator: u8, transaction_id: u8) -> [u8; MESSAGE_SIZE] {
    [target_indicator, transaction_id]
}

// Saturates: a frequency-agility send can cycle for as long as probes succeed
const fn count_attempt(attempts: u32) -> u32 {
    attempts.saturating_add(1)
}

/// Sends `message` over `link` until acknowledged or abandoned
///
/// A `misses_in_a_row` of zero is treated as one.
pub async fn send_acknowledged<N, I>(
    network: &mut N,
    indicators: &mut I,
    link: LinkId,
    message: &[u8],
    misses_in_a_row: u8,
    policy: RetryPolicy,
) -> SendOutcome
where
    N: NetworkStack,
    I: Indicators,
{
    let misses_in_a_row = misses_in_a_row.max(1);
    let mut attempts: u32 = 0;
    loop {
        let mut no_ack: u8 = 0;
        let mut last_error = None;
        for _ in 0..misses_in_a_row {
            attempts = count_attempt(attempts);
            match network.send(link, message, TxOptions::ACK_REQUEST).await {
                Ok(()) => {
                    indicators.toggle(Indicator::Display1);
                    return SendOutcome::Acked { attempts };
                }
                Err(NetworkStatus::NoAck) => {
                    no_ack += 1;
                }
                Err(status) => {
                    log!(Level::Debug, "Transmit attempt {} failed: {}", attempts, status.describe());
                    last_error = Some(status);
                }
            }
        }

        if no_ack < misses_in_a_row {
            let reason = match last_error {
                Some(status) => SendFailure::TransmitFailed(status),
                None => SendFailure::Unacknowledged,
            };
            return SendOutcome::Abandoned { attempts, reason };
        }

        indicators.toggle(Indicator::Display2);
        log!(Level::Debug, "{} transmissions without ack", misses_in_a_row);
        match policy.after_missed_acks(network, link).await {
            RetryDecision::Resend => continue,
            RetryDecision::Abandon(reason) => return SendOutcome::Abandoned { attempts, reason },
        }
    }
}
