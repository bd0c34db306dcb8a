//! What to do once every attempt of a send cycle went unacknowledged.
//!
//! Two policies exist. With frequency agility the device assumes it has lost
//! the access point's channel: it probes the peer, which makes the stack scan
//! for the right channel, and resends if the probe gets through. On a fixed
//! channel there is nothing to search for and the message is dropped.

use crate::network_stacks::{LinkId, NetworkStack};
use crate::transmit::SendFailure;
use log::{Level, log};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RetryPolicy {
    /// Probe the peer (channel rescan) and resend on success
    FrequencyAgility,
    /// Abandon the message as soon as the attempt bound is exhausted
    FixedChannel,
}

/// Decision taken after a fully unacknowledged send cycle
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum RetryDecision {
    Resend,
    Abandon(SendFailure),
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::build_default()
    }
}

impl RetryPolicy {
    /// Policy selected by the `frequency-agility` feature
    pub const fn build_default() -> Self {
        if cfg!(feature = "frequency-agility") {
            RetryPolicy::FrequencyAgility
        } else {
            RetryPolicy::FixedChannel
        }
    }

    pub(crate) async fn after_missed_acks<N: NetworkStack>(self, network: &mut N, link: LinkId) -> RetryDecision {
        match self {
            RetryPolicy::FixedChannel => RetryDecision::Abandon(SendFailure::Unacknowledged),
            RetryPolicy::FrequencyAgility => match network.ping(link).await {
                Ok(()) => {
                    log!(Level::Debug, "Probe answered after missed acks, resending");
                    RetryDecision::Resend
                }
                Err(status) => {
                    log!(Level::Debug, "Probe failed: {}", status.describe());
                    RetryDecision::Abandon(SendFailure::ProbeFailed(status))
                }
            },
        }
    }
}
