//! # Loopback Network - Always-Acknowledging Stand-in
//!
//! The simplest possible stack: init and link succeed on the first call and
//! every send is acknowledged. No radio traffic happens. Useful for smoke
//! testing the end device flow on a board without an access point, or on a
//! host without any simulation set-up.

use super::{LinkId, NetworkStack, TxOptions};
use crate::NetworkStatus;
use log::{Level, log};

#[cfg_attr(feature = "std", derive(Debug))]
pub struct LoopbackNetwork {
    link_id: LinkId,
    radio_awake: bool,
    frames_sent: u32,
}

impl Default for LoopbackNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackNetwork {
    pub const fn new() -> Self {
        LoopbackNetwork {
            link_id: LinkId(1),
            radio_awake: true,
            frames_sent: 0,
        }
    }

    pub fn radio_awake(&self) -> bool {
        self.radio_awake
    }

    pub fn frames_sent(&self) -> u32 {
        self.frames_sent
    }
}

impl NetworkStack for LoopbackNetwork {
    async fn init(&mut self) -> Result<(), NetworkStatus> {
        Ok(())
    }

    async fn link(&mut self) -> Result<LinkId, NetworkStatus> {
        Ok(self.link_id)
    }

    async fn send(&mut self, link: LinkId, payload: &[u8], _options: TxOptions) -> Result<(), NetworkStatus> {
        if link != self.link_id {
            return Err(NetworkStatus::NoLink);
        }
        if payload.is_empty() {
            return Err(NetworkStatus::NoPayload);
        }
        self.frames_sent = self.frames_sent.wrapping_add(1);
        log::trace!("Loopback frame {:?} on link {}", payload, link.0);
        Ok(())
    }

    async fn ping(&mut self, link: LinkId) -> Result<(), NetworkStatus> {
        if link == self.link_id { Ok(()) } else { Err(NetworkStatus::NoLink) }
    }

    fn radio_sleep(&mut self) {
        log!(Level::Trace, "Loopback radio asleep");
        self.radio_awake = false;
    }

    fn radio_wake(&mut self) {
        log!(Level::Trace, "Loopback radio awake");
        self.radio_awake = true;
    }
}
