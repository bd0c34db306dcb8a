//! Network stack interface and bundled implementations
//!
//! The wireless stack (join, link, addressing, retransmission, channel
//! management) is an external collaborator. The end device reaches it only
//! through [`NetworkStack`]. This module also carries two stand-ins:
//!
//! - `loopback`: joins, links and acknowledges everything immediately
//! - `simulator` (std): scripted responses, call accounting and an optional
//!   random ack-loss model, for tests and the host demo

pub mod loopback;

#[cfg(feature = "std")]
pub mod simulator;

pub use loopback::LoopbackNetwork;

#[cfg(feature = "std")]
pub use simulator::{NetworkSimulator, SentFrame, SimulatorStats};

use crate::NetworkStatus;

/// Opaque handle of an established link to the access point
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LinkId(pub u8);

/// Per-send transmit options
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TxOptions {
    /// Ask the receiver to acknowledge the frame
    pub ack_request: bool,
}

impl TxOptions {
    pub const ACK_REQUEST: TxOptions = TxOptions { ack_request: true };
    pub const NONE: TxOptions = TxOptions { ack_request: false };
}

/// Fixed API surface of the wireless stack
///
/// Failures are reported as `Err(status)` and are never fatal to the caller;
/// `Err(NetworkStatus::Success)` is not a valid return.
///
/// # Examples
/// ```rust,ignore
/// use hub_end_device::{LinkId, NetworkStack, NetworkStatus, TxOptions};
///
/// async fn notify<N: NetworkStack>(stack: &mut N, link: LinkId) -> bool {
///     match stack.send(link, &[1, 7], TxOptions::ACK_REQUEST).await {
///         Ok(()) => true,
///         Err(NetworkStatus::NoAck) => false,
///         Err(_) => false,
///     }
/// }
/// ```
pub trait NetworkStack {
    /// Initializes the stack and joins the network; call until it succeeds
    async fn init(&mut self) -> Result<(), NetworkStatus>;

    /// Links to the access point; call until it succeeds
    async fn link(&mut self) -> Result<LinkId, NetworkStatus>;

    /// Sends `payload` over `link`; `NoAck` means sent but not acknowledged
    async fn send(&mut self, link: LinkId, payload: &[u8], options: TxOptions) -> Result<(), NetworkStatus>;

    /// Liveness probe of the peer; with frequency agility a missing reply
    /// makes the stack rescan channels
    async fn ping(&mut self, link: LinkId) -> Result<(), NetworkStatus>;

    fn radio_sleep(&mut self);

    fn radio_wake(&mut self);
}

impl<N: NetworkStack> NetworkStack for &mut N {
    async fn init(&mut self) -> Result<(), NetworkStatus> {
        (**self).init().await
    }

    async fn link(&mut self) -> Result<LinkId, NetworkStatus> {
        (**self).link().await
    }

    async fn send(&mut self, link: LinkId, payload: &[u8], options: TxOptions) -> Result<(), NetworkStatus> {
        (**self).send(link, payload, options).await
    }

    async fn ping(&mut self, link: LinkId) -> Result<(), NetworkStatus> {
        (**self).ping(link).await
    }

    fn radio_sleep(&mut self) {
        (**self).radio_sleep()
    }

    fn radio_wake(&mut self) {
        (**self).radio_wake()
    }
}
