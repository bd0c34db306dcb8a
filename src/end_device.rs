//! # End Device - Link & Transmit State Machine
//!
//! Drives the device from power-up to the button loop:
//!
//! ```text
//! Joining ──ok──> Linking ──ok──> Idle (radio asleep) ──button──> Sending (radio awake)
//!   ^  │            ^  │            ^                                 │
//!   └──┘ fail       └──┘ fail       └─────────────────────────────────┘
//!   1 s backoff     1 s backoff
//! ```
//!
//! Join and link are retried forever: the device has no way to report
//! failure to anyone, so it keeps trying and blinks to show it is alive.
//! Each button press is one acknowledged send (see [`crate::transmit`]).
//!
//! [`EndDevice::step`] performs exactly one transition, which is what tests
//! drive. [`EndDevice::run`] plays the power-on sequence and steps forever.

use embassy_futures::yield_now;
use log::{Level, log};

use crate::button::{Button, ButtonMailbox};
use crate::indicators::{Indicator, Indicators};
use crate::network_stacks::{LinkId, NetworkStack};
use crate::time::{TickCounter, TimeSource, delay_ms};
use crate::transmit::{SendOutcome, build_message, send_acknowledged};
use crate::{DeviceContext, EndDeviceConfiguration};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum State {
    /// Initializing the stack and joining the network
    Joining,
    /// Joined, linking to the access point
    Linking,
    /// Linked, radio asleep, waiting for a button
    Idle(LinkId),
    /// A button press is being forwarded
    Sending(LinkId, Button),
}

pub struct EndDevice<'a, N, T, I>
where
    N: NetworkStack,
    T: TimeSource,
    I: Indicators,
{
    network: N,
    clock: &'a T,
    buttons: &'a ButtonMailbox,
    indicators: I,
    config: EndDeviceConfiguration,
    state: State,
    transaction_id: u8,
    sends: u32,
    last_send: Option<SendOutcome>,
}

impl<'a, N, I> EndDevice<'a, N, TickCounter, I>
where
    N: NetworkStack,
    I: Indicators,
{
    /// Builds a device on the interrupt-driven tick counter and mailbox of `context`
    pub fn with_context(network: N, indicators: I, context: &'a DeviceContext, config: EndDeviceConfiguration) -> Self {
        Self::new(network, &context.ticks, &context.buttons, indicators, config)
    }
}

impl<'a, N, T, I> EndDevice<'a, N, T, I>
where
    N: NetworkStack,
    T: TimeSource,
    I: Indicators,
{
    pub fn new(network: N, clock: &'a T, buttons: &'a ButtonMailbox, indicators: I, config: EndDeviceConfiguration) -> Self {
        EndDevice {
            network,
            clock,
            buttons,
            indicators,
            config,
            state: State::Joining,
            transaction_id: 0,
            sends: 0,
            last_send: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Link handle, once linked
    pub fn link(&self) -> Option<LinkId> {
        match self.state {
            State::Idle(link) | State::Sending(link, _) => Some(link),
            State::Joining | State::Linking => None,
        }
    }

    /// Transaction id carried by the most recent message
    pub fn transaction_id(&self) -> u8 {
        self.transaction_id
    }

    /// Number of messages initiated so far
    pub fn sends(&self) -> u32 {
        self.sends
    }

    pub fn last_send(&self) -> Option<SendOutcome> {
        self.last_send
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut N {
        &mut self.network
    }

    pub fn indicators(&self) -> &I {
        &self.indicators
    }

    /// Lights the three board LEDs one after another, then clears them all
    ///
    /// The display indicators are left alone.
    pub async fn power_on_sequence(&mut self) {
        for led in Indicator::BOARD_LEDS {
            self.indicators.set(led, true);
            delay_ms(self.clock, self.config.power_on_step_ms).await;
        }
        for led in Indicator::BOARD_LEDS {
            self.indicators.set(led, false);
        }
    }

    /// Performs one state transition and returns the new state
    pub async fn step(&mut self) -> State {
        let current = self.state;
        self.state = match current {
            State::Joining => self.join().await,
            State::Linking => self.link_to_access_point().await,
            State::Idle(link) => match self.buttons.take() {
                Some(button) => {
                    log!(Level::Debug, "Button {:?} pressed", button);
                    State::Sending(link, button)
                }
                None => State::Idle(link),
            },
            State::Sending(link, button) => {
                self.forward_press(link, button).await;
                State::Idle(link)
            }
        };
        self.state
    }

    /// Power-on sequence, then steps forever
    pub async fn run(mut self) -> ! {
        log!(Level::Info, "End device starting");
        self.power_on_sequence().await;
        loop {
            let before = self.state;
            if self.step().await == before {
                yield_now().await;
            }
        }
    }

    async fn join(&mut self) -> State {
        match self.network.init().await {
            Ok(()) => {
                log!(Level::Info, "Joined network");
                self.indicators.set(Indicator::BoardLed3, true);
                self.indicators.set(Indicator::Display1, true);
                self.indicators.set(Indicator::Display2, true);
                State::Linking
            }
            Err(status) => {
                log!(Level::Debug, "Join failed: {}", status.describe());
                self.indicators.toggle(Indicator::BoardLed1);
                delay_ms(self.clock, self.config.retry_delay_ms).await;
                State::Joining
            }
        }
    }

    async fn link_to_access_point(&mut self) -> State {
        match self.network.link().await {
            Ok(link) => {
                log!(Level::Info, "Linked to access point, link id {}", link.0);
                self.indicators.set(Indicator::Display1, false);
                self.indicators.set(Indicator::Display2, false);
                self.network.radio_sleep();
                State::Idle(link)
            }
            Err(status) => {
                log!(Level::Debug, "Link failed: {}", status.describe());
                self.indicators.toggle(Indicator::Display1);
                self.indicators.toggle(Indicator::Display2);
                delay_ms(self.clock, self.config.retry_delay_ms).await;
                State::Linking
            }
        }
    }

    async fn forward_press(&mut self, link: LinkId, button: Button) {
        self.network.radio_wake();

        self.transaction_id = self.transaction_id.wrapping_add(1);
        self.sends = self.sends.wrapping_add(1);
        let message = build_message(button.target_indicator(), self.transaction_id);

        let outcome = send_acknowledged(
            &mut self.network,
            &mut self.indicators,
            link,
            &message,
            self.config.misses_in_a_row,
            self.config.retry_policy,
        )
        .await;
        match outcome {
            SendOutcome::Acked { attempts } => {
                log!(Level::Debug, "Message {} acked after {} attempts", self.transaction_id, attempts);
            }
            SendOutcome::Abandoned { attempts, reason } => {
                log!(
                    Level::Warn,
                    "Message {} dropped after {} attempts: {:?}",
                    self.transaction_id,
                    attempts,
                    reason
                );
            }
        }
        self.last_send = Some(outcome);

        self.network.radio_sleep();
    }
}
