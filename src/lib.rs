#![cfg_attr(not(feature = "std"), no_std)]
#![allow(async_fn_in_trait)] // We control the usage of these traits

#[cfg(all(feature = "std", feature = "embedded"))]
compile_error!("Features `std` and `embedded` are mutually exclusive");

pub mod button;
pub mod end_device;
pub mod indicators;
pub mod network_stacks;
pub mod retry_policy;
pub mod status;
pub mod time;
pub mod transmit;

pub use button::{Button, ButtonMailbox};
pub use end_device::{EndDevice, State};
pub use indicators::{Indicator, IndicatorPanel, Indicators};
pub use network_stacks::{LinkId, LoopbackNetwork, NetworkStack, TxOptions};
pub use retry_policy::RetryPolicy;
pub use status::{NetworkStatus, describe_status};
pub use time::{TickCounter, TimeSource, delay_ms, drive_ticks, tick_task};
pub use transmit::{SendFailure, SendOutcome};

#[cfg(feature = "std")]
pub use network_stacks::NetworkSimulator;
#[cfg(feature = "std")]
pub use time::SimulatedClock;

// Reference board configuration: the timer fires every 100 ms
pub const TICKS_PER_SECOND: u32 = 10;

/// Transmissions without ack before the retry policy is consulted
pub const MISSES_IN_A_ROW: u8 = 2;

/// Backoff between join or link attempts
pub const RETRY_DELAY_MS: u32 = 1000;

/// Time each LED stays lit alone during the power-on sequence
pub const POWER_ON_STEP_MS: u32 = 1000;

/// Tunables of the end device
///
/// `const fn new` yields the reference configuration so it can live in a
/// `static` on targets without an allocator.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "std", derive(Debug, PartialEq))]
pub struct EndDeviceConfiguration {
    /// Delay in milliseconds between failed join or link attempts
    pub retry_delay_ms: u32,
    /// Delay in milliseconds between LED steps of the power-on sequence
    pub power_on_step_ms: u32,
    /// Attempts per send cycle before the retry policy decides
    pub misses_in_a_row: u8,
    pub retry_policy: RetryPolicy,
}

impl Default for EndDeviceConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl EndDeviceConfiguration {
    pub const fn new() -> Self {
        EndDeviceConfiguration {
            retry_delay_ms: RETRY_DELAY_MS,
            power_on_step_ms: POWER_ON_STEP_MS,
            misses_in_a_row: MISSES_IN_A_ROW,
            retry_policy: RetryPolicy::build_default(),
        }
    }

    pub const fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }
}

/// State shared between interrupt handlers and the main flow
///
/// The timer interrupt writes `ticks`, the input collaborator writes
/// `buttons`; the end device only reads (and clears the mailbox). Meant to be
/// a `static`:
///
/// ```rust
/// use hub_end_device::{Button, DeviceContext, TICKS_PER_SECOND};
///
/// static CONTEXT: DeviceContext = DeviceContext::new(TICKS_PER_SECOND);
///
/// // timer interrupt
/// CONTEXT.ticks.record_tick();
/// // button interrupt
/// CONTEXT.buttons.press(Button::A);
/// ```
pub struct DeviceContext {
    pub ticks: TickCounter,
    pub buttons: ButtonMailbox,
}

impl DeviceContext {
    pub const fn new(ticks_per_second: u32) -> Self {
        DeviceContext {
            ticks: TickCounter::new(ticks_per_second),
            buttons: ButtonMailbox::new(),
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn reference_configuration() {
        let config = EndDeviceConfiguration::default();
        assert_eq!(config.retry_delay_ms, 1000);
        assert_eq!(config.power_on_step_ms, 1000);
        assert_eq!(config.misses_in_a_row, 2);
        assert_eq!(config.retry_policy, RetryPolicy::build_default());
    }

    #[test]
    fn with_retry_policy_overrides_only_the_policy() {
        let config = EndDeviceConfiguration::new().with_retry_policy(RetryPolicy::FrequencyAgility);
        assert_eq!(config.retry_policy, RetryPolicy::FrequencyAgility);
        assert_eq!(config.misses_in_a_row, MISSES_IN_A_ROW);
    }

    #[test]
    fn context_starts_at_zero_with_empty_mailbox() {
        let context = DeviceContext::new(TICKS_PER_SECOND);
        assert_eq!(context.ticks.now(), 0);
        assert_eq!(context.ticks.ticks_per_second(), 10);
        assert!(!context.buttons.is_pending());
    }
}
