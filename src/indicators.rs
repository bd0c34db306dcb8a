//! # Indicators
//!
//! Visual feedback of the end device, in two separate groups:
//!
//! - two display indicators mirroring the access point's LEDs, each with an
//!   (off, on) colour pair,
//! - three board LEDs used for the power-on sequence and the join blink;
//!   board LED 3 marks that the device has joined the network.
//!
//! Rendering is the board's concern: the state machine only calls
//! [`Indicators::set`] and [`Indicators::toggle`].

/// Indicator 1 colour when off
pub const DARK_GREEN: u32 = 0x0000_2000;
/// Indicator 2 colour when off
pub const DARK_RED: u32 = 0x0020_0000;
/// Indicator 1 colour when on
pub const BRIGHT_GREEN: u32 = 0x0000_FF00;
/// Indicator 2 colour when on
pub const BRIGHT_RED: u32 = 0x00FF_0000;

// [indicator][off, on]
const DISPLAY_COLORS: [[u32; 2]; 2] = [[DARK_GREEN, BRIGHT_GREEN], [DARK_RED, BRIGHT_RED]];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Indicator {
    /// Display indicator 1 (green)
    Display1,
    /// Display indicator 2 (red)
    Display2,
    BoardLed1,
    BoardLed2,
    /// Board status LED, lit once joined
    BoardLed3,
}

const INDICATOR_COUNT: usize = 5;

impl Indicator {
    /// Board LEDs in power-on order
    pub const BOARD_LEDS: [Indicator; 3] = [Indicator::BoardLed1, Indicator::BoardLed2, Indicator::BoardLed3];

    const fn index(self) -> usize {
        match self {
            Indicator::Display1 => 0,
            Indicator::Display2 => 1,
            Indicator::BoardLed1 => 2,
            Indicator::BoardLed2 => 3,
            Indicator::BoardLed3 => 4,
        }
    }
}

/// Indicator primitives offered by the board
pub trait Indicators {
    fn set(&mut self, indicator: Indicator, on: bool);

    fn toggle(&mut self, indicator: Indicator);
}

impl<T: Indicators> Indicators for &mut T {
    fn set(&mut self, indicator: Indicator, on: bool) {
        (**self).set(indicator, on)
    }

    fn toggle(&mut self, indicator: Indicator) {
        (**self).toggle(indicator)
    }
}

/// In-memory indicator state
///
/// Keeps the on/off state of every indicator and how often each was toggled,
/// which is all a display collaborator (or a test) needs to render it.
#[derive(Default, Clone, Debug)]
pub struct IndicatorPanel {
    states: [bool; INDICATOR_COUNT],
    toggles: [u32; INDICATOR_COUNT],
}

impl IndicatorPanel {
    pub const fn new() -> Self {
        IndicatorPanel {
            states: [false; INDICATOR_COUNT],
            toggles: [0; INDICATOR_COUNT],
        }
    }

    pub fn is_on(&self, indicator: Indicator) -> bool {
        self.states[indicator.index()]
    }

    pub fn toggle_count(&self, indicator: Indicator) -> u32 {
        self.toggles[indicator.index()]
    }

    /// Current colour of a display indicator; board LEDs have none
    pub fn color(&self, indicator: Indicator) -> Option<u32> {
        match indicator {
            Indicator::Display1 | Indicator::Display2 => {
                let index = indicator.index();
                Some(DISPLAY_COLORS[index][self.states[index] as usize])
            }
            Indicator::BoardLed1 | Indicator::BoardLed2 | Indicator::BoardLed3 => None,
        }
    }
}

impl Indicators for IndicatorPanel {
    fn set(&mut self, indicator: Indicator, on: bool) {
        self.states[indicator.index()] = on;
    }

    fn toggle(&mut self, indicator: Indicator) {
        let index = indicator.index();
        self.states[index] = !self.states[index];
        self.toggles[index] = self.toggles[index].wrapping_add(1);
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn display_colors_follow_state() {
        let mut panel = IndicatorPanel::new();
        assert_eq!(panel.color(Indicator::Display1), Some(DARK_GREEN));
        assert_eq!(panel.color(Indicator::Display2), Some(DARK_RED));
        for led in Indicator::BOARD_LEDS {
            assert_eq!(panel.color(led), None);
        }

        panel.set(Indicator::Display1, true);
        panel.toggle(Indicator::Display2);
        assert_eq!(panel.color(Indicator::Display1), Some(BRIGHT_GREEN));
        assert_eq!(panel.color(Indicator::Display2), Some(BRIGHT_RED));
    }

    #[test]
    fn toggle_flips_and_counts() {
        let mut panel = IndicatorPanel::new();
        panel.toggle(Indicator::BoardLed3);
        panel.toggle(Indicator::BoardLed3);
        panel.toggle(Indicator::BoardLed3);
        assert!(panel.is_on(Indicator::BoardLed3));
        assert_eq!(panel.toggle_count(Indicator::BoardLed3), 3);
        assert_eq!(panel.toggle_count(Indicator::Display1), 0);
    }

    #[test]
    fn board_leds_leave_display_colours_alone() {
        let mut panel = IndicatorPanel::new();
        for led in Indicator::BOARD_LEDS {
            panel.set(led, true);
            panel.toggle(led);
            panel.toggle(led);
        }
        assert_eq!(panel.color(Indicator::Display1), Some(DARK_GREEN));
        assert_eq!(panel.color(Indicator::Display2), Some(DARK_RED));
        assert!(!panel.is_on(Indicator::Display1));
        assert_eq!(panel.toggle_count(Indicator::Display1), 0);
    }
}
