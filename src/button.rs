//! # Button Mailbox
//!
//! Single-slot, last-write-wins mailbox between the input collaborator and the
//! state machine. The producer (button interrupt or poller) overwrites the
//! slot; the main flow reads and clears it once per idle iteration. There is
//! no queue: two presses before a take collapse into the later one.
//!
//! The slot is an embassy `Signal` behind a critical-section mutex, so the
//! read and the clear happen in one critical section and a press can no
//! longer slip in between them.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Which of the two local buttons was pressed
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Button {
    A,
    B,
}

impl Button {
    /// Indicator number the access point should toggle for this button
    pub const fn target_indicator(self) -> u8 {
        match self {
            Button::A => 1,
            Button::B => 2,
        }
    }
}

pub struct ButtonMailbox {
    slot: Signal<CriticalSectionRawMutex, Button>,
}

impl Default for ButtonMailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonMailbox {
    pub const fn new() -> Self {
        ButtonMailbox { slot: Signal::new() }
    }

    /// Records a press, replacing any press not yet taken
    pub fn press(&self, button: Button) {
        self.slot.signal(button);
    }

    /// Reads and clears the slot
    pub fn take(&self) -> Option<Button> {
        self.slot.try_take()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.signaled()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn empty_mailbox_yields_nothing() {
        let mailbox = ButtonMailbox::new();
        assert_eq!(mailbox.take(), None);
        assert!(!mailbox.is_pending());
    }

    #[test]
    fn take_clears_the_slot() {
        let mailbox = ButtonMailbox::new();
        mailbox.press(Button::B);
        assert!(mailbox.is_pending());
        assert_eq!(mailbox.take(), Some(Button::B));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn later_press_overwrites_earlier_one() {
        let mailbox = ButtonMailbox::new();
        mailbox.press(Button::A);
        mailbox.press(Button::B);
        assert_eq!(mailbox.take(), Some(Button::B));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn buttons_map_to_peer_indicators() {
        assert_eq!(Button::A.target_indicator(), 1);
        assert_eq!(Button::B.target_indicator(), 2);
    }
}
