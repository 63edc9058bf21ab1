//! Debounced button input with press/release edges, hold detection,
//! and double-press recognition.
//!
//! Event flags are edge-triggered and cleared when read, so one
//! physical event can only ever be acted on once. Hold and
//! double-press cannot both fire from the same press: a hold needs
//! continuous contact past the threshold, a double-press needs a
//! release and re-press inside the (shorter) double-click window.

use log::{debug, info};

use crate::config::*;

#[derive(Debug, Clone)]
pub struct ButtonState {
    debounced: bool,

    pressed: bool,
    released: bool,
    double_click: bool,
    hold_event: bool,
    held: bool,

    last_change_ms: u32,
    last_press_ms: u32,
    prev_press_ms: u32,
    last_release_ms: u32,
    press_count: u32,
    hold_duration_ms: u32,
}

impl Default for ButtonState {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ButtonState {
    pub fn new(now_ms: u32) -> Self {
        Self {
            debounced: false,
            pressed: false,
            released: false,
            double_click: false,
            hold_event: false,
            held: false,
            last_change_ms: now_ms,
            last_press_ms: 0,
            prev_press_ms: 0,
            last_release_ms: 0,
            press_count: 0,
            hold_duration_ms: 0,
        }
    }

    /// Advance the state machine one tick with a fresh raw sample.
    pub fn update(&mut self, raw: bool, now_ms: u32) {
        if raw != self.debounced {
            // Raw level disagrees with the debounced level; accept the
            // transition once it has been stable for the full window.
            if now_ms.wrapping_sub(self.last_change_ms) >= BUTTON_DEBOUNCE_MS {
                self.debounced = raw;
                self.last_change_ms = now_ms;

                if self.debounced {
                    self.on_press(now_ms);
                } else {
                    self.on_release(now_ms);
                }
            }
        } else {
            // Levels agree; any bounce-in-progress is abandoned.
            self.last_change_ms = now_ms;
        }

        if self.debounced {
            self.hold_duration_ms = now_ms.wrapping_sub(self.last_press_ms);
            if self.hold_duration_ms >= BUTTON_HOLD_THRESHOLD_MS && !self.held {
                self.held = true;
                self.hold_event = true;
                info!("button held ({} ms)", self.hold_duration_ms);
            }
        } else {
            self.hold_duration_ms = 0;
            self.held = false;
        }
    }

    fn on_press(&mut self, now_ms: u32) {
        self.pressed = true;

        let since_last = now_ms.wrapping_sub(self.last_press_ms);
        if self.press_count > 0
            && since_last > BUTTON_DEBOUNCE_MS
            && since_last <= BUTTON_DOUBLE_CLICK_MS
        {
            self.double_click = true;
            info!("button double-pressed ({} ms between presses)", since_last);
        }

        self.prev_press_ms = self.last_press_ms;
        self.last_press_ms = now_ms;
        self.press_count = self.press_count.wrapping_add(1);
        self.hold_duration_ms = 0;
        debug!("button pressed (count: {})", self.press_count);
    }

    fn on_release(&mut self, now_ms: u32) {
        self.released = true;
        self.last_release_ms = now_ms;
        self.held = false;
        self.hold_duration_ms = 0;
        debug!(
            "button released after {} ms",
            now_ms.wrapping_sub(self.last_press_ms)
        );
    }

    /// Press edge since the last call. Reading clears the flag.
    pub fn take_pressed(&mut self) -> bool {
        core::mem::take(&mut self.pressed)
    }

    /// Release edge since the last call. Reading clears the flag.
    pub fn take_released(&mut self) -> bool {
        core::mem::take(&mut self.released)
    }

    /// Double-press event since the last call. Reading clears the flag.
    pub fn take_double_click(&mut self) -> bool {
        core::mem::take(&mut self.double_click)
    }

    /// Hold-threshold crossing since the last call; fires at most once
    /// per physical press. Reading clears the flag.
    pub fn take_hold(&mut self) -> bool {
        core::mem::take(&mut self.hold_event)
    }

    /// Level view of the hold state (stays true while held).
    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn is_down(&self) -> bool {
        self.debounced
    }

    pub fn hold_duration_ms(&self) -> u32 {
        self.hold_duration_ms
    }

    pub fn press_count(&self) -> u32 {
        self.press_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Step the machine in 1 ms ticks with a constant raw level.
    fn run(button: &mut ButtonState, raw: bool, from_ms: u32, to_ms: u32) {
        for t in from_ms..=to_ms {
            button.update(raw, t);
        }
    }

    #[test]
    fn glitch_shorter_than_debounce_is_ignored() {
        let mut button = ButtonState::new(0);
        run(&mut button, false, 0, 10);
        run(&mut button, true, 11, 11 + BUTTON_DEBOUNCE_MS - 2);
        run(&mut button, false, 10 + BUTTON_DEBOUNCE_MS, 200);
        assert!(!button.take_pressed());
        assert_eq!(button.press_count(), 0);
    }

    #[test]
    fn stable_press_is_accepted_after_window() {
        let mut button = ButtonState::new(0);
        run(&mut button, true, 0, BUTTON_DEBOUNCE_MS + 1);
        assert!(button.is_down());
        assert!(button.take_pressed());
        // Read clears the flag.
        assert!(!button.take_pressed());
        assert_eq!(button.press_count(), 1);
    }

    #[test]
    fn short_press_never_sets_held() {
        let mut button = ButtonState::new(0);
        run(&mut button, true, 0, BUTTON_DEBOUNCE_MS + 500);
        run(&mut button, false, BUTTON_DEBOUNCE_MS + 501, 3000);
        assert!(!button.take_hold());
        assert!(!button.is_held());
    }

    #[test]
    fn hold_fires_exactly_once_per_press() {
        let mut button = ButtonState::new(0);
        // Press accepted at t = debounce; held from press + threshold.
        run(&mut button, true, 0, BUTTON_DEBOUNCE_MS + BUTTON_HOLD_THRESHOLD_MS + 500);
        assert!(button.is_held());
        assert!(button.take_hold());
        // Continued holding never re-fires the edge.
        run(
            &mut button,
            true,
            BUTTON_DEBOUNCE_MS + BUTTON_HOLD_THRESHOLD_MS + 501,
            BUTTON_DEBOUNCE_MS + 3 * BUTTON_HOLD_THRESHOLD_MS,
        );
        assert!(!button.take_hold());
        assert!(button.is_held());
        assert!(button.hold_duration_ms() >= BUTTON_HOLD_THRESHOLD_MS);
    }

    #[test]
    fn release_clears_hold_state() {
        let mut button = ButtonState::new(0);
        run(&mut button, true, 0, BUTTON_DEBOUNCE_MS + BUTTON_HOLD_THRESHOLD_MS);
        assert!(button.is_held());
        run(
            &mut button,
            false,
            BUTTON_DEBOUNCE_MS + BUTTON_HOLD_THRESHOLD_MS + 1,
            BUTTON_DEBOUNCE_MS + BUTTON_HOLD_THRESHOLD_MS + 1 + BUTTON_DEBOUNCE_MS,
        );
        assert!(button.take_released());
        assert!(!button.is_held());
        assert_eq!(button.hold_duration_ms(), 0);
    }

    // The fastest sequence the debouncer can accept is press, release
    // one window later, re-press another window after that, so the
    // sparse updates below are timed at those accept points.

    #[test]
    fn quick_second_press_is_a_double_click() {
        let mut button = ButtonState::new(0);
        button.update(true, 100); // press #1 accepted
        assert!(button.take_pressed());
        assert!(!button.take_double_click());

        button.update(false, 100 + BUTTON_DEBOUNCE_MS + 1); // release accepted
        button.update(true, 201); // press #2, 101 ms after press #1
        assert!(button.take_pressed());
        assert!(button.take_double_click());
        // Read clears the flag.
        assert!(!button.take_double_click());
    }

    #[test]
    fn double_click_window_is_inclusive() {
        let mut button = ButtonState::new(0);
        button.update(true, 100);
        button.update(false, 151);
        button.update(true, 100 + BUTTON_DOUBLE_CLICK_MS);
        assert!(button.take_double_click());
    }

    #[test]
    fn presses_beyond_window_are_not_a_double_click() {
        let mut button = ButtonState::new(0);
        button.update(true, 100);
        button.take_pressed();
        button.update(false, 151);
        button.update(true, 100 + BUTTON_DOUBLE_CLICK_MS + 1);
        assert!(button.take_pressed());
        assert!(!button.take_double_click());
    }

    #[test]
    fn double_click_and_hold_need_separate_presses() {
        let mut button = ButtonState::new(0);
        // Click, then a second press that turns into a hold.
        button.update(true, 100);
        button.take_pressed();
        button.update(false, 151);
        button.update(true, 251); // gap 151 ms -> double-click
        run(&mut button, true, 252, 251 + BUTTON_HOLD_THRESHOLD_MS);

        // The re-press registers the double-click; the hold only fires
        // because contact then continued past the threshold. The first
        // press could not have produced both: it was released before
        // the threshold.
        assert!(button.take_double_click());
        assert!(button.take_hold());
        assert_eq!(button.press_count(), 2);
    }
}
