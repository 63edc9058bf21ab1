//! The control loop: drains inbound frames, advances the button state
//! machine, recomputes the output decisions, and applies changed
//! levels exactly once.

use log::{debug, warn};

use crate::button::ButtonState;
use crate::config::*;
use crate::frame::{self, CanFrame};
use crate::hal::Hal;
use crate::outputs::OutputState;
use crate::vehicle::VehicleState;

pub struct Controller {
    vehicle: VehicleState,
    button: ButtonState,
    outputs: OutputState,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self {
            vehicle: VehicleState::new(),
            button: ButtonState::default(),
            outputs: OutputState::new(),
        }
    }

    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    pub fn button(&self) -> &ButtonState {
        &self.button
    }

    pub fn outputs(&self) -> &OutputState {
        &self.outputs
    }

    /// Runs a single iteration of the main loop.
    /// This should be called repeatedly; nothing in here blocks.
    pub fn poll<H: Hal>(&mut self, hal: &mut H) {
        let now_ms = hal.now_ms();

        // 1. Drain pending frames, bounded so a flooded bus cannot
        // starve the button and output logic.
        let mut rx = CanFrame::default();
        let mut drained = 0;
        while drained < MAX_FRAMES_PER_POLL && hal.receive_frame(&mut rx) {
            drained += 1;
            self.dispatch(&rx);
        }
        if drained == MAX_FRAMES_PER_POLL {
            debug!("frame batch limit reached, deferring rest to next poll");
        }

        // 2. Freshness aggregation.
        self.vehicle.recompute_readiness(now_ms);

        // 3. Button input. The double-press is security-gated: it only
        // reaches the override logic while the vehicle is unlocked.
        self.button.update(hal.read_button(), now_ms);
        if self.button.take_pressed() {
            debug!("button press {} registered", self.button.press_count());
        }
        // Drain the release edge; no output consumes it, and leaving
        // it set would let a stale release surface later.
        let _ = self.button.take_released();
        if self.button.take_double_click() {
            if self.vehicle.unlocked() {
                self.vehicle.toggle_light_override();
            } else {
                warn!("double press ignored while vehicle is locked");
            }
        }
        let latch_request = self.button.take_hold();

        // 4. Output decisions, applied to the pins only on change.
        self.outputs.update(&self.vehicle, latch_request, now_ms);
        if self.outputs.light_changed() {
            hal.set_light(self.outputs.light_active);
        }
        if self.outputs.latch_changed() {
            hal.set_latch(self.outputs.latch_active);
        }
        if self.outputs.parked_led_changed() {
            hal.set_parked_led(self.outputs.parked_led);
        }
        if self.outputs.unlocked_led_changed() {
            hal.set_unlocked_led(self.outputs.unlocked_led);
        }
    }

    /// Route one frame to its decoder. Unknown identifiers are ignored
    /// silently; invalid records are discarded by the apply functions.
    fn dispatch(&mut self, rx: &CanFrame) {
        match rx.id {
            LAMP_STATUS_ID => self.vehicle.apply_lamp(&frame::decode_lamp(rx)),
            LOCK_STATUS_ID => self.vehicle.apply_lock(&frame::decode_lock(rx)),
            PARK_STATUS_ID => self.vehicle.apply_park(&frame::decode_park(rx)),
            BATTERY_SOC_ID => self.vehicle.apply_soc(&frame::decode_soc(rx)),
            _ => {}
        }
    }
}
