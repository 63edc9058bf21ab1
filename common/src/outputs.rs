//! Output decision logic: combines the vehicle state and button
//! events into the light, latch, and indicator targets.
//!
//! Recomputed every tick; the controller applies a level to the pins
//! only when it differs from the previous tick. When in doubt every
//! output resolves to inactive.

use log::info;

use crate::config::LATCH_PULSE_MS;
use crate::vehicle::VehicleState;

#[derive(Debug, Default, Clone)]
pub struct OutputState {
    pub light_active: bool,
    pub latch_active: bool,
    pub parked_led: bool,
    pub unlocked_led: bool,

    prev_light: bool,
    prev_latch: bool,
    prev_parked_led: bool,
    prev_unlocked_led: bool,

    latch_started_ms: u32,
}

impl OutputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute all output targets.
    ///
    /// `latch_request` is the button's hold edge for this tick; it is
    /// an edge, so continued holding cannot retrigger the pulse.
    pub fn update(&mut self, vehicle: &VehicleState, latch_request: bool, now_ms: u32) {
        self.prev_light = self.light_active;
        self.prev_latch = self.latch_active;
        self.prev_parked_led = self.parked_led;
        self.prev_unlocked_led = self.unlocked_led;

        self.light_active = if vehicle.light_override_active() {
            vehicle.light_override_level()
        } else {
            vehicle.light_auto_target()
        };

        if latch_request {
            if vehicle.latch_permitted() && !self.latch_active {
                self.latch_active = true;
                self.latch_started_ms = now_ms;
                info!("latch release activated for {} ms", LATCH_PULSE_MS);
            } else if !vehicle.latch_permitted() {
                info!("latch release requested but interlock not met");
            }
        }

        // Self-cancelling pulse; wrapping subtraction keeps this
        // correct across a tick counter rollover.
        if self.latch_active && now_ms.wrapping_sub(self.latch_started_ms) >= LATCH_PULSE_MS {
            self.latch_active = false;
            info!("latch release deactivated");
        }

        self.parked_led = vehicle.system_ready() && vehicle.parked();
        self.unlocked_led = vehicle.system_ready() && vehicle.unlocked();
    }

    pub fn light_changed(&self) -> bool {
        self.light_active != self.prev_light
    }

    pub fn latch_changed(&self) -> bool {
        self.latch_active != self.prev_latch
    }

    pub fn parked_led_changed(&self) -> bool {
        self.parked_led != self.prev_parked_led
    }

    pub fn unlocked_led_changed(&self) -> bool {
        self.unlocked_led != self.prev_unlocked_led
    }
}
