//! Vehicle state tracking: latest signal values, per-source freshness,
//! and the derived flags the output logic runs on.

use log::{debug, info};

use crate::config::*;
use crate::frame::{LampRecord, LockRecord, ParkRecord, SocRecord};

fn lamp_name(value: u8) -> &'static str {
    match value {
        LAMP_OFF => "OFF",
        LAMP_ON => "ON",
        LAMP_RAMP_UP => "RAMP_UP",
        LAMP_RAMP_DOWN => "RAMP_DOWN",
        _ => "UNKNOWN",
    }
}

fn lock_name(value: u8) -> &'static str {
    match value {
        LOCK_DOUBLE => "LOCK_DBL",
        LOCK_ALL => "LOCK_ALL",
        UNLOCK_ALL => "UNLOCK_ALL",
        UNLOCK_DRIVER => "UNLOCK_DRV",
        _ => "UNKNOWN",
    }
}

fn park_name(value: u8) -> &'static str {
    match value {
        PARK_ENGAGED => "PARK",
        _ => "NOT_PARK",
    }
}

/// Everything known about the vehicle, owned by the control loop.
///
/// Created once at startup with safe defaults: park defaults to
/// engaged (a missing park signal must not block the park-gated latch)
/// while lock defaults to unknown, which counts as locked, so nothing
/// security-gated can happen before the first lock frame.
#[derive(Debug, Clone)]
pub struct VehicleState {
    // Current and previous raw signal values.
    pub lamp_request: u8,
    pub lock_status: u8,
    pub park_status: u8,
    pub battery_soc: u8,
    pub prev_lamp_request: u8,
    pub prev_lock_status: u8,
    pub prev_park_status: u8,
    pub prev_battery_soc: u8,

    // Arrival time of the last valid record per source. `None` until
    // the first frame: a signal never seen is stale by definition.
    last_lamp_ms: Option<u32>,
    last_lock_ms: Option<u32>,
    last_park_ms: Option<u32>,
    last_soc_ms: Option<u32>,

    // Derived flags.
    unlocked: bool,
    parked: bool,
    lamp_requested_on: bool,
    system_ready: bool,

    // Manual light override. Entered by double-press while unlocked,
    // force-cleared the moment the vehicle locks.
    light_override: bool,
    light_override_level: bool,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleState {
    pub fn new() -> Self {
        Self {
            lamp_request: LAMP_OFF,
            lock_status: LOCK_UNKNOWN,
            park_status: PARK_ENGAGED,
            battery_soc: 0,
            prev_lamp_request: LAMP_OFF,
            prev_lock_status: LOCK_UNKNOWN,
            prev_park_status: PARK_ENGAGED,
            prev_battery_soc: 0,
            last_lamp_ms: None,
            last_lock_ms: None,
            last_park_ms: None,
            last_soc_ms: None,
            unlocked: false,
            parked: true,
            lamp_requested_on: false,
            system_ready: false,
            light_override: false,
            light_override_level: false,
        }
    }

    pub fn unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn parked(&self) -> bool {
        self.parked
    }

    pub fn lamp_requested_on(&self) -> bool {
        self.lamp_requested_on
    }

    pub fn system_ready(&self) -> bool {
        self.system_ready
    }

    pub fn light_override_active(&self) -> bool {
        self.light_override
    }

    pub fn light_override_level(&self) -> bool {
        self.light_override_level
    }

    /// What the light would do under automatic control.
    pub fn light_auto_target(&self) -> bool {
        self.lamp_requested_on && self.system_ready
    }

    /// Interlock for the latch release: ready, parked, and unlocked.
    pub fn latch_permitted(&self) -> bool {
        self.system_ready && self.parked && self.unlocked
    }

    /// Store a freshly decoded lamp record and recompute the lamp
    /// request flag. Invalid records are discarded.
    pub fn apply_lamp(&mut self, rec: &LampRecord) {
        if !rec.valid {
            return;
        }
        self.prev_lamp_request = self.lamp_request;
        self.lamp_request = rec.request;
        self.last_lamp_ms = Some(rec.timestamp_ms);

        self.lamp_requested_on =
            self.lamp_request == LAMP_ON || self.lamp_request == LAMP_RAMP_UP;

        if self.prev_lamp_request != self.lamp_request {
            info!(
                "lamp request {} -> {} (light should be {})",
                lamp_name(self.prev_lamp_request),
                lamp_name(self.lamp_request),
                if self.lamp_requested_on { "ON" } else { "OFF" }
            );
            // A fresh off/ramp-down request hands the light back to
            // automatic control.
            if self.light_override
                && (self.lamp_request == LAMP_OFF || self.lamp_request == LAMP_RAMP_DOWN)
            {
                self.clear_light_override();
            }
        }
    }

    /// Store a freshly decoded lock record. Only unlock-all and
    /// unlock-driver count as unlocked; everything else, including
    /// unrecognized values, is locked.
    pub fn apply_lock(&mut self, rec: &LockRecord) {
        if !rec.valid {
            return;
        }
        self.prev_lock_status = self.lock_status;
        self.lock_status = rec.status;
        self.last_lock_ms = Some(rec.timestamp_ms);

        self.unlocked =
            self.lock_status == UNLOCK_ALL || self.lock_status == UNLOCK_DRIVER;

        // Locking the vehicle revokes the manual override in the same
        // tick. Security interlock, not a convenience.
        if !self.unlocked && self.light_override {
            self.clear_light_override();
        }

        if self.prev_lock_status != self.lock_status {
            info!(
                "lock status {} -> {} (unlocked: {})",
                lock_name(self.prev_lock_status),
                lock_name(self.lock_status),
                self.unlocked
            );
        }
    }

    /// Store a freshly decoded park record. Only the exact park value
    /// counts; transitional states are not-park.
    pub fn apply_park(&mut self, rec: &ParkRecord) {
        if !rec.valid {
            return;
        }
        self.prev_park_status = self.park_status;
        self.park_status = rec.status;
        self.last_park_ms = Some(rec.timestamp_ms);

        self.parked = self.park_status == PARK_ENGAGED;

        if self.prev_park_status != self.park_status {
            info!(
                "park status {} -> {} (parked: {})",
                park_name(self.prev_park_status),
                park_name(self.park_status),
                self.parked
            );
        }
    }

    /// Store a freshly decoded state-of-charge record.
    pub fn apply_soc(&mut self, rec: &SocRecord) {
        if !rec.valid {
            return;
        }
        self.prev_battery_soc = self.battery_soc;
        self.battery_soc = rec.percent;
        self.last_soc_ms = Some(rec.timestamp_ms);

        let delta = self.battery_soc.abs_diff(self.prev_battery_soc);
        if delta >= 5 {
            info!(
                "battery SOC {}% -> {}%",
                self.prev_battery_soc, self.battery_soc
            );
        }
    }

    fn fresh(last: Option<u32>, now_ms: u32) -> bool {
        match last {
            Some(ts) => now_ms.wrapping_sub(ts) < READINESS_WINDOW_MS,
            None => false,
        }
    }

    /// Recompute the readiness flag from per-source freshness.
    ///
    /// Deliberately an OR across the four sources: a vehicle that only
    /// transmits one of the monitored frames (low-power states do
    /// this) keeps the system operative. Not-ready means all four have
    /// gone silent past the window.
    pub fn recompute_readiness(&mut self, now_ms: u32) {
        let lamp_fresh = Self::fresh(self.last_lamp_ms, now_ms);
        let lock_fresh = Self::fresh(self.last_lock_ms, now_ms);
        let park_fresh = Self::fresh(self.last_park_ms, now_ms);
        let soc_fresh = Self::fresh(self.last_soc_ms, now_ms);

        let was_ready = self.system_ready;
        self.system_ready = lamp_fresh || lock_fresh || park_fresh || soc_fresh;

        if was_ready != self.system_ready {
            info!(
                "system readiness {} (lamp:{} lock:{} park:{} soc:{})",
                if self.system_ready { "READY" } else { "NOT_READY" },
                lamp_fresh,
                lock_fresh,
                park_fresh,
                soc_fresh
            );
        }
    }

    /// Enter or toggle the manual light override. The first activation
    /// picks the negation of the current automatic target so the press
    /// always has a visible effect; further toggles just invert.
    ///
    /// The caller is responsible for the security gate (unlocked).
    pub fn toggle_light_override(&mut self) {
        if self.light_override {
            self.light_override_level = !self.light_override_level;
            info!(
                "light override toggled: {}",
                if self.light_override_level { "ON" } else { "OFF" }
            );
        } else {
            self.light_override = true;
            self.light_override_level = !self.light_auto_target();
            info!(
                "light override entered: {} (automatic was {})",
                if self.light_override_level { "ON" } else { "OFF" },
                if self.light_auto_target() { "ON" } else { "OFF" }
            );
        }
    }

    /// Return the light to automatic control.
    pub fn clear_light_override(&mut self) {
        if self.light_override {
            self.light_override = false;
            self.light_override_level = false;
            debug!("light override cleared, back to automatic");
        }
    }
}
