use bedctl_common::config::*;
use bedctl_common::frame::insert_bits;
use bedctl_common::CanFrame;

/// A simulated vehicle. Holds the raw signal values the real bus would
/// carry and packs them into frames with the production bit layout.
pub struct VehicleSim {
    pub lamp_request: u8,
    pub lock_status: u8,
    pub park_status: u8,
    pub battery_soc: u8,
}

impl Default for VehicleSim {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleSim {
    /// Starts parked, locked, lamp off, battery at 80%.
    pub fn new() -> Self {
        Self {
            lamp_request: LAMP_OFF,
            lock_status: LOCK_ALL,
            park_status: PARK_ENGAGED,
            battery_soc: 80,
        }
    }

    pub fn unlock(&mut self) {
        self.lock_status = UNLOCK_ALL;
    }

    pub fn lock(&mut self) {
        self.lock_status = LOCK_ALL;
    }

    pub fn shift_out_of_park(&mut self) {
        self.park_status = 5;
    }

    fn pack(id: u32, position: u8, width: u8, value: u8, now_ms: u32) -> CanFrame {
        let mut data = [0u8; 8];
        insert_bits(&mut data, position, width, value);
        CanFrame { id, len: 8, data, timestamp_ms: now_ms }
    }

    pub fn lamp_frame(&self, now_ms: u32) -> CanFrame {
        Self::pack(
            LAMP_STATUS_ID,
            LAMP_REQUEST_BIT,
            LAMP_REQUEST_WIDTH,
            self.lamp_request,
            now_ms,
        )
    }

    pub fn lock_frame(&self, now_ms: u32) -> CanFrame {
        Self::pack(
            LOCK_STATUS_ID,
            LOCK_STATUS_BIT,
            LOCK_STATUS_WIDTH,
            self.lock_status,
            now_ms,
        )
    }

    pub fn park_frame(&self, now_ms: u32) -> CanFrame {
        Self::pack(
            PARK_STATUS_ID,
            PARK_STATUS_BIT,
            PARK_STATUS_WIDTH,
            self.park_status,
            now_ms,
        )
    }

    pub fn soc_frame(&self, now_ms: u32) -> CanFrame {
        Self::pack(
            BATTERY_SOC_ID,
            BATTERY_SOC_BIT,
            BATTERY_SOC_WIDTH,
            self.battery_soc,
            now_ms,
        )
    }

    /// One periodic broadcast cycle: all four monitored frames.
    pub fn broadcast(&self, now_ms: u32) -> [CanFrame; 4] {
        [
            self.lamp_frame(now_ms),
            self.lock_frame(now_ms),
            self.park_frame(now_ms),
            self.soc_frame(now_ms),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bedctl_common::frame::{decode_lock, decode_park};

    #[test]
    fn packed_frames_decode_back() {
        let mut sim = VehicleSim::new();
        sim.unlock();

        let lock = decode_lock(&sim.lock_frame(42));
        assert!(lock.valid);
        assert_eq!(lock.status, UNLOCK_ALL);
        assert_eq!(lock.timestamp_ms, 42);

        let park = decode_park(&sim.park_frame(42));
        assert!(park.valid);
        assert_eq!(park.status, PARK_ENGAGED);
    }
}
