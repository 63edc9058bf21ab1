//! Frame identifiers, signal layouts, and timing constants.
//!
//! The bit positions use DBC-style addressing: the 8 data bytes are
//! assembled into a 64-bit value little-endian (byte 0 = least
//! significant byte) and the position names the most significant bit
//! of the field. Changing any of these silently changes what the
//! decoders read, so they are kept in one place.

/// Body control module lamp status frame.
pub const LAMP_STATUS_ID: u32 = 0x3C3;
/// Central locking status frame.
pub const LOCK_STATUS_ID: u32 = 0x331;
/// Powertrain / transmission park status frame.
pub const PARK_STATUS_ID: u32 = 0x176;
/// Battery management state-of-charge frame.
pub const BATTERY_SOC_ID: u32 = 0x43C;

/// All monitored frames are classic 8-byte frames.
pub const FRAME_LEN: u8 = 8;

// Signal layout: (MSB position, width) per monitored signal.
pub const LAMP_REQUEST_BIT: u8 = 12;
pub const LAMP_REQUEST_WIDTH: u8 = 2;
pub const LOCK_STATUS_BIT: u8 = 35;
pub const LOCK_STATUS_WIDTH: u8 = 2;
pub const PARK_STATUS_BIT: u8 = 34;
pub const PARK_STATUS_WIDTH: u8 = 4;
pub const BATTERY_SOC_BIT: u8 = 28;
pub const BATTERY_SOC_WIDTH: u8 = 7;

// Lamp request values.
pub const LAMP_OFF: u8 = 0;
pub const LAMP_ON: u8 = 1;
pub const LAMP_RAMP_UP: u8 = 2;
pub const LAMP_RAMP_DOWN: u8 = 3;

// Lock status values. Anything unrecognized is treated as locked.
pub const LOCK_DOUBLE: u8 = 0;
pub const LOCK_ALL: u8 = 1;
pub const UNLOCK_ALL: u8 = 2;
pub const UNLOCK_DRIVER: u8 = 3;
/// Sentinel used before the first lock frame arrives.
pub const LOCK_UNKNOWN: u8 = 0xFF;

/// Park status value meaning the transmission park pawl is engaged.
/// All other values (unknown, transitional, out-of-park) are not-park.
pub const PARK_ENGAGED: u8 = 1;

// Timing. All values are milliseconds against the monotonic tick.
pub const BUTTON_DEBOUNCE_MS: u32 = 50;
pub const BUTTON_DOUBLE_CLICK_MS: u32 = 300;
pub const BUTTON_HOLD_THRESHOLD_MS: u32 = 1000;
pub const LATCH_PULSE_MS: u32 = 500;
pub const READINESS_WINDOW_MS: u32 = 5000;

/// Upper bound on frames drained per poll so a flooded bus cannot
/// starve the button and output logic.
pub const MAX_FRAMES_PER_POLL: usize = 10;

// A press that qualifies as a double-click must have been released and
// re-pressed inside the double-click window, while a hold requires
// continuous contact past the hold threshold. The two detectors only
// stay mutually exclusive while the window is shorter than the
// threshold.
const _: () = assert!(BUTTON_DOUBLE_CLICK_MS < BUTTON_HOLD_THRESHOLD_MS);
const _: () = assert!(BUTTON_DEBOUNCE_MS < BUTTON_DOUBLE_CLICK_MS);
