//! CAN frame representation, bit field access, and the per-frame
//! signal decoders.
//!
//! Bit addressing follows the DBC convention used by the vehicle: the
//! 8 data bytes form a 64-bit value little-endian (byte 0 least
//! significant) and a field of width `w` at position `p` occupies bits
//! `[p - w + 1, p]` of that value. This is a wire contract: any other
//! ordering extracts plausible-looking but wrong values.

use crate::config::*;

/// One received frame plus its arrival time on the monotonic millis
/// tick. Arrival time is stamped by the transport, not by the decoder.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CanFrame {
    pub id: u32,
    pub len: u8,
    pub data: [u8; 8],
    pub timestamp_ms: u32,
}

/// Extract an unsigned field from 8 data bytes.
///
/// Out-of-range descriptors (`position > 63`, `width` 0 or > 8, or a
/// field that would run past bit 0) return 0 instead of panicking; a
/// bad descriptor must never take down the control loop.
pub fn extract_bits(data: &[u8; 8], position: u8, width: u8) -> u8 {
    if position > 63 || width == 0 || width > 8 || u32::from(position) + 1 < u32::from(width) {
        return 0;
    }

    let mut assembled: u64 = 0;
    for (i, &byte) in data.iter().enumerate() {
        assembled |= u64::from(byte) << (i * 8);
    }

    let shift = position + 1 - width;
    let mask = (1u64 << width) - 1;
    ((assembled >> shift) & mask) as u8
}

/// Inverse of [`extract_bits`]: write `value` (masked to `width`) into
/// the field at `position`. Out-of-range descriptors leave the buffer
/// untouched.
pub fn insert_bits(data: &mut [u8; 8], position: u8, width: u8, value: u8) {
    if position > 63 || width == 0 || width > 8 || u32::from(position) + 1 < u32::from(width) {
        return;
    }

    let mut assembled: u64 = 0;
    for (i, &byte) in data.iter().enumerate() {
        assembled |= u64::from(byte) << (i * 8);
    }

    let shift = position + 1 - width;
    let mask = ((1u64 << width) - 1) << shift;
    assembled = (assembled & !mask) | ((u64::from(value) << shift) & mask);

    for (i, byte) in data.iter_mut().enumerate() {
        *byte = (assembled >> (i * 8)) as u8;
    }
}

/// Lamp request from the body control module.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LampRecord {
    pub request: u8,
    pub valid: bool,
    pub timestamp_ms: u32,
}

/// Central locking status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LockRecord {
    pub status: u8,
    pub valid: bool,
    pub timestamp_ms: u32,
}

/// Transmission park status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParkRecord {
    pub status: u8,
    pub valid: bool,
    pub timestamp_ms: u32,
}

/// Battery state of charge, 0-100 percent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SocRecord {
    pub percent: u8,
    pub valid: bool,
    pub timestamp_ms: u32,
}

fn frame_matches(frame: &CanFrame, id: u32) -> bool {
    frame.id == id && frame.len == FRAME_LEN
}

/// Decode the lamp status frame. A wrong identifier or length yields
/// an all-zero invalid record; the caller discards those.
pub fn decode_lamp(frame: &CanFrame) -> LampRecord {
    if !frame_matches(frame, LAMP_STATUS_ID) {
        return LampRecord::default();
    }
    LampRecord {
        request: extract_bits(&frame.data, LAMP_REQUEST_BIT, LAMP_REQUEST_WIDTH),
        valid: true,
        timestamp_ms: frame.timestamp_ms,
    }
}

/// Decode the locking system status frame.
pub fn decode_lock(frame: &CanFrame) -> LockRecord {
    if !frame_matches(frame, LOCK_STATUS_ID) {
        return LockRecord::default();
    }
    LockRecord {
        status: extract_bits(&frame.data, LOCK_STATUS_BIT, LOCK_STATUS_WIDTH),
        valid: true,
        timestamp_ms: frame.timestamp_ms,
    }
}

/// Decode the powertrain park status frame.
pub fn decode_park(frame: &CanFrame) -> ParkRecord {
    if !frame_matches(frame, PARK_STATUS_ID) {
        return ParkRecord::default();
    }
    ParkRecord {
        status: extract_bits(&frame.data, PARK_STATUS_BIT, PARK_STATUS_WIDTH),
        valid: true,
        timestamp_ms: frame.timestamp_ms,
    }
}

/// Decode the battery management state-of-charge frame.
pub fn decode_soc(frame: &CanFrame) -> SocRecord {
    if !frame_matches(frame, BATTERY_SOC_ID) {
        return SocRecord::default();
    }
    SocRecord {
        percent: extract_bits(&frame.data, BATTERY_SOC_BIT, BATTERY_SOC_WIDTH),
        valid: true,
        timestamp_ms: frame.timestamp_ms,
    }
}
