use crate::frame::CanFrame;

/// The hardware abstraction required by the controller.
/// This allows the same logic to run on the target (TWAI + GPIO) and
/// on the host under test with a mock implementation.
pub trait Hal {
    /// Fetch the next pending frame, if any. Non-blocking; the frame's
    /// arrival timestamp must already be filled in by the transport.
    fn receive_frame(&mut self, frame: &mut CanFrame) -> bool;

    /// Read the raw (undebounced) button level. True = pressed.
    fn read_button(&mut self) -> bool;

    /// Drive the cargo light relay.
    fn set_light(&mut self, on: bool);

    /// Drive the latch release relay.
    fn set_latch(&mut self, on: bool);

    /// Drive the parked indicator LED.
    fn set_parked_led(&mut self, on: bool);

    /// Drive the unlocked indicator LED.
    fn set_unlocked_led(&mut self, on: bool);

    /// Current monotonic timestamp in milliseconds. May wrap; all
    /// elapsed-time math uses wrapping subtraction.
    fn now_ms(&self) -> u32;
}
