#![no_std]

pub mod config;
pub mod frame;
pub mod hal;
pub mod vehicle;
pub mod button;
pub mod outputs;
pub mod controller;

pub use frame::CanFrame;
pub use hal::Hal;
pub use vehicle::VehicleState;
pub use button::ButtonState;
pub use outputs::OutputState;
pub use controller::Controller;
