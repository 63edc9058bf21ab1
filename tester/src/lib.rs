//! Host-side test support: a simulated vehicle that emits bit-exact
//! frames for the monitored identifiers.

mod vehicle_sim;

pub use vehicle_sim::VehicleSim;
