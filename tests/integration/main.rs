//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a subsystem end to end
//! against mock adapters. All tests run on the host with no real hardware;
//! only `runtime_tests` opens sockets, and only on loopback.

mod control_flow_tests;
mod cycle_tests;
mod sensor_tests;
