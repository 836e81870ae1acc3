//! Semaforo: network-controllable traffic-light simulator.
//!
//! Exposes the controller core and its adapters for the host binary and
//! for integration testing. See [`runtime`] for how the pieces run
//! together.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod http;
pub mod pins;
pub mod runtime;
pub mod scheduler;
pub mod sensors;
