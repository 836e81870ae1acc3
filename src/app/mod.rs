//! Controller core: shared state, commands and port traits. No I/O.
//!
//! [`state::StateStore`] is the single owner of the system record. The
//! scheduler, the sensor poller and the HTTP routes only ever reach it
//! through its snapshot and write operations. Hardware is reached through
//! the traits in [`ports`].

pub mod commands;
pub mod ports;
pub mod state;
