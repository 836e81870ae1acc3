//! Adapters: concrete implementations of the port traits that are not
//! hardware drivers.
//!
//! | Adapter | Implements | Connects to            |
//! |---------|------------|------------------------|
//! | `time`  | `Clock`    | host system wall clock |

pub mod time;
