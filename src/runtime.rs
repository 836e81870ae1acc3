//! Composition of the three concurrent activities.
//!
//! ```text
//!  ┌───────────────────────────────────────────────────────────┐
//!  │  futures_lite::block_on (drives reactor + executor)       │
//!  │  ┌─────────────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor                       │  │
//!  │  │                                                     │  │
//!  │  │  root:     CycleScheduler::run   (own Timer)        │  │
//!  │  │  spawned:  SensorPoller::run     (own Timer)        │  │
//!  │  │            server::accept_loop ──▶ ConnQueue        │  │
//!  │  │            server::worker × N                       │  │
//!  │  └─────────────────────────────────────────────────────┘  │
//!  └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `Timer` here is backed by the `embassy-time` std driver, which
//! runs its own alarm thread beside the `async-io-mini` reactor thread.
//!
//! The scheduler is the root future, so an actuator failure ends the
//! executor and [`run`] returns the error. Spawned tasks are dropped
//! with the executor.

use std::net::TcpListener;

use async_io_mini::Async;
use edge_executor::LocalExecutor;
use embassy_sync::channel::Channel;
use log::{error, info};

use crate::app::ports::{Clock, SensorReader, SignalActuator};
use crate::app::state::{SignalState, StateStore};
use crate::config::SystemConfig;
use crate::error::Result;
use crate::http::server::{self, ConnQueue, HTTP_WORKERS};
use crate::scheduler::{CycleDurations, CycleScheduler};
use crate::sensors::SensorPoller;

/// Run the controller until the lamps fail.
///
/// Never returns `Ok` in practice. On error the stored light is set to
/// `Off` before returning; the actuator is dropped by the caller.
pub fn run<A, R, C>(
    config: &SystemConfig,
    store: &StateStore,
    listener: Async<TcpListener>,
    actuator: &mut A,
    reader: R,
    clock: C,
) -> Result<()>
where
    A: SignalActuator,
    R: SensorReader,
    C: Clock,
{
    let queue: ConnQueue = Channel::new();
    let executor: LocalExecutor<'_, 8> = LocalExecutor::new();

    let poller = SensorPoller::new(reader, config.sensor_failure_policy);
    executor
        .spawn(poller.run(store, clock, config.sensor_poll_interval()))
        .detach();

    executor
        .spawn(server::accept_loop(&listener, &queue))
        .detach();
    for id in 0..HTTP_WORKERS {
        executor
            .spawn(server::worker(id, &queue, store, config.request_timeout()))
            .detach();
    }

    info!(
        "Runtime started: cycle check {:?}, sensor poll {:?}, {} HTTP workers",
        config.cycle_check_interval(),
        config.sensor_poll_interval(),
        HTTP_WORKERS
    );

    let scheduler = CycleScheduler::new(CycleDurations::from_config(config));
    let outcome = futures_lite::future::block_on(executor.run(scheduler.run(
        store,
        actuator,
        config.cycle_check_interval(),
    )));

    if let Err(e) = outcome {
        error!("CYCLE: actuator failure, shutting down: {}", e);
        store.set_light(SignalState::Off);
        return Err(e.into());
    }
    Ok(())
}
