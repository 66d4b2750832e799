//! # Actor Runtime
//!
//! Provides the runtime infrastructure for the MoroMonitor actor.
//!
//! This crate defines:
//! - **Actor trait**: Base trait for message-driven components with lifecycle methods
//! - **Channel management**: Type-safe message routing between UI and actor
//! - **Logging**: `monitor_*!` macros and subscriber setup
//!
//! ## Architecture
//!
//! - **Zero shared state**: The actor owns its data
//! - **Message passing**: UI commands and timer ticks arrive as typed messages
//! - **Sequential processing**: Messages are handled one at a time
//! - **Failure isolation**: Handler errors become status events, never crashes
//!
//! ## Example
//!
//! ```ignore
//! use actor_runtime::{Actor, ChannelManager, Tick};
//!
//! let (manager, handles) = ChannelManager::new();
//! let actor = MonitorActor::new(&config, backend, handles.event_tx.clone());
//!
//! // Drive the actor and the UI on the same thread
//! tokio::join!(actor.run(handles.monitor_rx, handles.event_tx), ui(manager));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod actor;
pub mod channels;
pub mod logging;

pub use actor::Actor;
pub use channels::{ChannelManager, MonitorHandles, MonitorMessage, Tick};

#[doc(hidden)]
pub use tracing as __tracing;
