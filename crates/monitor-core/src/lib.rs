//! # Monitor Core
//!
//! Domain state of the serial monitor and the actor that owns it.
//!
//! ## Components
//!
//! - **PortRegistry**: fixed port slots, at most one open at a time
//! - **PortConnection**: one slot's serial handle plus usage statistics
//! - **LogBuffer**: collects the bytes of one receive tick into a session
//! - **SendBuffer**: hex/text send fields, input indicator and send history
//! - **MonitorActor**: drives all of the above from UI commands and ticks

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod actor;
pub mod config;
pub mod connection;
pub mod constants;
pub mod history;
pub mod log_buffer;
pub mod registry;
pub mod sender;
pub mod stats;

pub use actor::MonitorActor;
pub use config::MonitorConfig;
pub use connection::PortConnection;
pub use history::SendHistory;
pub use log_buffer::LogBuffer;
pub use registry::{PortRegistry, ScanOutcome};
pub use sender::SendBuffer;
pub use stats::{PortStats, StatsHandle};
