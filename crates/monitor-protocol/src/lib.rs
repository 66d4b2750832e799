//! # Monitor Protocol
//!
//! Type-safe message definitions for MoroMonitor.
//!
//! This crate has no dependency on any UI layer or serial library, making it
//! fully testable in isolation.
//!
//! ## Architecture
//!
//! - **UiCommand**: Messages from UI → MonitorActor
//! - **SystemEvent**: Messages from MonitorActor → UI
//! - **PortState**: per-slot tri-state (pure logic, no side effects)
//!
//! ## Message Flow
//!
//! ```text
//! UI → UiCommand ──► MonitorActor ◄── Tick (port scan / receive)
//!                        │
//!                   SystemEvent → UI
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod errors;
pub mod messages;
pub mod state;

pub use errors::MonitorError;
pub use messages::{
    FieldText, InputIndicator, PortInfo, PortSnapshot, SenderView, StatusLevel, StatusMessage,
    SystemEvent, UiCommand, BAUD_RATES, STATUS_TRUNCATE,
};
pub use state::PortState;
