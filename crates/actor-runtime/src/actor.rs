use futures::stream::StreamExt;
use futures_channel::mpsc;
use monitor_protocol::{MonitorError, StatusMessage, SystemEvent};

use crate::{monitor_debug, monitor_warn};

/// Actor trait for implementing message-driven components
///
/// Actors are independent, stateful components that communicate through
/// message passing. Each actor has its own message queue and processes
/// messages sequentially, so a handler always runs to completion before the
/// next message (including the next timer tick) is looked at.
///
/// # Lifecycle
///
/// 1. **init()** - Called once before message processing starts
/// 2. **handle()** - Called for each received message
/// 3. **shutdown()** - Called when every sender has been dropped
///
/// # Example
///
/// ```ignore
/// struct Echo {
///     event_tx: mpsc::Sender<SystemEvent>,
/// }
///
/// impl Actor for Echo {
///     type Message = String;
///
///     fn name(&self) -> &'static str {
///         "Echo"
///     }
///
///     async fn handle(&mut self, msg: Self::Message) -> Result<(), MonitorError> {
///         // Process message
///         Ok(())
///     }
/// }
/// ```
#[allow(async_fn_in_trait)]
pub trait Actor: 'static {
    /// Message type this actor processes
    type Message: 'static;

    /// Actor name (used for logging and debugging)
    fn name(&self) -> &'static str;

    /// Initialize the actor before processing messages
    async fn init(&mut self) -> Result<(), MonitorError> {
        Ok(())
    }

    /// Handle a single message
    async fn handle(&mut self, msg: Self::Message) -> Result<(), MonitorError>;

    /// Clean up before shutdown
    ///
    /// Called when the inbox closes. Use this to close ports.
    async fn shutdown(&mut self) {}

    /// Main actor run loop (provided by runtime)
    ///
    /// Consumes the actor and runs it until every sender of `rx` is dropped.
    /// Handler errors are reported to the UI as error status messages.
    async fn run(
        mut self,
        mut rx: mpsc::Receiver<Self::Message>,
        event_tx: mpsc::Sender<SystemEvent>,
    ) where
        Self: Sized,
    {
        if let Err(e) = self.init().await {
            monitor_warn!("{} init failed: {}", self.name(), e);
            let _ = event_tx.clone().try_send(SystemEvent::Status(StatusMessage::error(
                format!("{} init failed: {}", self.name(), e),
            )));
            return;
        }

        monitor_debug!("{} started", self.name());

        while let Some(msg) = rx.next().await {
            if let Err(e) = self.handle(msg).await {
                monitor_warn!("{} error: {}", self.name(), e);
                let _ = event_tx
                    .clone()
                    .try_send(SystemEvent::Status(StatusMessage::error(e.to_string())));
            }
        }

        self.shutdown().await;

        monitor_debug!("{} stopped", self.name());
    }
}
