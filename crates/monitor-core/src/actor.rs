use actor_runtime::{monitor_debug, monitor_info, monitor_warn, Actor, MonitorMessage, Tick};
use core_types::{RenderMode, SerialBackend, SerialConfig};
use decoders::{format_hex_spaced, renderer_for, Renderer};
use futures_channel::mpsc;
use monitor_protocol::{MonitorError, StatusMessage, SystemEvent, UiCommand, BAUD_RATES};

use crate::config::MonitorConfig;
use crate::constants::poll::MAX_READS_PER_TICK;
use crate::log_buffer::LogBuffer;
use crate::registry::PortRegistry;
use crate::sender::SendBuffer;

/// Single owner of the monitor's domain state
///
/// Responsibilities:
/// - Refresh slot states from device enumeration (port-scan tick)
/// - Drain the active port into log sessions and render them (receive tick)
/// - Apply UI commands: port selection, serial parameters, rendering, sending
/// - Report outcomes to the UI as `SystemEvent`s
pub struct MonitorActor {
    backend: Box<dyn SerialBackend>,
    registry: PortRegistry,
    log: LogBuffer,
    renderer: Box<dyn Renderer>,
    render_mode: RenderMode,
    sender: SendBuffer,
    auto_connect: bool,
    /// Auto-connect target whose open failed; skipped until the port list changes
    auto_connect_failed: Option<String>,
    receive_chunk: usize,
    event_tx: mpsc::Sender<SystemEvent>,
}

impl MonitorActor {
    pub fn new(
        config: &MonitorConfig,
        backend: Box<dyn SerialBackend>,
        event_tx: mpsc::Sender<SystemEvent>,
    ) -> Self {
        Self {
            backend,
            registry: PortRegistry::new(config.slots.iter().cloned(), config.serial_config()),
            log: LogBuffer::new(),
            renderer: renderer_for(config.render_mode),
            render_mode: config.render_mode,
            sender: SendBuffer::new(config.history_capacity, config.append_newline),
            auto_connect: config.auto_connect,
            auto_connect_failed: None,
            receive_chunk: config.receive_chunk.max(1),
            event_tx,
        }
    }

    pub fn registry(&self) -> &PortRegistry {
        &self.registry
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn auto_connect(&self) -> bool {
        self.auto_connect
    }

    /// Failures are logged only; the UI may have gone away.
    fn emit(&mut self, event: SystemEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            monitor_warn!("UI event dropped: {:?}", e.into_inner());
        }
    }

    fn status_info(&mut self, message: String) {
        monitor_info!("{}", message);
        self.emit(SystemEvent::Status(StatusMessage::info(message)));
    }

    fn status_error(&mut self, message: String) {
        monitor_warn!("{}", message);
        self.emit(SystemEvent::Status(StatusMessage::error(message)));
    }

    fn emit_ports(&mut self) {
        let ports = self.registry.snapshots();
        let info = self.registry.active_info();
        self.emit(SystemEvent::PortsChanged { ports });
        self.emit(SystemEvent::ActivePortChanged { info });
    }

    fn emit_sender(&mut self) {
        let view = self.sender.view();
        self.emit(SystemEvent::SenderUpdated { view });
    }

    fn emit_snapshot(&mut self) {
        self.emit_ports();
        let mode = self.render_mode;
        self.emit(SystemEvent::RenderModeChanged { mode });
        self.emit_sender();
    }

    fn handle_port_scan(&mut self) -> Result<(), MonitorError> {
        let devices = self.backend.list_devices()?;
        let outcome = self.registry.update_connection_state(&devices);

        if let Some(name) = outcome.lost_active {
            self.status_error(format!("{name} was disconnected"));
        }
        if outcome.changed {
            self.auto_connect_failed = None;
            self.emit_ports();
        }

        if !self.auto_connect {
            return Ok(());
        }
        let Some(target) = self.registry.auto_connect_target().map(str::to_string) else {
            return Ok(());
        };
        if self.auto_connect_failed.as_deref() == Some(target.as_str()) {
            return Ok(());
        }
        monitor_debug!("Auto-connecting to {}", target);
        if let Err(e) = self.select_port(Some(target.clone())) {
            self.auto_connect_failed = Some(target);
            return Err(e);
        }
        Ok(())
    }

    fn handle_receive(&mut self) -> Result<(), MonitorError> {
        if self.log.take_clear_request() {
            self.emit(SystemEvent::LogCleared);
        }
        if !self.registry.has_active() {
            return Ok(());
        }

        let conn = self.registry.active_connection_mut()?;
        let mut failure = None;
        self.log.session_begin();
        for _ in 0..MAX_READS_PER_TICK {
            let pending = match conn.bytes_available() {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            };
            match conn.receive_bytes(pending.min(self.receive_chunk)) {
                Ok(data) if data.is_empty() => break,
                Ok(data) => self.log.append(&data),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        if let Some(session) = self.log.session_end() {
            let text = self.renderer.render(&session);
            self.emit(SystemEvent::LogAppended { text });
            let info = self.registry.active_info();
            self.emit(SystemEvent::ActivePortChanged { info });
        }
        if let Some(e) = failure {
            self.status_error(format!("Cannot receive data: {}", e.kind()));
        }
        Ok(())
    }

    fn select_port(&mut self, name: Option<String>) -> Result<(), MonitorError> {
        let previous = self.registry.active_name().map(str::to_string);
        let result = self.registry.activate_one(name.as_deref(), self.backend.as_ref());
        self.emit_ports();
        result?;
        self.auto_connect_failed = None;

        match (name, previous) {
            (Some(name), _) => {
                let baud = self.registry.params().baud_rate;
                self.status_info(format!("Opened {name} at {baud} baud"));
            }
            (None, Some(previous)) => self.status_info(format!("Closed {previous}")),
            (None, None) => {}
        }
        Ok(())
    }

    fn set_baud_rate(&mut self, baud: u32) -> Result<(), MonitorError> {
        if !BAUD_RATES.contains(&baud) {
            return Err(MonitorError::MalformedInput(format!(
                "unsupported baud rate {baud}"
            )));
        }
        let params = SerialConfig {
            baud_rate: baud,
            ..self.registry.params()
        };
        let result = self
            .registry
            .set_params_and_reopen(params, self.backend.as_ref());
        self.emit_ports();
        result?;
        self.status_info(format!("Baud rate set to {baud}"));
        Ok(())
    }

    fn set_render_mode(&mut self, mode: RenderMode) {
        if mode == self.render_mode {
            return;
        }
        self.render_mode = mode;
        self.renderer = renderer_for(mode);
        // Dump lines and a text stream do not mix in one log
        self.log.clear_later();
        self.emit(SystemEvent::RenderModeChanged { mode });
    }

    fn flush(&mut self) {
        // Status shows what was typed, without the appended newline
        let shown = format_hex_spaced(self.sender.payload());
        let payload = match self.sender.prepare_flush() {
            Ok(Some(payload)) => payload,
            Ok(None) => return,
            Err(e) => {
                self.status_error(format!("Failed to send data: {}", e.kind()));
                return;
            }
        };

        let sent = self
            .registry
            .active_connection_mut()
            .and_then(|conn| conn.send_bytes(&payload));
        match sent {
            Ok(()) => {
                self.sender.commit_sent();
                self.emit_sender();
                let info = self.registry.active_info();
                self.emit(SystemEvent::ActivePortChanged { info });
                self.status_info(format!("Data sent: {shown}"));
            }
            Err(e) => self.status_error(format!("Failed to send data: {}", e.kind())),
        }
    }

    fn handle_command(&mut self, cmd: UiCommand) -> Result<(), MonitorError> {
        match cmd {
            UiCommand::SelectPort { name } => self.select_port(name)?,
            UiCommand::SetBaudRate { baud } => self.set_baud_rate(baud)?,
            UiCommand::SetAutoConnect { enabled } => {
                self.auto_connect = enabled;
                self.auto_connect_failed = None;
                let state = if enabled { "on" } else { "off" };
                self.status_info(format!("Auto-connect {state}"));
            }
            UiCommand::SetRenderMode { mode } => self.set_render_mode(mode),
            UiCommand::ClearLog => self.log.clear_later(),
            UiCommand::EditHex { text } => {
                self.sender.edit_hex(&text);
                self.emit_sender();
            }
            UiCommand::EditText { text } => {
                self.sender.edit_text(&text);
                self.emit_sender();
            }
            UiCommand::SetAppendNewline { enabled } => {
                self.sender.set_append_newline(enabled);
                self.emit_sender();
            }
            UiCommand::Flush => self.flush(),
            UiCommand::HistoryUp => {
                if self.sender.history_up() {
                    self.emit_sender();
                }
            }
            UiCommand::HistoryDown => {
                if self.sender.history_down() {
                    self.emit_sender();
                }
            }
            UiCommand::RequestSnapshot => self.emit_snapshot(),
        }
        Ok(())
    }
}

impl Actor for MonitorActor {
    type Message = MonitorMessage;

    fn name(&self) -> &'static str {
        "MonitorActor"
    }

    async fn init(&mut self) -> Result<(), MonitorError> {
        if let Err(e) = self.handle_port_scan() {
            self.status_error(format!("Cannot list ports: {}", e.kind()));
        }
        self.emit_snapshot();
        Ok(())
    }

    async fn handle(&mut self, msg: MonitorMessage) -> Result<(), MonitorError> {
        match msg {
            MonitorMessage::Tick(Tick::PortScan) => self.handle_port_scan(),
            MonitorMessage::Tick(Tick::Receive) => self.handle_receive(),
            MonitorMessage::UiCommand(cmd) => self.handle_command(cmd),
        }
    }

    async fn shutdown(&mut self) {
        if let Some(name) = self.registry.deactivate() {
            monitor_info!("Closed {} on shutdown", name);
        }
    }
}
