use core_types::RenderMode;
use monitor_protocol::{PortInfo, PortSnapshot, SenderView, StatusLevel, SystemEvent};

/// Text to put on stdout for one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Log text, written as is
    Raw(String),
    /// A status or info line
    Line(String),
}

/// Turns monitor events into console output.
///
/// Remembers the last port list for `:ports` and the last active port
/// details for `:info`; only announces the active port when it changes, not
/// on every counter update.
#[derive(Debug, Default)]
pub struct ConsoleView {
    ports: Vec<PortSnapshot>,
    active: Option<(String, u32)>,
    info: Option<PortInfo>,
}

impl ConsoleView {
    pub fn ports_line(&self) -> String {
        if self.ports.is_empty() {
            return "Ports: (none)".to_string();
        }
        let labels: Vec<String> = self.ports.iter().map(PortSnapshot::label).collect();
        format!("Ports: {}", labels.join(" | "))
    }

    /// One "Key: value" line per detail row of the active port.
    pub fn info_lines(&self) -> String {
        let Some(info) = &self.info else {
            return "No active port".to_string();
        };
        info.detail_rows()
            .into_iter()
            .map(|(key, value)| format!("{key:>9}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn active_changed(&mut self, info: Option<PortInfo>) -> Option<Output> {
        let next = info.as_ref().map(|i| (i.name.clone(), i.baud_rate));
        self.info = info;
        if next == self.active {
            return None;
        }
        let line = match &next {
            Some((name, baud)) => format!("Active port: {name} ({baud} baud)"),
            None => "No active port".to_string(),
        };
        self.active = next;
        Some(Output::Line(line))
    }

    pub fn render(&mut self, event: SystemEvent) -> Option<Output> {
        match event {
            SystemEvent::PortsChanged { ports } => {
                self.ports = ports;
                Some(Output::Line(self.ports_line()))
            }
            SystemEvent::ActivePortChanged { info } => self.active_changed(info),
            SystemEvent::LogAppended { text } => Some(Output::Raw(text)),
            SystemEvent::LogCleared => Some(Output::Line("--- log cleared ---".to_string())),
            SystemEvent::RenderModeChanged { mode } => {
                let name = match mode {
                    RenderMode::Hex => "hex dump",
                    RenderMode::Text => "text",
                };
                Some(Output::Line(format!("Render mode: {name}")))
            }
            SystemEvent::SenderUpdated { view } => recalled_line(&view).map(Output::Line),
            SystemEvent::Status(status) => {
                let prefix = match status.level {
                    StatusLevel::Info => "",
                    StatusLevel::Error => "! ",
                };
                Some(Output::Line(format!("{prefix}{}", status.display())))
            }
        }
    }
}

/// Only a recalled history entry is worth echoing; live edits come from the
/// console itself.
fn recalled_line(view: &SenderView) -> Option<String> {
    let pointer = view.history_pointer?;
    Some(format!(
        "history[{pointer}] hex: {} | text: {} (:send to send)",
        view.hex.as_str(),
        view.text.as_str()
    ))
}
