use core_types::RenderMode;
use monitor_protocol::UiCommand;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  :open NAME    make NAME the open port
  :close        close the open port
  :baud N       set the baud rate (reopens the port)
  :auto on|off  open the first available port automatically
  :hex | :text  render received bytes as a hex dump or as text
  :clear        clear the log
  :nl on|off    append a newline (0a) to every send
  :x HEX        send bytes given as hex, e.g. :x 48 65 6c 6c 6f
  :up | :down   recall older / newer sent payloads
  :send         send the recalled or current payload
  :ports        list port slots
  :info         show details of the open port
  :help         show this help
  :quit         exit
Any other line is sent as text; start it with '::' to send a leading ':'.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("Unknown command ':{0}'. Type :help for a list.")]
    UnknownCommand(String),

    #[error(":{command} needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("Invalid argument for :{command}: '{value}' ({expected})")]
    InvalidArgument {
        command: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// What one input line asks for
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleAction {
    /// Forward to the monitor in order
    Send(Vec<UiCommand>),
    ShowPorts,
    ShowInfo,
    Help,
    Quit,
}

fn on_off(command: &'static str, arg: Option<&str>) -> Result<bool, ConsoleError> {
    match arg {
        Some("on") => Ok(true),
        Some("off") => Ok(false),
        Some(other) => Err(ConsoleError::InvalidArgument {
            command,
            value: other.to_string(),
            expected: "on or off",
        }),
        None => Err(ConsoleError::MissingArgument {
            command,
            expected: "on or off",
        }),
    }
}

fn send_text(text: &str) -> ConsoleAction {
    ConsoleAction::Send(vec![
        UiCommand::EditText {
            text: text.to_string(),
        },
        UiCommand::Flush,
    ])
}

pub fn parse_line(line: &str) -> Result<ConsoleAction, ConsoleError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(literal) = line.strip_prefix("::") {
        return Ok(send_text(&format!(":{literal}")));
    }
    let Some(command_line) = line.strip_prefix(':') else {
        return Ok(send_text(line));
    };

    let command_line = command_line.trim();
    let (name, rest) = match command_line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, Some(rest.trim()).filter(|r| !r.is_empty())),
        None => (command_line, None),
    };

    let one = |cmd: UiCommand| -> Result<ConsoleAction, ConsoleError> {
        Ok(ConsoleAction::Send(vec![cmd]))
    };

    match name {
        "open" => {
            let port = rest.ok_or(ConsoleError::MissingArgument {
                command: "open",
                expected: "a port name",
            })?;
            one(UiCommand::SelectPort {
                name: Some(port.to_string()),
            })
        }
        "close" => one(UiCommand::SelectPort { name: None }),
        "baud" => {
            let value = rest.ok_or(ConsoleError::MissingArgument {
                command: "baud",
                expected: "a baud rate",
            })?;
            let baud = value.parse().map_err(|_| ConsoleError::InvalidArgument {
                command: "baud",
                value: value.to_string(),
                expected: "a whole number",
            })?;
            one(UiCommand::SetBaudRate { baud })
        }
        "auto" => one(UiCommand::SetAutoConnect {
            enabled: on_off("auto", rest)?,
        }),
        "hex" => one(UiCommand::SetRenderMode {
            mode: RenderMode::Hex,
        }),
        "text" => one(UiCommand::SetRenderMode {
            mode: RenderMode::Text,
        }),
        "clear" => one(UiCommand::ClearLog),
        "nl" => one(UiCommand::SetAppendNewline {
            enabled: on_off("nl", rest)?,
        }),
        "x" => Ok(ConsoleAction::Send(vec![
            UiCommand::EditHex {
                text: rest.unwrap_or_default().to_string(),
            },
            UiCommand::Flush,
        ])),
        "up" => one(UiCommand::HistoryUp),
        "down" => one(UiCommand::HistoryDown),
        "send" => one(UiCommand::Flush),
        "ports" => Ok(ConsoleAction::ShowPorts),
        "info" => Ok(ConsoleAction::ShowInfo),
        "help" | "?" => Ok(ConsoleAction::Help),
        "quit" | "q" | "exit" => Ok(ConsoleAction::Quit),
        other => Err(ConsoleError::UnknownCommand(other.to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn commands(line: &str) -> Vec<UiCommand> {
        match parse_line(line).unwrap() {
            ConsoleAction::Send(cmds) => cmds,
            other => panic!("expected commands, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_line_is_sent_as_text() {
        assert_eq!(
            commands("hello world\r\n"),
            vec![
                UiCommand::EditText {
                    text: "hello world".into()
                },
                UiCommand::Flush
            ]
        );
        assert_eq!(
            commands("::colon")[0],
            UiCommand::EditText {
                text: ":colon".into()
            }
        );
    }

    #[test]
    fn test_port_commands() {
        assert_eq!(
            commands(":open /dev/ttyUSB0"),
            vec![UiCommand::SelectPort {
                name: Some("/dev/ttyUSB0".into())
            }]
        );
        assert_eq!(commands(":close"), vec![UiCommand::SelectPort { name: None }]);
        assert_eq!(
            commands(":baud 115200"),
            vec![UiCommand::SetBaudRate { baud: 115200 }]
        );
        assert_eq!(
            commands(":auto on"),
            vec![UiCommand::SetAutoConnect { enabled: true }]
        );
    }

    #[test]
    fn test_send_commands() {
        assert_eq!(
            commands(":x 48 65"),
            vec![
                UiCommand::EditHex {
                    text: "48 65".into()
                },
                UiCommand::Flush
            ]
        );
        assert_eq!(commands(":up"), vec![UiCommand::HistoryUp]);
        assert_eq!(commands(":send"), vec![UiCommand::Flush]);
        assert_eq!(
            commands(":nl off"),
            vec![UiCommand::SetAppendNewline { enabled: false }]
        );
        assert_eq!(
            commands(":text"),
            vec![UiCommand::SetRenderMode {
                mode: RenderMode::Text
            }]
        );
    }

    #[test]
    fn test_local_actions() {
        assert_eq!(parse_line(":ports"), Ok(ConsoleAction::ShowPorts));
        assert_eq!(parse_line(":info"), Ok(ConsoleAction::ShowInfo));
        assert_eq!(parse_line(":help"), Ok(ConsoleAction::Help));
        assert_eq!(parse_line(":quit"), Ok(ConsoleAction::Quit));
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse_line(":frobnicate"),
            Err(ConsoleError::UnknownCommand("frobnicate".into()))
        );
        assert!(matches!(
            parse_line(":open"),
            Err(ConsoleError::MissingArgument { command: "open", .. })
        ));
        assert!(matches!(
            parse_line(":baud fast"),
            Err(ConsoleError::InvalidArgument { command: "baud", .. })
        ));
        assert!(matches!(
            parse_line(":auto maybe"),
            Err(ConsoleError::InvalidArgument { command: "auto", .. })
        ));
    }
}
