use std::io::Write;
use std::time::Duration;

use actor_runtime::{monitor_debug, monitor_warn, Actor, ChannelManager, Tick};
use anyhow::Context;
use core_types::SerialBackend;
use futures::stream::StreamExt;
use monitor_core::{MonitorActor, MonitorConfig};
use monitor_protocol::MonitorError;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, MissedTickBehavior};

use crate::console::{self, ConsoleAction, HELP};
use crate::view::{ConsoleView, Output};

/// Run the monitor until stdin closes or `:quit`.
///
/// The actor and the console share one thread; neither is spawned.
pub async fn run(config: MonitorConfig, backend: Box<dyn SerialBackend>) -> anyhow::Result<()> {
    let (manager, handles) = ChannelManager::new();
    let actor = MonitorActor::new(&config, backend, handles.event_tx.clone());

    let ((), console) = tokio::join!(
        actor.run(handles.monitor_rx, handles.event_tx),
        console_loop(manager, &config)
    );
    console
}

fn write_output(out: &mut impl Write, output: Output) -> std::io::Result<()> {
    match output {
        Output::Raw(text) => out.write_all(text.as_bytes())?,
        Output::Line(line) => writeln!(out, "{line}")?,
    }
    out.flush()
}

fn send_tick(manager: &mut ChannelManager, tick: Tick) {
    match manager.send_tick(tick) {
        Ok(()) => {}
        // The next tick does the same work
        Err(MonitorError::Overloaded(_)) => monitor_debug!("{:?} tick dropped", tick),
        Err(e) => monitor_warn!("{:?} tick failed: {}", tick, e),
    }
}

async fn console_loop(mut manager: ChannelManager, config: &MonitorConfig) -> anyhow::Result<()> {
    let mut events = manager.take_event_receiver();
    let mut view = ConsoleView::default();
    let mut stdout = std::io::stdout();

    let mut scan = interval(Duration::from_millis(config.port_scan_interval_ms));
    scan.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut receive = interval(Duration::from_millis(config.receive_interval_ms));
    receive.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    writeln!(stdout, "MoroMonitor: type :help for commands").context("writing to stdout")?;

    loop {
        tokio::select! {
            _ = scan.tick() => send_tick(&mut manager, Tick::PortScan),
            _ = receive.tick() => send_tick(&mut manager, Tick::Receive),
            Some(event) = events.next() => {
                if let Some(output) = view.render(event) {
                    write_output(&mut stdout, output).context("writing to stdout")?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                let output = match console::parse_line(&line) {
                    Ok(ConsoleAction::Send(commands)) => {
                        let mut failure = None;
                        for cmd in commands {
                            if let Err(e) = manager.send_command(cmd) {
                                failure = Some(Output::Line(format!("! {e}")));
                                break;
                            }
                        }
                        failure
                    }
                    Ok(ConsoleAction::ShowPorts) => Some(Output::Line(view.ports_line())),
                    Ok(ConsoleAction::ShowInfo) => Some(Output::Line(view.info_lines())),
                    Ok(ConsoleAction::Help) => Some(Output::Line(HELP.to_string())),
                    Ok(ConsoleAction::Quit) => break,
                    Err(e) => Some(Output::Line(format!("! {e}"))),
                };
                if let Some(output) = output {
                    write_output(&mut stdout, output).context("writing to stdout")?;
                }
            }
        }
    }

    monitor_debug!("Console closed");
    Ok(())
}
