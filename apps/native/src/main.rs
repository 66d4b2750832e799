mod app;
mod console;
mod view;

use std::path::PathBuf;

use actor_runtime::logging::init_tracing;
use anyhow::Context;
use clap::Parser;
use core_types::RenderMode;
use monitor_core::MonitorConfig;
use monitor_protocol::BAUD_RATES;
use transport_native::NativeBackend;

fn parse_baud(value: &str) -> Result<u32, String> {
    let baud: u32 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if BAUD_RATES.contains(&baud) {
        Ok(baud)
    } else {
        Err(format!("unsupported baud rate (choose one of {BAUD_RATES:?})"))
    }
}

#[derive(Parser, Debug)]
#[command(name = "moromonitor")]
#[command(about = "Serial port monitor with hex dump and text views", long_about = None)]
#[command(version)]
struct Args {
    /// Path to a JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Port slot to offer (repeat for several); replaces the configured slots
    #[arg(long = "slot", value_name = "NAME")]
    slots: Vec<String>,

    /// Baud rate used when opening ports
    #[arg(long, value_parser = parse_baud)]
    baud: Option<u32>,

    /// Open the first available port automatically
    #[arg(long)]
    auto_connect: bool,

    /// Render received bytes as a hex dump or as text
    #[arg(long, value_name = "hex|text")]
    mode: Option<RenderMode>,

    /// Append a newline (0a) to every send
    #[arg(long)]
    newline: bool,

    /// Log filter, e.g. "debug" or "moromonitor=trace" (default: RUST_LOG, then "error")
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

impl Args {
    /// Config file (or defaults) with command-line overrides applied.
    fn resolve_config(&self) -> anyhow::Result<MonitorConfig> {
        let mut config = match &self.config {
            Some(path) => MonitorConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => MonitorConfig::default(),
        };

        if !self.slots.is_empty() {
            config.slots = self.slots.clone();
        }
        if let Some(baud) = self.baud {
            config.baud_rate = baud;
        }
        if let Some(mode) = self.mode {
            config.render_mode = mode;
        }
        config.auto_connect |= self.auto_connect;
        config.append_newline |= self.newline;

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.resolve_config()?;

    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    init_tracing(args.log_level.as_deref()).context("initialising logging")?;

    app::run(config, Box::new(NativeBackend::new())).await
}
