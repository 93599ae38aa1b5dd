use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use log::{info, warn};
use rustydebug::config::DebuggerConfig;
use rustydebug::console::{CommandOutcome, ConsoleCommand};
use rustydebug::protocol::ACK;
use rustydebug::session::{DebugSession, TickReport};
use rustydebug::transport::{ReplayTransport, SerialTransport, check_baud_rate};
use std::io::{BufRead, Write};
use std::sync::mpsc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Decode SerialDebugger telemetry and acknowledge breakpoints", long_about = None)]
struct Cli {
    /// JSON file with debugger settings
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<Utf8PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Acknowledge every breakpoint immediately
    #[arg(long, global = true)]
    auto_skip: bool,

    /// Plot only the most recent points
    #[arg(long, global = true)]
    latest_only: bool,

    /// Maximum number of plotted points per variable
    #[arg(long, value_name = "POINTS", global = true)]
    plot_length: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watch a serial port. Commands are read from stdin:
    /// <Enter>/next, pause NAME, resume NAME, reset [NAME], auto on|off, show, quit
    Monitor {
        /// Serial device, e.g. /dev/ttyUSB0 or COM3
        #[arg(long)]
        port: String,
        #[arg(long, value_parser = parse_baud)]
        baud: Option<u32>,
    },
    /// Feed a raw capture of device output through the decoder
    Replay {
        #[arg(value_name = "CAPTURE")]
        capture: Utf8PathBuf,
        /// Bytes delivered per tick
        #[arg(long, default_value_t = 64)]
        chunk_size: usize,
    },
}

fn parse_baud(s: &str) -> Result<u32, String> {
    let baud: u32 = s.parse().map_err(|e| format!("{}", e))?;
    check_baud_rate(baud)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let mut config = match &cli.config {
        Some(path) => DebuggerConfig::load(path)?,
        None => DebuggerConfig::default(),
    };
    config.auto_skip |= cli.auto_skip;
    config.plot_only_latest |= cli.latest_only;
    if let Some(n) = cli.plot_length {
        config.plot_length = n;
    }

    match cli.command {
        Command::Monitor { port, baud } => {
            if let Some(baud) = baud {
                config.baud_rate = baud;
            }
            monitor(&port, config)
        }
        Command::Replay {
            capture,
            chunk_size,
        } => replay(&capture, chunk_size, config),
    }
}

fn monitor(port: &str, config: DebuggerConfig) -> Result<()> {
    let transport = SerialTransport::open(port, config.baud_rate)?;
    info!("{} open @ {} baud", transport.name(), config.baud_rate);
    let interval = Duration::from_millis(config.poll_interval_ms);
    let mut session = DebugSession::with_transport(transport, config);

    let commands = spawn_stdin_reader();
    let mut stdin_open = true;
    loop {
        let report = session.tick();
        emit(&mut std::io::stdout().lock(), &report)?;
        if let Some(id) = &report.halted {
            eprintln!("Breakpoint {} - press Enter to continue", id);
        }

        while stdin_open {
            let line = match commands.try_recv() {
                Ok(line) => line,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    stdin_open = false;
                    break;
                }
            };
            let Some(cmd) = ConsoleCommand::parse(&line) else {
                warn!("unknown command {:?}", line.trim());
                continue;
            };
            match session.apply(cmd) {
                Ok(CommandOutcome::Continue) => {}
                Ok(CommandOutcome::Show(snapshot)) => {
                    writeln!(std::io::stdout().lock(), "{}", serde_json::to_string(&snapshot)?)?
                }
                Ok(CommandOutcome::Quit) => return Ok(()),
                Err(e) => warn!("{}", e),
            }
        }
        std::thread::sleep(interval);
    }
}

/// Read stdin on its own thread so the tick loop never blocks on the console.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn replay(capture: &Utf8Path, chunk_size: usize, config: DebuggerConfig) -> Result<()> {
    let transport = ReplayTransport::from_file(capture, chunk_size)?;
    let mut session = DebugSession::with_transport(transport, config);
    while session.transport().is_some_and(|t| !t.is_exhausted()) {
        emit(&mut std::io::stdout().lock(), &session.tick())?;
    }

    let acknowledgements = session
        .transport()
        .map(|t| t.written().len() / ACK.len())
        .unwrap_or(0);
    let summary = serde_json::json!({
        "series": session.snapshot(),
        "breakpoint": session.breakpoint_state(),
        "acknowledgements": acknowledgements,
    });
    let json = serde_json::to_string_pretty(&summary)
        .with_context(|| format!("Failed to summarize {}", capture))?;
    writeln!(std::io::stdout().lock(), "{}", json)?;
    Ok(())
}

fn emit(out: &mut impl Write, report: &TickReport) -> Result<()> {
    if !report.is_quiet() {
        writeln!(out, "{}", serde_json::to_string(report)?)?;
    }
    Ok(())
}
