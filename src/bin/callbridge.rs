//! CLI wrapper that replays envelopes through a bridge.
//!
//! Usage:
//!   callbridge <file.jsonl>                  # Dispatch each line fire-and-forget
//!   callbridge --sync <file.jsonl>           # Dispatch as request/reply, print replies
//!   callbridge --config <bridge.toml> ...    # Load bridge configuration
//!   callbridge -                             # Read envelopes from stdin
//!
//! Outbound envelopes produced while dispatching (callback replies, scheduled
//! calls) are written to stdout, diagnostics to stderr.

use callbridge::bridge::{Bridge, BridgeConfig};
use callbridge::std_lib::FunctionScheduler;
use callbridge::transport::{Inbound, Transport, TransportError};
use std::env;
use std::fs;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

struct StdoutTransport;

impl Transport for StdoutTransport {
    fn print(&self, text: &str) {
        eprintln!("{}", text);
    }

    fn send_raw(&self, text: &str) -> Result<(), TransportError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{}", text)?;
        out.flush()?;
        Ok(())
    }

    fn send_raw_and_wait(&self, _text: &str) -> Result<String, TransportError> {
        Err(TransportError::Unsupported("request/reply to the replay source"))
    }
}

struct Options {
    config: Option<String>,
    sync: bool,
    input: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let options = match parse_args(env::args().skip(1).collect()) {
        Some(options) => options,
        None => {
            print_usage();
            process::exit(1);
        }
    };

    let config = match &options.config {
        Some(path) => match BridgeConfig::load(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => BridgeConfig::default(),
    };

    let bridge = match Bridge::new(config, Arc::new(StdoutTransport)) {
        Ok(bridge) => bridge,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let scheduler = match FunctionScheduler::install(&bridge) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let reader: Box<dyn Read> = if options.input == "-" {
        Box::new(io::stdin())
    } else {
        match fs::File::open(&options.input) {
            Ok(file) => Box::new(file),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", options.input, e);
                process::exit(1);
            }
        }
    };

    let mut failures = 0;
    for (number, line) in BufReader::new(reader).lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                process::exit(1);
            }
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let outcome = if options.sync {
            bridge.on_request(line).map(|reply| println!("{}", reply))
        } else {
            bridge.on_message(line)
        };
        if let Err(e) = outcome {
            eprintln!("line {}: {}", number + 1, e);
            failures += 1;
        }
    }

    // Let scheduled calls fall due before exiting.
    while let Some(due) = scheduler.next_due() {
        let now = Instant::now();
        if due > now {
            thread::sleep(due - now);
        }
        scheduler.perform_calls_before(Instant::now() + Duration::from_millis(1));
    }

    if failures > 0 {
        process::exit(1);
    }
}

fn parse_args(args: Vec<String>) -> Option<Options> {
    let mut config = None;
    let mut sync = false;
    let mut input = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            "--sync" => sync = true,
            "--config" => config = Some(iter.next()?),
            _ if input.is_none() => input = Some(arg),
            _ => return None,
        }
    }

    Some(Options {
        config,
        sync,
        input: input?,
    })
}

fn print_usage() {
    eprintln!("callbridge - replay envelopes through a bridge");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  callbridge <file.jsonl>                Dispatch each line fire-and-forget");
    eprintln!("  callbridge --sync <file.jsonl>         Dispatch as request/reply, print replies");
    eprintln!("  callbridge --config <bridge.toml> ...  Load bridge configuration");
    eprintln!("  callbridge -                           Read envelopes from stdin");
}
