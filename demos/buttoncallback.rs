//! Print button edge events from a blocking callback loop.
//!
//! The loop invokes the handler for every event until the timeout elapses;
//! the final invocation receives the timeout indication. Handler failures
//! are contained by the loop instead of unwinding through it.

use periphio::gpio::{watch_line_events, EdgeDetect, EdgeKind, EventAction};
use quicli::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Cli {
    /// GPIO chip device (default /dev/gpiochip1)
    #[structopt(long, default_value = "/dev/gpiochip1", parse(from_os_str))]
    chip: PathBuf,
    /// GPIO line offset (default 3, button on a NanoPi Duo)
    #[structopt(long, default_value = "3")]
    line: u32,
}

fn do_main(args: Cli) -> periphio::Result<()> {
    println!("Press and release button, timeout in 10 seconds\n");
    watch_line_events(
        &args.chip,
        args.line,
        EdgeDetect::Both,
        "buttoncallback",
        Some(Duration::from_secs(10)),
        |event| {
            match event {
                None => println!("Timeout"),
                Some(event) => {
                    let edge = match event.kind() {
                        EdgeKind::Rising => "Rising ",
                        EdgeKind::Falling => "Falling",
                    };
                    println!(
                        "{edge} edge timestamp {}.{:09}",
                        event.timestamp_ns() / 1_000_000_000,
                        event.timestamp_ns() % 1_000_000_000
                    );
                }
            }
            Ok(EventAction::Continue)
        },
    )
}

fn main() -> CliResult {
    let args = Cli::from_args();
    do_main(args).or_else(|e| {
        error!("{:?}", e);
        Ok(())
    })
}
