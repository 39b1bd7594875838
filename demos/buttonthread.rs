//! Monitor button edge events on a background worker while the main flow
//! keeps running.
//!
//! The worker owns the line handle for the duration of its loop; joining
//! returns the handle so the line is released only after the worker stops.

use periphio::gpio::{Chip, EdgeDetect, EdgeKind, EventAction, EventMonitor};
use quicli::prelude::*;
use std::thread::sleep;
use std::time::Duration;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Cli {
    /// GPIO chip number (/dev/gpiochipN)
    #[structopt(long, default_value = "1")]
    chip: u32,
    /// GPIO line offset (default 3, button on a NanoPi Duo)
    #[structopt(long, default_value = "3")]
    line: u32,
}

fn do_main(args: Cli) -> periphio::Result<()> {
    let chip = Chip::open_by_number(args.chip)?;
    let info = chip.info()?;
    println!(
        "Name: {}, label: {}, lines: {}",
        info.name(),
        info.label(),
        info.num_lines()
    );

    let events = chip
        .line(args.line)
        .request_events("buttonthread", EdgeDetect::Both)?;

    println!("Thread running\n");
    let monitor = EventMonitor::spawn(events, Some(Duration::from_secs(5)), |event| {
        let edge = match event.kind() {
            EdgeKind::Rising => "Rising ",
            EdgeKind::Falling => "Falling",
        };
        println!(
            "{edge} edge timestamp {}.{:09}",
            event.timestamp_ns() / 1_000_000_000,
            event.timestamp_ns() % 1_000_000_000
        );
        EventAction::Continue
    });

    // Simulate the main program doing something else
    let mut count = 0;
    while count < 30 && !monitor.is_finished() {
        println!("Main program doing stuff, press button");
        sleep(Duration::from_secs(1));
        count += 1;
    }

    if !monitor.is_finished() {
        println!("Waiting for thread to exit, stop pressing button for 5 seconds");
    }
    let (events, status) = monitor.join()?;
    println!("Thread exit: {status:?}");
    events.release()?;
    Ok(())
}

fn main() -> CliResult {
    let args = Cli::from_args();
    do_main(args).or_else(|e| {
        error!("{:?}", e);
        Ok(())
    })
}
