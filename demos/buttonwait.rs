//! Block on a single falling-edge event from a button line.

use periphio::gpio::{Chip, EdgeDetect, EdgeKind};
use quicli::prelude::*;
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

    let mut events = chip
        .line(args.line)
        .request_events("buttonwait", EdgeDetect::Falling)?;

    println!("Press button within 5 seconds");
    match events.wait(Some(Duration::from_secs(5)))? {
        None => println!("Timed out"),
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
