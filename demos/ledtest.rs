//! Simple LED blink through a GPIO output line.
//!
//! Wire the LED cathode to the line and the anode through a resistor to
//! 3.3 V; the line is then active low, so driving 0 turns the LED on.

use periphio::gpio::Chip;
use quicli::prelude::*;
use std::thread::sleep;
use std::time::Duration;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Cli {
    /// GPIO chip number (/dev/gpiochipN)
    #[structopt(long, default_value = "0")]
    chip: u32,
    /// GPIO line offset (default 203, IOG11 on a NanoPi Duo)
    #[structopt(long, default_value = "203")]
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

    // Request with the initial value already applied: LED on
    let mut led = chip.line(args.line).request_output("ledtest", false)?;
    println!("LED on");
    sleep(Duration::from_secs(3));
    led.set_value(true)?;
    println!("LED off");
    led.release()?;
    Ok(())
}

fn main() -> CliResult {
    let args = Cli::from_args();
    do_main(args).or_else(|e| {
        error!("{:?}", e);
        Ok(())
    })
}
