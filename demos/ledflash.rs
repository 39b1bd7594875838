//! PWM flashing LED: ramp the duty cycle up and down to fade the LED.

use periphio::pwm::PwmChannel;
use quicli::prelude::*;
use std::thread::sleep;
use std::time::Duration;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Cli {
    /// PWM chip number (/sys/class/pwm/pwmchipN)
    #[structopt(long, default_value = "0")]
    chip: u32,
    /// PWM channel on the chip (pwmchipN/pwmM)
    #[structopt(long, default_value = "0")]
    pwm: u32,
}

fn change_brightness(
    pwm: &PwmChannel,
    period_ns: u64,
    start_duty: i64,
    duty_step: i64,
    count: u32,
    pause: Duration,
) -> periphio::Result<()> {
    pwm.set_period(period_ns)?;
    let mut duty = start_duty;
    for _ in 0..count {
        pwm.set_duty_cycle(duty.max(0) as u64)?;
        sleep(pause);
        duty += duty_step;
    }
    Ok(())
}

fn do_main(args: Cli) -> periphio::Result<()> {
    let pwm = PwmChannel::export(args.chip, args.pwm)?;
    let result = run_ramp(&pwm);
    // Leave the channel quiet and released whatever the ramp did
    let _ = pwm.set_duty_cycle(0);
    let _ = pwm.disable();
    let cleanup = pwm.unexport();
    result.and(cleanup)
}

fn run_ramp(pwm: &PwmChannel) -> periphio::Result<()> {
    pwm.enable()?;
    let pause = Duration::from_millis(5);
    for _ in 0..10 {
        change_brightness(pwm, 1000, 0, 10, 100, pause)?;
        change_brightness(pwm, 1000, 1000, -10, 100, pause)?;
    }
    Ok(())
}

fn main() -> CliResult {
    let args = Cli::from_args();
    do_main(args).or_else(|e| {
        error!("{:?}", e);
        Ok(())
    })
}
