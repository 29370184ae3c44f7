//! Sign demo
//!
//! Sends a short set of pages showing off layout options.
//!
//! Usage:
//!   cargo run --example demo -- [PORT]
//!
//! PORT defaults to /dev/ttyS0.

use polysign_core::prelude::*;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyS0".to_string());

    if let Err(e) = run(&port) {
        eprintln!("demo failed: {}", e);
        std::process::exit(1);
    }
}

fn run(port: &str) -> Result<(), SignError> {
    let mut sign = Sign::open(port, SignConfig::default())?;

    // Two centered lines with a specific duration
    sign.page(&PageRequest::two_lines("HELLO", "WORLD").with_options(PageOptions {
        center: true,
        duration: 4,
        ..Default::default()
    }))?;

    // The sign's own clock
    sign.page(&PageRequest::new(PageLine::Time).with_options(PageOptions {
        center: true,
        ..Default::default()
    }))?;

    sign.page(&PageRequest::new("PING PONG").with_options(PageOptions {
        transition: Transition::PingPong,
        ..Default::default()
    }))?;

    let bold = format!("THIS IS {}BOLD{}", Markup::Bold, Markup::Default);
    let flashing = format!("THIS IS {}FLASHING", Markup::Flash);
    sign.page(&PageRequest::two_lines(bold, flashing))?;

    // Without `last` the sign waits about 40 seconds before showing the set
    sign.page(&PageRequest::two_lines("THE", "END.").with_options(PageOptions {
        last: true,
        ..Default::default()
    }))?;

    Ok(())
}
