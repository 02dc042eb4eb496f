#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use std::io;

use tracing_subscriber::EnvFilter;

mod board_display;
mod repl;

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    repl::repl()
}
