//! Binary entry point: parse arguments and hand over to the library. Any
//! database failure surfaces here as an error message and exit status 1.
use clap::Parser;
use islam_companion_reader::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    run(Cli::parse())
}
