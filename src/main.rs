//! tftarget CLI — pick Terraform targets interactively.

use clap::Parser;
use tftarget::cli::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = tftarget::logging::init(cli.verbose) {
        eprintln!("warning: logging disabled: {}", e);
    }
    if let Err(e) = tftarget::cli::dispatch(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
