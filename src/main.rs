mod cli;
mod config;
mod hooks;
mod paths;
mod switch;

use std::process;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
