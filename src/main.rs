use clap::Parser;
use sortify::cli::{self, Cli};
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let start = Instant::now();
    let code = match cli::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    };
    println!("\nTime taken: {:.2} seconds", start.elapsed().as_secs_f64());

    code
}
