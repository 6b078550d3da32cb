mod args;
mod driver;

use clap::Parser;

fn main() {
    let args = args::Args::parse();
    match driver::run(&args) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    }
}
