use std::process::exit;

use colored::Colorize;

fn main() {
    if let Err(e) = picsum_gallery::app::run_cli() {
        eprintln!("{} {}", "error:".red().bold(), e);
        exit(1);
    }
}
