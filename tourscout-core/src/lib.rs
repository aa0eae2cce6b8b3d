pub mod data;
pub mod report;
pub mod scrape;

use colored::Colorize;

pub fn print_banner() {
    println!(
        "{}",
        r"
  _                                      _
 | |_ ___  _   _ _ __ ___  ___ ___  _   _| |_
 | __/ _ \| | | | '__/ __|/ __/ _ \| | | | __|
 | || (_) | |_| | |  \__ \ (_| (_) | |_| | |_
  \__\___/ \__,_|_|  |___/\___\___/ \__,_|\__|
"
        .bright_green()
        .bold()
    );
    println!(
        "  {} {}\n",
        "tourism portal scraper".bright_white(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
}
