use commands::command_argument_builder;
use tourscout::handlers::{
    handle_content, handle_init, handle_scrape, handle_serve, handle_source_add,
    handle_source_list, handle_source_toggle,
};
use tourscout_core::print_banner;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_tracing(quiet);

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        None => return,
        Some(("init", primary_command)) => handle_init(primary_command),
        Some(("source", primary_command)) => match primary_command.subcommand() {
            Some(("add", secondary_command)) => handle_source_add(secondary_command),
            Some(("list", secondary_command)) => handle_source_list(secondary_command),
            Some(("enable", secondary_command)) => handle_source_toggle(secondary_command, true),
            Some(("disable", secondary_command)) => handle_source_toggle(secondary_command, false),
            _ => unreachable!("clap should ensure we don't get here"),
        },
        Some(("scrape", primary_command)) => handle_scrape(primary_command).await,
        Some(("content", primary_command)) => handle_content(primary_command),
        Some(("serve", primary_command)) => handle_serve(primary_command).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise `info`, or `warn` with `--quiet`.
fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
