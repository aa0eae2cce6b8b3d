use crate::CLAP_STYLING;
use clap::{arg, command};
use std::net::SocketAddr;

use tourscout::DEFAULT_DB_DIR;

const CATEGORIES: [&str; 7] = [
    "tourism_info",
    "facility",
    "attraction",
    "general",
    "registered_service",
    "heritage",
    "environmental",
];

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("tourscout")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("tourscout")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(--"db" <PATH>)
                .required(false)
                .global(true)
                .help("Directory holding the tourscout database")
                .default_value(DEFAULT_DB_DIR),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Initializes the tourscout database on your filesystem")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Location to store the tourscout database (overrides --db)"),
                )
                .arg(
                    arg!(-f - -"force")
                        .help(
                            "Forces the overwriting of any existing database at the specified \
                        location.",
                        )
                        .required(false),
                ),
        )
        .subcommand(
            command!("source")
                .about("Manage the registry of tourism sites to scrape")
                .subcommand_required(true)
                .subcommand(
                    command!("add")
                        .about("Registers a new source")
                        .arg(
                            arg!(-n --"name" <NAME>)
                                .required(true)
                                .help("Display name of the site"),
                        )
                        .arg(
                            arg!(-u --"url" <URL>)
                                .required(true)
                                .help("Absolute http(s) URL of the page to scrape"),
                        )
                        .arg(
                            arg!(-t --"type" <TYPE>)
                                .required(false)
                                .help(
                                    "Site type: official, government, registration, \
                                environmental, heritage (anything else is scraped generically)",
                                )
                                .default_value("official"),
                        )
                        .arg(
                            arg!(--"inactive")
                                .required(false)
                                .help("Register the source without scheduling it for scrapes")
                                .action(clap::ArgAction::SetTrue),
                        ),
                )
                .subcommand(command!("list").about("List all registered sources"))
                .subcommand(
                    command!("enable").about("Marks a source as active").arg(
                        arg!(-i --"id" <ID>)
                            .required(true)
                            .help("The id of the source"),
                    ),
                )
                .subcommand(
                    command!("disable").about("Marks a source as inactive").arg(
                        arg!(-i --"id" <ID>)
                            .required(true)
                            .help("The id of the source"),
                    ),
                ),
        )
        .subcommand(
            command!("scrape")
                .about("Scrape every active source once and store the extracted content")
                .arg(
                    arg!(--"delay-ms" <MILLIS>)
                        .required(false)
                        .help("Pause between consecutive sources in milliseconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("2000"),
                ),
        )
        .subcommand(
            command!("content")
                .about("Show the most recently scraped content")
                .arg(
                    arg!(-c --"category" <CATEGORY>)
                        .required(false)
                        .help("Only show content of this category")
                        .value_parser(CATEGORIES),
                )
                .arg(
                    arg!(-s --"search" <TERM>)
                        .required(false)
                        .help("Only show content whose title or description contains TERM"),
                )
                .arg(
                    arg!(-l --"limit" <NUM>)
                        .required(false)
                        .help("Maximum number of items to show")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("20"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("serve")
                .about("Serve the scrape trigger over HTTP")
                .arg(
                    arg!(-b --"bind" <ADDR>)
                        .required(false)
                        .help("Address to bind the HTTP server to (host:port)")
                        .value_parser(clap::value_parser!(SocketAddr))
                        .default_value("127.0.0.1:8080"),
                )
                .arg(
                    arg!(--"delay-ms" <MILLIS>)
                        .required(false)
                        .help("Pause between consecutive sources in milliseconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("2000"),
                ),
        )
}
