//! CLI argument parsing and validation module
//!
//! Handles command-line interface using clap, including:
//! - Input file selection and the extension override
//! - Configuration file loading
//! - ESSID filtering options
//! - Output format selection (human/JSON)
//! - Verbosity and quiet modes

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgAction, Command};
use log::LevelFilter;
use std::path::PathBuf;

use netxml::config::Configuration;
use netxml::constants::APP_NAME;
use netxml::filters::validate_essid_filters;

/// Everything `main` needs for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    /// File configuration with command-line overrides applied
    pub config: Configuration,
    pub log_level: LevelFilter,
}

fn command() -> Command {
    Command::new(APP_NAME)
        .version(concat!(env!("NETXML_VERSION"), " (", env!("GIT_HASH"), ")"))
        .about("Parse NetXML wireless survey captures")
        .long_about("Reads a Kismet or airodump-ng NetXML capture and lists the discovered networks, their clients and inferred encryption.")
        .arg(
            Arg::new("netxml_file")
                .value_name("NETXML_FILE")
                .help("Target NetXML file (e.g. Kismet-20150505-05-15-05-1.netxml)")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true)
        )
        .arg(
            Arg::new("json")
                .short('j')
                .long("json")
                .help("Output in JSON format")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("essid")
                .short('e')
                .long("essid")
                .value_name("PATTERN")
                .help("Only list networks whose ESSID matches (exact, or glob with * ? [)")
                .action(ArgAction::Append)
        )
        .arg(
            Arg::new("no_clients")
                .long("no-clients")
                .help("Do not list clients")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("force")
                .short('f')
                .long("force")
                .help("Parse the file even without a .netxml extension")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Configuration file (defaults to <config dir>/netxml/config.toml when present)")
                .value_parser(clap::value_parser!(PathBuf))
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log output (-v info, -vv debug)")
                .action(ArgAction::Count)
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
        )
}

fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Parse command line arguments and return configuration
pub fn parse_args() -> Result<RunConfig> {
    let matches = command().get_matches();

    let input = matches
        .get_one::<PathBuf>("netxml_file")
        .cloned()
        .ok_or_else(|| anyhow!("No NetXML file given"))?;
    if !input.exists() {
        return Err(anyhow!("Path does not exist: {}", input.display()));
    }

    let config_path = matches.get_one::<PathBuf>("config");
    let mut config = Configuration::load(config_path.map(PathBuf::as_path))
        .context("Failed to load configuration")?;

    // Command-line flags win over the configuration file
    if matches.get_flag("json") {
        config.output.json = true;
    }
    if matches.get_flag("no_clients") {
        config.output.include_clients = false;
    }
    if matches.get_flag("force") {
        config.parser.require_extension = false;
    }
    if let Some(filters) = matches.get_many::<String>("essid") {
        config.output.essid_filters = filters.cloned().collect();
        validate_essid_filters(&config.output.essid_filters)?;
    }

    Ok(RunConfig {
        input,
        config,
        log_level: log_level(matches.get_count("verbose"), matches.get_flag("quiet")),
    })
}
