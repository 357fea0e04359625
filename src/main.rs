#![forbid(unsafe_code)]

mod cli;
mod logging;
mod output;

use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

fn main() -> Result<()> {
    let run = cli::parse_args()?;
    logging::init(run.log_level)?;

    let start_time = Instant::now();
    let options = run.config.parse_options();
    debug!("Parsing {} with {:?}", run.input.display(), options);

    let document = netxml::parse_with_options(&run.input, &options)
        .with_context(|| format!("Failed to parse {}", run.input.display()))?;

    info!(
        "Parsed {} networks and {} clients from {}",
        document.network_count(),
        document.client_count(),
        run.input.display()
    );

    let report = output::build_report(&document, &run.config.output, start_time.elapsed());
    if run.config.output.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", output::format_human(&report));
    }

    Ok(())
}
