use anyhow::{Context, Result};
use clap::{app_from_crate, crate_authors, crate_description, crate_name, crate_version, Arg};
use log::info;
use std::fs;

use tripmap::sources::gpx::strip_tracks_and_routes;

const INPUT_ARG: &str = "input";
const OUTPUT_ARG: &str = "output";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = app_from_crate!()
        .about("Remove all tracks and routes from a GPX file, keeping its waypoints")
        .arg(
            Arg::with_name(INPUT_ARG)
                .help("The GPX file to read")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name(OUTPUT_ARG)
                .help("Where to write the result, stdout if not given")
                .index(2),
        )
        .get_matches();

    let input = matches
        .value_of(INPUT_ARG)
        .context("missing input file")?;
    let xml = fs::read_to_string(input).with_context(|| format!("failed reading {}", input))?;

    let stripped = strip_tracks_and_routes(&xml)
        .with_context(|| format!("failed parsing {}", input))?;

    match matches.value_of(OUTPUT_ARG) {
        Some(output) => {
            fs::write(output, stripped).with_context(|| format!("failed writing {}", output))?;
            info!("wrote waypoints of {} to {}", input, output);
        }
        None => print!("{}", stripped),
    }

    Ok(())
}
