//! MageDuel - Client-Simulated Spell Combat Core
//!
//! Runs scripted combat scenarios headless and dumps the combat log.

use mageduel::cli;
use mageduel::headless::{run_scenario, ScenarioConfig};

fn main() {
    let args = cli::parse_args();

    let mut config = match &args.scenario {
        Some(path) => match ScenarioConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => ScenarioConfig::demo(),
    };

    if let Some(output) = &args.output {
        config.output_path = Some(output.display().to_string());
    }
    if args.seed.is_some() {
        config.random_seed = args.seed;
    }

    if let Err(e) = run_scenario(config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
