mod config;
mod render;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;

use featsel::{MissBudget, Strategy, load_dataset, run};

use config::{AppConfig, load_config};

fn cli() -> Command {
    Command::new("featsel-cli")
        .version(clap::crate_version!())
        .about("Wrapper feature selection for a 1-nearest-neighbor classifier")
        .arg(
            Arg::new("data")
                .help("Dataset file: one instance per line, class label first")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("strategy")
                .short('s')
                .long("strategy")
                .help("forward, backward or pruned (1, 2 or 3). Prompts when omitted.")
                .value_parser(clap::value_parser!(Strategy)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("JSON file with `strategy` and `miss_budget` settings")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("miss_budget")
                .long("miss-budget")
                .help("Pruning budget: round-best, unlimited or a number of misses")
                .value_parser(clap::value_parser!(MissBudget)),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the search report as JSON")
                .action(ArgAction::SetTrue),
        )
}

/// Merges the optional config file with command-line overrides.
fn resolve_config(matches: &ArgMatches) -> Result<AppConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(strategy) = matches.get_one::<Strategy>("strategy") {
        config.strategy = Some(*strategy);
    }
    if let Some(budget) = matches.get_one::<MissBudget>("miss_budget") {
        config.search.miss_budget = *budget;
    }
    Ok(config)
}

fn prompt_strategy<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Strategy> {
    writeln!(output, "Type the number of the algorithm you want to run.")?;
    writeln!(output, "\t 1) {}", Strategy::Forward)?;
    writeln!(output, "\t 2) {}", Strategy::Backward)?;
    writeln!(output, "\t 3) {}", Strategy::PrunedForward)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    line.parse::<Strategy>().map_err(anyhow::Error::msg)
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or("FEATSEL_LOG", "warn"))
        .init();

    let matches = cli().get_matches();
    let config = resolve_config(&matches)?;
    let path = matches
        .get_one::<PathBuf>("data")
        .context("A dataset file is required")?;

    let mut dataset = load_dataset(path)
        .with_context(|| format!("Failed to load dataset {}", path.display()))?;

    let strategy = match config.strategy {
        Some(strategy) => strategy,
        None => prompt_strategy(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    println!(
        "This dataset has {} features (not including the class attribute), with {} instances",
        dataset.n_features(),
        dataset.n_instances()
    );
    for (label, count) in dataset.class_counts() {
        println!("\tclass {}: {} instances", label, count);
    }
    println!("\nPlease wait while I normalize the data...\n");
    dataset.normalize().context("Failed to normalize dataset")?;

    log::info!("Running {} (miss budget {})", strategy, config.search.miss_budget);
    let report = run(strategy, &dataset, &config.search)
        .with_context(|| format!("{} failed", strategy))?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::Trace(&report));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        cli().debug_assert();
    }

    #[test]
    fn test_flags_are_parsed() {
        let matches = cli()
            .try_get_matches_from(["featsel-cli", "data.txt", "-s", "2", "--miss-budget", "5"])
            .unwrap();
        let config = resolve_config(&matches).unwrap();
        assert_eq!(config.strategy, Some(Strategy::Backward));
        assert_eq!(config.search.miss_budget, MissBudget::Fixed(5));
        assert!(!matches.get_flag("json"));
    }

    #[test]
    fn test_invalid_strategy_is_rejected() {
        let result = cli().try_get_matches_from(["featsel-cli", "data.txt", "--strategy", "sideways"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_flags_leave_strategy_unset() {
        let matches = cli().try_get_matches_from(["featsel-cli", "data.txt"]).unwrap();
        let config = resolve_config(&matches).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_prompt_strategy() {
        let mut input = "3\n".as_bytes();
        let mut output = Vec::new();
        let strategy = prompt_strategy(&mut input, &mut output).unwrap();
        assert_eq!(strategy, Strategy::PrunedForward);
        let menu = String::from_utf8(output).unwrap();
        assert!(menu.contains("2) Backward Elimination"));
    }

    #[test]
    fn test_prompt_rejects_unknown_choice() {
        let mut input = "9\n".as_bytes();
        let mut output = Vec::new();
        assert!(prompt_strategy(&mut input, &mut output).is_err());
    }
}
