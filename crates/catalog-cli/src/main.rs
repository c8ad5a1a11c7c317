//! `asset-catalog` command-line entry point
//!
//! Exit status is 0 on a clean run, 2 when a locale failed or a document has
//! naming violations, and 1 on any other error.

use anyhow::{Context, Result};
use catalog_cli::commands::{self, ReconcileOptions};
use catalog_cli::output;
use catalog_document::SegmentPolicy;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn cli() -> Command {
    let config_arg = Arg::new("config")
        .long("config")
        .short('c')
        .value_parser(value_parser!(PathBuf))
        .help("TOML configuration file");
    let output_arg = Arg::new("output")
        .long("output")
        .short('o')
        .value_parser(value_parser!(PathBuf))
        .help("Directory for result files");

    Command::new("asset-catalog")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reconcile content-bundle asset references against storage listings")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("reconcile")
                .about("Reconcile every locale of a container directory")
                .arg(
                    Arg::new("root")
                        .long("root")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory mirroring the blob container"),
                )
                .arg(config_arg.clone())
                .arg(output_arg.clone().default_value("results"))
                .arg(
                    Arg::new("mount")
                        .long("mount")
                        .help("Prefix prepended to listed paths, e.g. /content"),
                )
                .arg(
                    Arg::new("max-concurrent")
                        .long("max-concurrent")
                        .value_parser(value_parser!(usize))
                        .help("Maximum locales processed at once"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the report as JSON"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check one document against the naming convention")
                .arg(
                    Arg::new("document")
                        .long("document")
                        .short('d')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Content bundle (JSON or YAML)"),
                )
                .arg(config_arg.clone())
                .arg(output_arg.clone())
                .arg(
                    Arg::new("policy")
                        .long("policy")
                        .value_parser(["verbatim", "depluralize"])
                        .help("How section names become path segments"),
                ),
        )
        .subcommand(
            Command::new("compare")
                .about("Reconcile one document against a listing file")
                .arg(
                    Arg::new("references")
                        .long("references")
                        .short('r')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Content bundle (JSON or YAML)"),
                )
                .arg(
                    Arg::new("listing")
                        .long("listing")
                        .short('l')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Listed object paths, one per line"),
                )
                .arg(config_arg)
                .arg(output_arg),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("reconcile", args)) => reconcile(args).await,
        Some(("validate", args)) => validate(args),
        Some(("compare", args)) => compare(args),
        _ => Ok(ExitCode::FAILURE),
    }
}

async fn reconcile(args: &ArgMatches) -> Result<ExitCode> {
    let options = ReconcileOptions {
        config: args.get_one::<PathBuf>("config").cloned(),
        root: args
            .get_one::<PathBuf>("root")
            .cloned()
            .context("--root is required")?,
        mount: args.get_one::<String>("mount").cloned(),
        max_concurrent: args.get_one::<usize>("max-concurrent").copied(),
    };
    let report = commands::reconcile(&options).await?;

    if let Some(dir) = args.get_one::<PathBuf>("output") {
        output::write_report(dir, &report)?;
    }

    if args.get_flag("json") {
        println!("{}", report.to_json_pretty()?);
    } else {
        for (locale, result) in &report.locales {
            println!(
                "{locale}: {} common, {} missing, {} orphaned, {} violations",
                result.result.common.len(),
                result.result.missing.len(),
                result.result.orphaned.len(),
                result.violations.len()
            );
        }
        for (locale, failure) in &report.failures {
            println!("{locale}: FAILED ({}) {}", failure.kind, failure.message);
        }
        println!("{} paths unused by every locale", report.globally_unused.len());
    }

    Ok(ExitCode::from(commands::exit_status(
        report.failures.len(),
        report.violation_count(),
    )))
}

fn validate(args: &ArgMatches) -> Result<ExitCode> {
    let config_path = args.get_one::<PathBuf>("config").map(PathBuf::as_path);
    let config = commands::load_config(config_path)?;
    let document = args
        .get_one::<PathBuf>("document")
        .context("--document is required")?;
    let policy = args
        .get_one::<String>("policy")
        .map(|policy| match policy.as_str() {
            "depluralize" => SegmentPolicy::Depluralize,
            _ => SegmentPolicy::Verbatim,
        });

    let violations = commands::validate(document, &config, policy)?;
    for violation in &violations {
        println!("{violation}");
    }

    if let Some(dir) = args.get_one::<PathBuf>("output") {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let stem = document
            .file_stem()
            .map_or_else(|| "document".into(), |stem| stem.to_string_lossy());
        output::write_violations(dir, &stem, &violations)?;
    }

    println!("{} violations", violations.len());
    Ok(ExitCode::from(commands::exit_status(0, violations.len())))
}

fn compare(args: &ArgMatches) -> Result<ExitCode> {
    let config_path = args.get_one::<PathBuf>("config").map(PathBuf::as_path);
    let config = commands::load_config(config_path)?;
    let references = args
        .get_one::<PathBuf>("references")
        .context("--references is required")?;
    let listing = args
        .get_one::<PathBuf>("listing")
        .context("--listing is required")?;

    let comparison = commands::compare(references, listing, &config)?;
    let result = &comparison.result;
    println!(
        "{}: {} common, {} missing, {} orphaned, {} violations",
        comparison.stem,
        result.common.len(),
        result.missing.len(),
        result.orphaned.len(),
        comparison.violations.len()
    );
    for duplicate in &comparison.duplicate_references {
        println!("duplicate reference: {duplicate}");
    }
    for duplicate in &comparison.duplicate_listing {
        println!("duplicate listing entry: {duplicate}");
    }

    if let Some(dir) = args.get_one::<PathBuf>("output") {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        output::write_result(dir, &comparison.stem, result)?;
        output::write_violations(dir, &comparison.stem, &comparison.violations)?;
    }

    Ok(ExitCode::from(commands::exit_status(
        0,
        comparison.violations.len(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn parses_reconcile_arguments() {
        let matches = cli()
            .try_get_matches_from([
                "asset-catalog",
                "reconcile",
                "--root",
                "container",
                "--mount",
                "/content",
            ])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "reconcile");
        assert_eq!(args.get_one::<PathBuf>("output"), Some(&PathBuf::from("results")));
        assert_eq!(args.get_one::<String>("mount").map(String::as_str), Some("/content"));
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(cli()
            .try_get_matches_from([
                "asset-catalog",
                "validate",
                "-d",
                "a.json",
                "--policy",
                "plural",
            ])
            .is_err());
    }
}
