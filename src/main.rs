//! Command-line front end: loads locale files from a directory and resolves
//! keys or reports coverage.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{
    Args,
    Parser,
    Subcommand,
};
use locale_engine::config;
use locale_engine::{
    LocaleCode,
    Localizer,
};
use tracing_subscriber::EnvFilter;

/// Resolve translation keys from JSON / JSONC locale files
#[derive(Parser, Debug)]
#[command(name = "locale-engine")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Command,

    /// Directory containing `.locale-engine.json` (defaults to --dir)
    #[arg(long, global = true, env = "LOCALE_ENGINE_CONFIG")]
    config: Option<PathBuf>,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Print `key = value` for each key
    Resolve(ResolveArgs),
    /// Print keys missing from each locale relative to a reference locale
    Coverage(CoverageArgs),
}

/// Arguments of `resolve`.
#[derive(Args, Debug)]
struct ResolveArgs {
    /// Directory to load locale files from
    #[arg(long)]
    dir: PathBuf,

    /// Locale to activate before resolving
    #[arg(long)]
    locale: Option<String>,

    /// Keys to resolve
    #[arg(required = true)]
    keys: Vec<String>,
}

/// Arguments of `coverage`.
#[derive(Args, Debug)]
struct CoverageArgs {
    /// Directory to load locale files from
    #[arg(long)]
    dir: PathBuf,

    /// Locale whose keys every other locale should have
    #[arg(long)]
    reference: String,
}

/// Installs logging, then runs the parsed command.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err}");
            let _ = writeln!(std::io::stderr(), "error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the selected subcommand.
fn run(cli: Cli) -> locale_engine::Result<ExitCode> {
    match cli.command {
        Command::Resolve(args) => {
            let localizer = build_localizer(cli.config, &args.dir)?;
            if let Some(locale) = args.locale {
                localizer.set_active_locale(locale)?;
            }

            let mut out = std::io::stdout().lock();
            for key in &args.keys {
                let value = localizer.resolve(key, None)?;
                writeln!(out, "{key} = {value}")?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Coverage(args) => {
            let localizer = build_localizer(cli.config, &args.dir)?;
            let reference = LocaleCode::from(args.reference);

            let mut out = std::io::stdout().lock();
            let Some(report) = localizer.coverage(&reference) else {
                writeln!(std::io::stderr(), "error: locale '{reference}' is not loaded")?;
                return Ok(ExitCode::FAILURE);
            };

            writeln!(out, "reference {} ({} keys)", report.reference, report.total_keys)?;
            for coverage in &report.locales {
                writeln!(
                    out,
                    "{}: {} missing, {} extra",
                    coverage.locale,
                    coverage.missing.len(),
                    coverage.extra.len()
                )?;
                for key in &coverage.missing {
                    writeln!(out, "  - {key}")?;
                }
            }

            let complete = report.incomplete().next().is_none();
            Ok(if complete { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

/// Loads settings and every resource file under `dir`.
fn build_localizer(
    config_root: Option<PathBuf>,
    dir: &std::path::Path,
) -> locale_engine::Result<Localizer> {
    let config_root = config_root.unwrap_or_else(|| dir.to_path_buf());
    let settings = config::load_settings(&config_root)?;

    let localizer = Localizer::new(settings)?;
    let locales = localizer.load_dir(dir)?;
    tracing::debug!(?locales, "Loaded locales");
    Ok(localizer)
}
