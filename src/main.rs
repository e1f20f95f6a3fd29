//! devsetup - Main entry point.
//!
//! Provisions the local editor environment: settings, font and extensions.
//!
//! Usage: devsetup [OPTIONS]
//!
//! Options:
//!   --config <PATH>       Use a specific config file
//!   --log-level <LEVEL>   Override the log file level
//!   --init-config         Write a documented default config file
//!   --version, -v         Show version
//!   --help, -h            Show help

use std::env;
use std::path::PathBuf;
use std::process;

use tracing::{error, warn};

use devsetup::config::Config;
use devsetup::logging::{self, LogConfig};
use devsetup::{
    Backends, EditorCli, FontOutcome, GitHubClient, HttpClient, Provisioner, ProvisionError,
    RunSummary, SystemFontRegistry, TargetPaths,
};

/// Current version of devsetup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "Usage: devsetup [OPTIONS]

Options:
  --config <PATH>       Use a specific config file (default: ~/.devsetuprc or $DEVSETUP_CONFIG)
  --log-level <LEVEL>   Override the log file level (trace, debug, info, warn, error, off)
  --init-config         Write a documented default config file and exit
  --version, -v         Show version
  --help, -h            Show this help";

/// Parsed command-line options.
#[derive(Debug, Default)]
struct Options {
    config_path: Option<PathBuf>,
    log_level: Option<String>,
    init_config: bool,
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "--version" || a == "-v") {
        println!("devsetup v{}", VERSION);
        return;
    }

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return;
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    let config_path = options
        .config_path
        .clone()
        .unwrap_or_else(Config::default_config_path);

    if options.init_config {
        match Config::write_default(&config_path) {
            Ok(true) => println!("Wrote {}", config_path.display()),
            Ok(false) => println!("{} already exists", config_path.display()),
            Err(e) => {
                eprintln!("Error: failed to write {}: {}", config_path.display(), e);
                process::exit(1);
            }
        }
        return;
    }

    let mut config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to read {}: {}", config_path.display(), e);
            process::exit(1);
        }
    };
    if let Some(level) = &options.log_level {
        config.log_config.level = LogConfig::parse_level(level);
    }

    if let Err(e) = logging::init(&config.log_config) {
        warn!("File logging disabled: {}", e);
    }

    match provision(&config) {
        Ok(summary) => {
            print_summary(&summary);
        }
        Err(e) => {
            // Log file only; the console layer shows warnings alone.
            error!("{}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Parses flags other than --help and --version.
fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().ok_or("--config requires a path")?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--log-level" => {
                let value = iter.next().ok_or("--log-level requires a level")?;
                options.log_level = Some(value.clone());
            }
            "--init-config" => options.init_config = true,
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }

    Ok(options)
}

/// Builds the real backends and runs the pipeline.
fn provision(config: &Config) -> Result<RunSummary, ProvisionError> {
    config.validate()?;
    let paths = TargetPaths::resolve(config)?;

    let http = HttpClient::new()?;
    let github = GitHubClient::new(&http, &config.github_api);
    let editor = EditorCli::new(&config.editor_command);
    let fonts = SystemFontRegistry::new();

    let backends = Backends {
        downloader: &http,
        releases: &github,
        host: &editor,
        fonts: &fonts,
    };

    Provisioner::new(config, paths, backends).run()
}

fn print_summary(summary: &RunSummary) {
    eprintln!();
    eprintln!("Settings:   {}", summary.settings_file.display());
    match &summary.font {
        FontOutcome::Installed(path) => eprintln!("Font:       installed {}", path.display()),
        FontOutcome::AlreadyPresent(path) => {
            eprintln!("Font:       already present at {}", path.display());
        }
    }
    match &summary.manifest_extensions {
        Some(ids) => eprintln!("Extensions: {} from manifest", ids.len()),
        None => eprintln!("Extensions: manifest skipped"),
    }
    eprintln!(
        "Packages:   {}",
        if summary.release_extensions.is_empty() {
            "none".to_string()
        } else {
            summary.release_extensions.join(", ")
        }
    );
    eprintln!("Done.");
}
