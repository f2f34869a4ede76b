use anyhow::Result;
use clap::Parser;
use gesturecam::config::SourceKind;
use gesturecam::{GesturecamConfig, GesturecamOrchestrator, RunOptions};
use std::path::Path;
use tracing::{error, info};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};

#[derive(Parser, Debug)]
#[command(name = "gesturecam")]
#[command(about = "Hand gesture recognition that drives home automation commands")]
#[command(version)]
#[command(long_about = "Reads hand landmarks from a detector process or a replay file, \
classifies finger positions into gestures and publishes the mapped command to an MQTT \
topic whenever it changes.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "gesturecam.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit without starting the system")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Dry run mode - open source and broker but don't process frames
    #[arg(long, help = "Perform dry run - initialize components but don't start them")]
    dry_run: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH", help = "Append log output to a file")]
    log_file: Option<String>,

    /// Replay landmark frames from a JSON lines file instead of the configured source
    #[arg(long, value_name = "PATH", help = "Replay frames from a JSON lines file")]
    replay: Option<String>,

    /// Log commands instead of publishing them
    #[arg(long, help = "Do not connect to the broker; log commands instead")]
    no_publish: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle special modes that don't require full initialization
    if args.print_config {
        print_default_config()?;
        return Ok(());
    }

    // Held until exit so buffered file logs are flushed
    let log_guard = init_logging(&args)?;

    info!("Starting gesturecam v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    let mut config = match GesturecamConfig::load_from_file(&args.config) {
        Ok(config) => {
            info!("Configuration loaded from: {}", args.config);
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(replay) = &args.replay {
        info!("Replaying frames from {} instead of the configured source", replay);
        config.source.kind = SourceKind::Replay;
        config.source.path = replay.clone();
    }

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("✗ Configuration validation failed: {}", e);
        exit_flushing_logs(log_guard, 1);
    }

    if args.validate_config {
        info!("Configuration validation successful");
        println!("✓ Configuration is valid");
        return Ok(());
    }

    let options = RunOptions {
        no_publish: args.no_publish,
    };

    let mut orchestrator = GesturecamOrchestrator::from_config(config, options)
        .await
        .map_err(|e| {
            error!("Failed to initialize system: {}", e);
            e
        })?;

    if args.dry_run {
        info!("Dry run mode - components initialized but not started");
        println!("✓ Dry run completed successfully - all components initialized");
        return Ok(());
    }

    let outcome = orchestrator.run().await.map_err(|e| {
        error!("System error during execution: {}", e);
        e
    })?;

    info!(
        "Gesturecam exited ({}) with code: {}",
        outcome.reason, outcome.exit_code
    );
    exit_flushing_logs(log_guard, outcome.exit_code);
}

/// Exit the process once buffered file logs are written out
fn exit_flushing_logs(log_guard: Option<WorkerGuard>, exit_code: i32) -> ! {
    drop(log_guard);
    std::process::exit(exit_code);
}

/// Non-blocking writer appending to `path`. Lines are only guaranteed on disk
/// once the guard is dropped.
fn file_log_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid log file path: {}", path.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

fn init_logging(args: &Args) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gesturecam={}", log_level)));

    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_target(true)
                .with_thread_ids(args.debug)
                .with_file(args.debug)
                .with_line_number(args.debug)
                .boxed()
        }
    };

    let (file_layer, guard) = match &args.log_file {
        Some(path) => {
            let (writer, guard) = file_log_writer(Path::new(path))?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(file_layer)
        .with(env_filter)
        .init();

    Ok(guard)
}

/// Print default configuration in TOML format
fn print_default_config() -> Result<()> {
    println!("# Gesturecam Configuration File");
    println!("# This is the default configuration with all available options");
    println!();
    println!("{}", toml::to_string_pretty(&GesturecamConfig::default())?);
    Ok(())
}
