//! ELIZA application binary - composition root.
//!
//! 1. Parse CLI arguments and load the TOML configuration
//! 2. Initialize tracing (stderr, so the conversation stays readable)
//! 3. Load the verb table and filler responses; failure is fatal
//! 4. Build the controller, attach the terminal view, greet once
//! 5. Run the input loop until `/quit` or end of input

mod cli;
mod shell;

use std::io;

use clap::Parser;
use eliza_chat::{ConversationController, SearchStrategy};
use eliza_core::{ElizaConfig, ResponseData};

use cli::CliArgs;
use shell::{Shell, TerminalView};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing exists; its outcome is logged below.
    let config_file = args.resolve_config_path();
    let loaded = ElizaConfig::load(&config_file);

    let config_level = loaded
        .as_ref()
        .map(|c| c.general.log_level.clone())
        .unwrap_or_else(|_| ElizaConfig::default().general.log_level);
    let log_level = args.resolve_log_level(&config_level);

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_writer(io::stderr)
        .init();

    tracing::info!("Starting ELIZA v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                path = %config_file.display(),
                error = %e,
                "Config not loaded, using defaults"
            );
            ElizaConfig::default()
        }
    };
    if let Some(dir) = args.resolve_data_dir() {
        config.data.data_dir = dir;
    }
    let seed = args.resolve_seed(config.general.seed);

    let default_strategy = match config.search.default_strategy.parse::<SearchStrategy>() {
        Ok(strategy) => strategy,
        Err(e) => {
            tracing::warn!(error = %e, "Falling back to substring search");
            SearchStrategy::Substring
        }
    };

    // Response data. ELIZA cannot talk without it.
    let data = match ResponseData::load(&config.data) {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(data_dir = %config.data.data_dir, error = %e, "Failed to load response data");
            eprintln!("eliza: cannot load response data: {}", e);
            eprintln!("Try: eliza --data-dir <directory containing verbs.json and random.json>");
            std::process::exit(1);
        }
    };

    let mut controller = match ConversationController::from_response_data(data, seed) {
        Ok(controller) => controller,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build the conversation engine");
            eprintln!("eliza: {}", e);
            std::process::exit(1);
        }
    };

    // The view subscribes first so it sees the greeting.
    let view = TerminalView::new(controller.subscribe());
    controller.greet();

    let mut shell = Shell::new(controller, view, default_strategy);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    shell.run(stdin.lock(), &mut stdout)?;

    Ok(())
}
