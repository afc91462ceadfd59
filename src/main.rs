//! MU/TH/UR 6000 - retro terminal dashboard for Home Assistant
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use muthur_app::config::{default_dashboard_path, load_dashboard, stub_to_toml, Dashboard};
use muthur_app::CardRegistry;
use muthur_core::prelude::*;
use muthur_tui::RunOptions;

/// MU/TH/UR 6000 - terminal dashboard for Home Assistant
#[derive(Parser, Debug)]
#[command(name = "muthur", version)]
#[command(about = "A retro terminal dashboard for Home Assistant", long_about = None)]
struct Args {
    /// Dashboard file [default: <config dir>/muthur/dashboard.toml]
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Validate the dashboard file and exit
    #[arg(long)]
    check: bool,

    /// List the available card types and exit
    #[arg(long, conflicts_with_all = ["check", "print_stub"])]
    list_cards: bool,

    /// Print a starter TOML block for a card type and exit
    #[arg(long, value_name = "TYPE")]
    print_stub: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;
    muthur_core::logging::init()?;

    let registry = CardRegistry::builtin();

    if args.list_cards {
        for card in registry.iter() {
            println!("{:<22} {:<28} {}", card.type_id, card.display_name, card.description);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(type_id) = args.print_stub {
        let Some(card) = registry.get(&type_id) else {
            eprintln!("Unknown card type: {type_id}");
            eprintln!("Run `muthur --list-cards` for the available types.");
            return Ok(ExitCode::FAILURE);
        };
        println!("{}", stub_to_toml(&card.stub_config())?);
        return Ok(ExitCode::SUCCESS);
    }

    let Some(path) = args.config.or_else(default_dashboard_path) else {
        eprintln!("No dashboard file given and no config directory found.");
        eprintln!("Pass one with --config <FILE>.");
        return Ok(ExitCode::FAILURE);
    };

    let dashboard = match load_dashboard(&path, &registry) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            tracing::error!("Dashboard {} rejected: {}", path.display(), e);
            eprintln!("Cannot load {}: {}", path.display(), e);
            return Ok(ExitCode::FAILURE);
        }
    };

    if args.check {
        println!("{}: {}", path.display(), summary(&dashboard));
        return Ok(ExitCode::SUCCESS);
    }

    muthur_tui::run(RunOptions {
        dashboard,
        config_path: Some(path),
    })
    .await?;
    Ok(ExitCode::SUCCESS)
}

fn summary(dashboard: &Dashboard) -> String {
    let cards: usize = dashboard.views.iter().map(|view| view.cards.len()).sum();
    format!("OK, {} views, {} cards", dashboard.views.len(), cards)
}
