use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use settings_console::admin::AdminClient;
use settings_console::clipboard::{CommandClipboard, Osc52Surface};
use settings_console::config::loader::{default_config, load_config, with_admin_overrides};
use settings_console::config::ConsoleConfig;
use settings_console::controller::{ReadinessGate, SettingsController};
use settings_console::form::FormState;
use settings_console::i18n::Catalog;
use settings_console::notify::TerminalNotifier;
use settings_console::observability::logging::init_tracing;

type Controller = SettingsController<FormState, AdminClient, CommandClipboard>;

#[derive(Parser)]
#[command(name = "settings-cli")]
#[command(about = "Edit proxy settings through the admin API", long_about = None)]
struct Cli {
    /// Console configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Admin server base URL (overrides the config file)
    #[arg(short, long)]
    url: Option<String>,

    /// Admin API key (overrides the config file)
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the settings a form file would send
    Show {
        #[arg(short, long)]
        form: PathBuf,
    },
    /// Send a form file to the admin API
    Save {
        #[arg(short, long)]
        form: PathBuf,
    },
    /// Generate a client token and write it into the form file
    GenerateToken {
        #[arg(short, long)]
        form: PathBuf,

        /// Also copy the new token to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Copy the form file's client token to the clipboard
    CopyToken {
        #[arg(short, long)]
        form: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => default_config()?,
    };
    let config = with_admin_overrides(config, cli.url, cli.key)?;

    init_tracing(&config.logging.filter);

    match cli.command {
        Commands::Show { form } => {
            let form = FormState::load(&form)?;
            let settings = settings_console::form::collect_form_data(&form)?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Commands::Save { form } => {
            let mut controller = build_controller(&config, &form)?;
            controller.initialize().await?;
            controller.save_settings().await?;
        }
        Commands::GenerateToken { form: path, copy } => {
            let mut controller = build_controller(&config, &path)?;
            controller.initialize().await?;
            controller.generate_client_token().await?;
            controller.form().save(&path)?;
            if copy {
                controller.copy_token_to_clipboard().await?;
            }
        }
        Commands::CopyToken { form } => {
            let mut controller = build_controller(&config, &form)?;
            controller.copy_token_to_clipboard().await?;
        }
    }

    Ok(())
}

fn build_controller(
    config: &ConsoleConfig,
    form_path: &Path,
) -> Result<Controller, Box<dyn std::error::Error>> {
    let form = FormState::load(form_path)?;
    let client = AdminClient::from_config(&config.admin)?;

    let catalog = Catalog::english();
    if let Some(path) = &config.i18n.catalog_path {
        catalog.load_json(&config.i18n.language, Path::new(path))?;
    }
    catalog.set_language(config.i18n.language.clone());

    tracing::info!(
        admin = %client.base_url(),
        language = %config.i18n.language,
        "Settings console configured"
    );

    Ok(SettingsController::new(
        form,
        client,
        CommandClipboard::new(),
        Box::new(Osc52Surface::new(std::io::stdout())),
        Arc::new(TerminalNotifier),
        Arc::new(catalog),
    )
    .with_readiness(ReadinessGate::from_config(&config.readiness)))
}
