use clap::{CommandFactory, Parser, Subcommand};
use countrystat::cli::{describe_failure, setup::setup, ui};
use countrystat::core::catalog::{ListQuery, SortOrder};
use countrystat::core::log::init_logging;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for countrystat::AppCommand {
    fn from(cmd: Commands) -> countrystat::AppCommand {
        match cmd {
            Commands::Refresh => countrystat::AppCommand::Refresh,
            Commands::List { region, sort } => countrystat::AppCommand::List(ListQuery {
                region,
                sort: sort.unwrap_or_default(),
            }),
            Commands::Show { name } => countrystat::AppCommand::Show(name),
            Commands::Delete { name } => countrystat::AppCommand::Delete(name),
            Commands::Status => countrystat::AppCommand::Status,
            Commands::Image => countrystat::AppCommand::Image,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch both feeds and refresh the stored countries
    Refresh,
    /// List stored countries
    List {
        /// Only countries in this region (case-insensitive)
        #[arg(short, long)]
        region: Option<String>,
        /// Sort order: `name` or `gdp_desc`
        #[arg(short, long)]
        sort: Option<SortOrder>,
    },
    /// Show one country by name (case-insensitive)
    Show { name: String },
    /// Delete one country by name (case-insensitive)
    Delete { name: String },
    /// Display the last refresh status
    Status,
    /// Print the path of the summary image
    Image,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => countrystat::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => Cli::command().print_help().map_err(Into::into),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Application failed");
            let (message, code) = describe_failure(&e);
            eprintln!("{}", ui::style_text(&message, ui::StyleType::Error));
            ExitCode::from(code as u8)
        }
    }
}
