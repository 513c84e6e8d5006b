use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use usermgmt::cli::{handle_export_command, handle_user_command, ExportArgs, UserCommands};
use usermgmt::config::{paths::UserMgmtPaths, settings::Settings};
use usermgmt::models::User;
use usermgmt::storage::{seed, Repository};

#[derive(Parser)]
#[command(
    name = "usermgmt",
    version,
    about = "User management with an append-only audit trail",
    long_about = "usermgmt keeps a small user directory on disk. Every create, \
                  update and delete is recorded in an audit trail that is \
                  committed atomically with the change itself."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Export users and the audit trail
    Export(ExportArgs),

    /// Initialize the data directory and seed demo users
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = UserMgmtPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings.log_level);

    paths.ensure_directories()?;
    let repo = Repository::open(paths.store_file())?;

    match cli.command {
        Some(Commands::User(cmd)) => {
            handle_user_command(&repo, &settings, cmd)?;
        }
        Some(Commands::Export(args)) => {
            handle_export_command(&repo, args)?;
        }
        Some(Commands::Init) => {
            if paths.is_initialized() {
                println!("Already initialized at: {}", paths.base_dir().display());
            } else {
                println!("Initializing usermgmt at: {}", paths.base_dir().display());
                settings.save(&paths)?;
            }

            if !settings.seed_demo_data {
                println!("Demo data disabled; starting with an empty store.");
            } else if seed::initialize(&repo)? {
                println!("Seeded {} demo users.", repo.count::<User>());
            } else {
                println!("Store already contains data; nothing seeded.");
            }

            println!("Initialization complete!");
            println!();
            println!("Run 'usermgmt user list' to see all users.");
        }
        Some(Commands::Config) => {
            println!("usermgmt Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Store file:       {}", paths.store_file().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!();
            println!("Settings:");
            println!("  Date format:      {}", settings.date_format);
            println!("  Log level:        {}", settings.log_level);
            println!("  Seed demo data:   {}", settings.seed_demo_data);
            println!("  Recent log count: {}", settings.recent_log_count);
        }
        None => {
            println!("usermgmt - User management with an audit trail");
            println!();
            println!("Run 'usermgmt --help' for usage information.");
            println!("Run 'usermgmt init' to create a store with demo users.");
        }
    }

    Ok(())
}
