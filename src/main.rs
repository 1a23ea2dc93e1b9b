//! Widget Dashboard - CLI entry point
//!
//! `wdash tui` opens the interactive dashboard. The other subcommands inspect
//! and edit the saved dashboards of the known users without a terminal UI.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use widget_dashboard::{
    config::{default, error::ConfigError, loader::ConfigLoader, schema::Config, xdg},
    data::{DataSource, Dataset},
    grid::GridAdapter,
    layout::{to_layout, Breakpoint, GridEngine},
    logging,
    notify::LogNotifier,
    resize::ResizeCoordinator,
    store::{BackgroundWriter, BlobStore, JsonFileBlobStore},
    tui::app::{App, AppSettings},
    user::{find_user, DashboardSession, USERS},
    WidgetKind, GRID_COLUMNS,
};

/// Grid-based widget dashboard
#[derive(Parser)]
#[command(name = "wdash")]
#[command(version, about = "Grid-based widget dashboard")]
struct Cli {
    /// Configuration file (default: XDG config path)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the wdash CLI
#[derive(Subcommand)]
enum Commands {
    /// Launch the terminal user interface
    Tui {
        /// Open this user's dashboard instead of the saved current user
        #[arg(long)]
        user: Option<String>,
    },

    /// Inspect and edit the widgets of a dashboard
    Widgets {
        /// User whose dashboard to edit (default: saved current user)
        #[arg(long, global = true)]
        user: Option<String>,

        #[command(subcommand)]
        action: WidgetsAction,
    },

    /// Print the compacted grid layout
    Layout {
        /// User whose dashboard to print (default: saved current user)
        #[arg(long)]
        user: Option<String>,

        /// Column count to lay the widgets out in
        #[arg(long, default_value_t = GRID_COLUMNS, value_parser = clap::value_parser!(u32).range(1..=12))]
        cols: u32,
    },

    /// List users or change the current user
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Fetch a dataset from the sample data source
    Data {
        /// Dataset name (customers, revenue, sales, distribution, metrics)
        dataset: Dataset,
    },
}

/// Actions for the `widgets` subcommand.
#[derive(Subcommand)]
enum WidgetsAction {
    /// List widgets with their position, size and visibility
    List,
    /// Add a widget below the existing ones
    Add {
        /// Widget kind: table, chart or stats
        kind: WidgetKind,
        /// Title shown in the widget header
        title: String,
    },
    /// Remove a widget
    Remove {
        /// Widget id
        id: String,
    },
    /// Show a hidden widget or hide a visible one
    Toggle {
        /// Widget id
        id: String,
    },
    /// Expand a widget to the full row width
    Expand {
        /// Widget id
        id: String,
    },
    /// Restore a widget to its size before the first expand
    Restore {
        /// Widget id
        id: String,
    },
    /// Forget the saved dashboard and start over with the default widgets
    Reset,
}

/// Actions for the `users` subcommand.
#[derive(Subcommand)]
enum UsersAction {
    /// List known users, marking the current one
    List,
    /// Make another user current
    Switch {
        /// User id
        id: String,
    },
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
    /// Print the effective configuration as TOML
    Show,
}

fn main() -> ExitCode {
    let Cli { config, command } = Cli::parse();
    let config_path = config.as_deref();

    match command {
        Commands::Config { action } => run_config_command(action, config_path),
        Commands::Tui { user } => with_config(config_path, |config| {
            run_tui_command(&config, user.as_deref())
        }),
        Commands::Widgets { user, action } => with_config(config_path, |config| {
            init_stderr_logging(&config);
            run_widgets_command(&config, user.as_deref(), action)
        }),
        Commands::Layout { user, cols } => with_config(config_path, |config| {
            init_stderr_logging(&config);
            run_layout_command(&config, user.as_deref(), cols)
        }),
        Commands::Users { action } => with_config(config_path, |config| {
            init_stderr_logging(&config);
            run_users_command(&config, action)
        }),
        Commands::Data { dataset } => with_config(config_path, |config| {
            init_stderr_logging(&config);
            run_data_command(&config, dataset)
        }),
    }
}

/// Loads and validates the configuration, then runs `f` with it.
fn with_config(path: Option<&Path>, f: impl FnOnce(Config) -> ExitCode) -> ExitCode {
    match ConfigLoader::load(path) {
        Ok(config) => f(config),
        Err(e) => {
            eprintln!("Config error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs to stderr at the configured level.
fn init_stderr_logging(config: &Config) {
    let level = config.logging.level().unwrap_or_else(|_| "info".to_string());
    if let Err(e) = logging::init(&level, None) {
        eprintln!("Warning: logging disabled: {e}");
    }
}

fn run_config_command(action: ConfigAction, path: Option<&Path>) -> ExitCode {
    let result = match action {
        ConfigAction::Init { force } => default::create_default_config(force).map(|path| {
            println!("Created configuration at {}", path.display());
        }),
        ConfigAction::Path => {
            println!("{}", path.map_or_else(xdg::config_path, Path::to_path_buf).display());
            Ok(())
        }
        ConfigAction::Validate => ConfigLoader::load(path).map(|config| {
            println!("Configuration is valid");
            println!("{config:#?}");
        }),
        ConfigAction::Show => ConfigLoader::load(path).and_then(|config| {
            let text = toml::to_string_pretty(&config)
                .map_err(|e| ConfigError::Render(e.to_string()))?;
            print!("{text}");
            Ok(())
        }),
    };
    if let Err(e) = result {
        eprintln!("Config error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Blob store for saved dashboards, under the configured data directory.
fn file_store(config: &Config) -> Arc<dyn BlobStore> {
    let dir = config.storage.resolve_dir();
    tracing::debug!("dashboards stored in {}", dir.display());
    Arc::new(JsonFileBlobStore::new(dir))
}

/// Opens a session, refusing user ids that are not in the directory.
fn open_session(
    blobs: Arc<dyn BlobStore>,
    user: Option<&str>,
) -> Result<DashboardSession, String> {
    if let Some(id) = user {
        if find_user(id).is_none() {
            return Err(format!("unknown user: {id}"));
        }
    }
    Ok(DashboardSession::open(blobs, user))
}

fn run_tui_command(config: &Config, user: Option<&str>) -> ExitCode {
    let settings = match AppSettings::from_config(config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // stderr belongs to the alternate screen while the TUI runs
    let data_dir = config.storage.resolve_dir();
    let log_file = config.logging.resolve_file(&data_dir);
    let level = config.logging.level().unwrap_or_else(|_| "info".to_string());
    if let Err(e) = logging::init(&level, Some(&log_file)) {
        eprintln!("Warning: cannot open log file {}: {e}", log_file.display());
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = rt.block_on(async {
        let writer = Arc::new(BackgroundWriter::spawn(file_store(config)));
        let blobs: Arc<dyn BlobStore> = writer.clone();
        let session = open_session(blobs, user)?;
        tracing::info!("starting TUI for {}", session.store().user_id());
        let mut app = App::new(session, settings);
        let result = app.run().await.map_err(|e| format!("TUI error: {e}"));
        writer.flush();
        result
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run_widgets_command(config: &Config, user: Option<&str>, action: WidgetsAction) -> ExitCode {
    let mut session = match open_session(file_store(config), user) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let adapter = GridAdapter::new(Breakpoint::Lg);
    adapter.reconcile(session.store_mut());

    let result = match action {
        WidgetsAction::List => {
            print_widgets(&session);
            Ok(())
        }
        WidgetsAction::Add { kind, title } => match session.store_mut().add_widget(kind, &title) {
            Some(id) => {
                println!("{id}");
                Ok(())
            }
            None => Err("title must not be blank".to_string()),
        },
        WidgetsAction::Remove { id } => match session.store_mut().remove_widget(&id) {
            Some(removed) => {
                println!("Removed {} ({})", removed.id, removed.title);
                Ok(())
            }
            None => Err(format!("no widget {id}")),
        },
        WidgetsAction::Toggle { id } => match session.store_mut().toggle_visibility(&id) {
            Some(visible) => {
                println!("{id} {}", if visible { "shown" } else { "hidden" });
                Ok(())
            }
            None => Err(format!("no widget {id}")),
        },
        WidgetsAction::Expand { id } => {
            let mut notifier = LogNotifier::default();
            ResizeCoordinator::new(session.store_mut(), &mut notifier)
                .expand(&id)
                .map(|outcome| println!("{id} is now {}", outcome.size))
                .ok_or_else(|| format!("no visible widget {id}"))
        }
        WidgetsAction::Restore { id } => {
            let mut notifier = LogNotifier::default();
            ResizeCoordinator::new(session.store_mut(), &mut notifier)
                .request_restore(&id)
                .map(|outcome| println!("{id} is now {}", outcome.size))
                .ok_or_else(|| format!("no visible widget {id}"))
        }
        WidgetsAction::Reset => {
            session.store_mut().reset();
            println!("Reset dashboard of {}", session.store().user_id());
            Ok(())
        }
    };

    // Settle added and resized widgets the way the grid would
    adapter.reconcile(session.store_mut());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_widgets(session: &DashboardSession) {
    let store = session.store();
    if store.is_empty() {
        println!("No widgets for {}", store.user_id());
        return;
    }
    println!(
        "{:<10} {:<6} {:>3} {:>3} {:>5}  {:<7} TITLE",
        "ID", "KIND", "X", "Y", "SIZE", "VISIBLE"
    );
    for record in store.widgets() {
        println!(
            "{:<10} {:<6} {:>3} {:>3} {:>5}  {:<7} {}",
            record.id,
            record.kind,
            record.x,
            record.y,
            record.size().to_string(),
            if record.visible { "yes" } else { "no" },
            record.title
        );
    }
}

fn run_layout_command(config: &Config, user: Option<&str>, cols: u32) -> ExitCode {
    let session = match open_session(file_store(config), user) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let layout = GridEngine::new(cols).squeeze(&to_layout(session.store().widgets()));
    println!("{} columns, {} widgets", cols, layout.len());
    for entry in layout {
        println!(
            "{:<10} x={:<2} y={:<2} w={:<2} h={}",
            entry.id, entry.x, entry.y, entry.w, entry.h
        );
    }
    ExitCode::SUCCESS
}

fn run_users_command(config: &Config, action: UsersAction) -> ExitCode {
    let mut session = DashboardSession::open(file_store(config), None);
    match action {
        UsersAction::List => {
            let current = session.users().current_user_id().to_string();
            for user in USERS {
                let marker = if user.id == current { "*" } else { " " };
                println!(
                    "{marker} {:<6} {:<11} {:<18} {}",
                    user.id, user.name, user.email, user.role
                );
            }
            ExitCode::SUCCESS
        }
        UsersAction::Switch { id } => {
            if !session.switch_user(&id) {
                eprintln!("Error: unknown user: {id}");
                return ExitCode::FAILURE;
            }
            if let Some(user) = session.user_info() {
                println!("Switched to {} ({})", user.name, user.id);
            }
            ExitCode::SUCCESS
        }
    }
}

fn run_data_command(config: &Config, dataset: Dataset) -> ExitCode {
    let source = match config.data.latency() {
        Ok(latency) => DataSource::new(latency),
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };
    match rt.block_on(source.fetch(dataset)) {
        Ok(records) => {
            for line in records.lines() {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_tui_subcommand_parses() {
        let cli = Cli::try_parse_from(["wdash", "tui"]).expect("tui should parse");
        match cli.command {
            Commands::Tui { user } => assert_eq!(user, None),
            _ => panic!("expected Tui command"),
        }
    }

    #[test]
    fn test_tui_user_flag() {
        let cli = Cli::try_parse_from(["wdash", "tui", "--user", "user2"])
            .expect("tui --user should parse");
        match cli.command {
            Commands::Tui { user } => assert_eq!(user.as_deref(), Some("user2")),
            _ => panic!("expected Tui command"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["wdash", "layout", "--config", "/tmp/wdash.toml"])
            .expect("--config after the subcommand should parse");
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/wdash.toml")));
    }

    #[test]
    fn test_widgets_add_parses_kind() {
        let cli = Cli::try_parse_from(["wdash", "widgets", "add", "chart", "Orders"])
            .expect("widgets add should parse");
        match cli.command {
            Commands::Widgets {
                action: WidgetsAction::Add { kind, title },
                user,
            } => {
                assert_eq!(kind, WidgetKind::Chart);
                assert_eq!(title, "Orders");
                assert_eq!(user, None);
            }
            _ => panic!("expected widgets add"),
        }
    }

    #[test]
    fn test_widgets_add_rejects_unknown_kind() {
        let result = Cli::try_parse_from(["wdash", "widgets", "add", "gauge", "Orders"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_widgets_user_flag_after_action() {
        let cli = Cli::try_parse_from(["wdash", "widgets", "expand", "widget1", "--user", "user3"])
            .expect("--user is global to widgets actions");
        match cli.command {
            Commands::Widgets {
                action: WidgetsAction::Expand { id },
                user,
            } => {
                assert_eq!(id, "widget1");
                assert_eq!(user.as_deref(), Some("user3"));
            }
            _ => panic!("expected widgets expand"),
        }
    }

    #[test]
    fn test_widgets_remove_requires_id() {
        let result = Cli::try_parse_from(["wdash", "widgets", "remove"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_widgets_reset_takes_no_arguments() {
        let cli = Cli::try_parse_from(["wdash", "widgets", "reset"]).expect("reset should parse");
        match cli.command {
            Commands::Widgets {
                action: WidgetsAction::Reset,
                ..
            } => {}
            _ => panic!("expected widgets reset"),
        }
        assert!(Cli::try_parse_from(["wdash", "widgets", "reset", "widget1"]).is_err());
    }

    #[test]
    fn test_layout_default_cols() {
        let cli = Cli::try_parse_from(["wdash", "layout"]).expect("layout should parse");
        match cli.command {
            Commands::Layout { cols, .. } => assert_eq!(cols, 12),
            _ => panic!("expected Layout command"),
        }
    }

    #[test]
    fn test_layout_cols_range() {
        assert!(Cli::try_parse_from(["wdash", "layout", "--cols", "6"]).is_ok());
        assert!(Cli::try_parse_from(["wdash", "layout", "--cols", "0"]).is_err());
        assert!(Cli::try_parse_from(["wdash", "layout", "--cols", "13"]).is_err());
    }

    #[test]
    fn test_users_switch_parses() {
        let cli = Cli::try_parse_from(["wdash", "users", "switch", "user2"])
            .expect("users switch should parse");
        match cli.command {
            Commands::Users {
                action: UsersAction::Switch { id },
            } => assert_eq!(id, "user2"),
            _ => panic!("expected users switch"),
        }
    }

    #[test]
    fn test_data_parses_dataset() {
        let cli = Cli::try_parse_from(["wdash", "data", "revenue"]).expect("data should parse");
        match cli.command {
            Commands::Data { dataset } => assert_eq!(dataset, Dataset::Revenue),
            _ => panic!("expected Data command"),
        }
        assert!(Cli::try_parse_from(["wdash", "data", "weather"]).is_err());
    }

    // -- Config subcommand --------------------------------------------------

    #[test]
    fn test_config_init_parses() {
        let cli = Cli::try_parse_from(["wdash", "config", "init"])
            .expect("config init should parse");
        match cli.command {
            Commands::Config { action } => match action {
                ConfigAction::Init { force } => assert!(!force),
                _ => panic!("expected Init action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_config_init_force_parses() {
        let cli = Cli::try_parse_from(["wdash", "config", "init", "--force"])
            .expect("config init --force should parse");
        match cli.command {
            Commands::Config { action } => match action {
                ConfigAction::Init { force } => assert!(force),
                _ => panic!("expected Init action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_config_show_parses() {
        let cli = Cli::try_parse_from(["wdash", "config", "show"])
            .expect("config show should parse");
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Show
            }
        ));
    }

    #[test]
    fn test_config_without_action_fails() {
        let result = Cli::try_parse_from(["wdash", "config"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_subcommand_fails() {
        let result = Cli::try_parse_from(["wdash"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        let result = Cli::try_parse_from(["wdash", "serve"]);
        assert!(result.is_err());
    }
}
