use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use lossfind::config::ConfigError;
use lossfind::net::api::{self, ClaimQuery, ItemQuery, NotificationQuery, PageRequest};
use lossfind::net::types::LoginForm;
use lossfind::platform::{FileStorage, Platform, ReqwestTransport, TracingNavigator, TracingNotifier, TransportError};
use lossfind::router::{NavigationError, ResolvedRoute};
use lossfind::session::SessionError;
use lossfind::util::date::{self, DateInput};
use lossfind::{ApiError, App, ClientConfig};
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("no local data directory; pass --storage or set LOSSFIND_STORAGE")]
    NoDataDir,
    #[error("not logged in; run `lossfind login` first")]
    NotLoggedIn,
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "lossfind", about = "Lost & Found client CLI")]
struct Cli {
    /// Overrides `LOSSFIND_BASE_URL` from the client config.
    #[arg(long)]
    base_url: Option<String>,

    /// Session file; defaults to `<data dir>/lossfind/session.json`.
    #[arg(long, env = "LOSSFIND_STORAGE")]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "LOSSFIND_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    /// Resolve a location through the route table and navigation guard.
    Navigate {
        location: String,
    },
    Lost(ItemCommand),
    Found(ItemCommand),
    Claims(ClaimsCommand),
    Categories,
    Notifications(NotificationsCommand),
    /// Format a date string or epoch-millisecond timestamp.
    FormatDate {
        value: String,
        #[arg(long, default_value = date::DATE_TIME)]
        pattern: String,
    },
}

#[derive(Args, Debug)]
struct PageArgs {
    #[arg(long, default_value_t = api::DEFAULT_PAGE)]
    page: u32,
    #[arg(long, default_value_t = api::DEFAULT_PAGE_SIZE)]
    size: u32,
}

impl PageArgs {
    fn request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }
}

#[derive(Args, Debug)]
struct ItemCommand {
    #[command(subcommand)]
    command: ItemSubcommand,
}

#[derive(Subcommand, Debug)]
enum ItemSubcommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category_id: Option<i64>,
        #[arg(long)]
        status: Option<i64>,
    },
    Show {
        id: i64,
    },
    /// Lost: aggregate counts. Found: items posted by the current user.
    Stats,
}

#[derive(Args, Debug)]
struct ClaimsCommand {
    #[command(subcommand)]
    command: ClaimsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ClaimsSubcommand {
    Mine {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        status: Option<i64>,
    },
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        status: Option<i64>,
        #[arg(long)]
        item_title: Option<String>,
    },
    Cancel {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct NotificationsCommand {
    #[command(subcommand)]
    command: NotificationsSubcommand,
}

#[derive(Subcommand, Debug)]
enum NotificationsSubcommand {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Count,
    ReadAll,
    /// Poll the unread count until interrupted.
    Watch {
        #[arg(long, default_value_t = 60)]
        interval_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let app = build_app(&cli)?;
    run(app, cli.command).await
}

fn build_app(cli: &Cli) -> Result<App, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    let storage_path = match &cli.storage {
        Some(path) => path.clone(),
        None => default_storage_path().ok_or(CliError::NoDataDir)?,
    };
    info!(storage = %storage_path.display(), "opening session storage");

    let platform = Platform::new(
        Arc::new(FileStorage::open(storage_path)),
        Arc::new(ReqwestTransport::new(config.timeouts)?),
        Arc::new(TracingNotifier),
        Arc::new(TracingNavigator),
    );
    Ok(App::new(config, platform))
}

fn default_storage_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("lossfind").join("session.json"))
}

async fn run(mut app: App, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { username, password } => {
            let profile = app.session.login(&app.http, &LoginForm { username, password }).await?;
            print_json(&serde_json::to_value(profile)?)
        }
        Command::Logout => {
            app.session.logout()?;
            println!("logged out");
            Ok(())
        }
        Command::Whoami => {
            let profile = app.session.user_info().ok_or(CliError::NotLoggedIn)?;
            print_json(&json!({
                "user": profile,
                "role": app.session.role(),
                "isAdmin": app.session.is_admin(),
            }))
        }
        Command::Navigate { location } => {
            let route = app.router.push(&location)?;
            print_json(&route_json(&route))
        }
        Command::Lost(cmd) => run_lost(&app, cmd).await,
        Command::Found(cmd) => run_found(&app, cmd).await,
        Command::Claims(cmd) => run_claims(&app, cmd).await,
        Command::Categories => print_json(&serde_json::to_value(api::category::list(&app.http).await?)?),
        Command::Notifications(cmd) => run_notifications(&app, cmd).await,
        Command::FormatDate { value, pattern } => {
            println!("{}", date::format(parse_date_input(&value), &pattern));
            Ok(())
        }
    }
}

async fn run_lost(app: &App, cmd: ItemCommand) -> Result<(), CliError> {
    let value = match cmd.command {
        ItemSubcommand::List { page, title, category_id, status } => {
            let query = ItemQuery { page: page.request(), title, category_id, status, user_id: None };
            serde_json::to_value(api::lost::page(&app.http, &query).await?)?
        }
        ItemSubcommand::Show { id } => serde_json::to_value(api::lost::get(&app.http, id).await?)?,
        ItemSubcommand::Stats => serde_json::to_value(api::lost::statistics(&app.http).await?)?,
    };
    print_json(&value)
}

async fn run_found(app: &App, cmd: ItemCommand) -> Result<(), CliError> {
    let value = match cmd.command {
        ItemSubcommand::List { page, title, category_id, status } => {
            let query = ItemQuery { page: page.request(), title, category_id, status, user_id: None };
            serde_json::to_value(api::found::page(&app.http, &query).await?)?
        }
        ItemSubcommand::Show { id } => serde_json::to_value(api::found::get(&app.http, id).await?)?,
        ItemSubcommand::Stats => {
            require_login(app)?;
            serde_json::to_value(api::found::mine(&app.http).await?)?
        }
    };
    print_json(&value)
}

async fn run_claims(app: &App, cmd: ClaimsCommand) -> Result<(), CliError> {
    require_login(app)?;
    match cmd.command {
        ClaimsSubcommand::Mine { page, status } => {
            print_json(&serde_json::to_value(api::claim::mine(&app.http, page.request(), status).await?)?)
        }
        ClaimsSubcommand::List { page, status, item_title } => {
            let query = ClaimQuery { page: page.request(), status, item_type: None, item_title };
            print_json(&serde_json::to_value(api::claim::page(&app.http, &query).await?)?)
        }
        ClaimsSubcommand::Cancel { id } => {
            api::claim::cancel(&app.http, id).await?;
            println!("claim {id} cancelled");
            Ok(())
        }
    }
}

async fn run_notifications(app: &App, cmd: NotificationsCommand) -> Result<(), CliError> {
    require_login(app)?;
    match cmd.command {
        NotificationsSubcommand::List { page } => {
            let query = NotificationQuery { page: page.request(), r#type: None };
            print_json(&serde_json::to_value(api::notification::list(&app.http, &query).await?)?)
        }
        NotificationsSubcommand::Count => {
            println!("{}", api::notification::unread_count(&app.http).await?);
            Ok(())
        }
        NotificationsSubcommand::ReadAll => {
            api::notification::mark_all_read(&app.http).await?;
            println!("all notifications marked read");
            Ok(())
        }
        NotificationsSubcommand::Watch { interval_secs } => watch_notifications(app, interval_secs).await,
    }
}

async fn watch_notifications(app: &App, interval_secs: u64) -> Result<(), CliError> {
    let polling = app
        .notification_polling()
        .with_interval(Duration::from_secs(interval_secs.max(1)));
    let mut updates = polling.subscribe();
    polling.start();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if !state.loading {
                    print_json(&json!({ "unread": state.data, "error": state.error }))?;
                }
            }
            _ = &mut ctrl_c => break,
        }
    }
    polling.stop();
    Ok(())
}

fn require_login(app: &App) -> Result<(), CliError> {
    if app.session.is_logged_in() { Ok(()) } else { Err(CliError::NotLoggedIn) }
}

fn parse_date_input(value: &str) -> DateInput {
    match value.parse::<i64>() {
        Ok(millis) => DateInput::TimestampMillis(millis),
        Err(_) => DateInput::from(value),
    }
}

fn route_json(route: &ResolvedRoute) -> Value {
    json!({
        "path": route.path,
        "fullPath": route.full_path,
        "name": route.name,
        "matched": route.matched,
        "params": route.params,
        "query": route.query,
        "title": route.meta.title,
        "requiresAuth": route.meta.requires_auth,
    })
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
