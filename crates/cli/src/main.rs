//! Job-board admin CLI.
//!
//! # Usage
//!
//! ```bash
//! # List industries matching a search term
//! jb-cli list industries --search tech
//!
//! # Create, edit, toggle and delete records
//! jb-cli create company-types --name "Cooperative"
//! jb-cli update industries 4 --name "Fintech" --description "Payments"
//! jb-cli toggle industries 4
//! jb-cli delete industries 4 --yes
//!
//! # Kind-specific commands
//! jb-cli users role 12 admin
//! jb-cli roles grant 3 manage_news
//! jb-cli news dedupe export.json
//! ```
//!
//! # Environment Variables
//!
//! See `jobboard_admin::config`. Local-only kinds (company sizes, job
//! categories, locations) run on sample data and need no configuration.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jobboard_admin::AdminConfig;
use jobboard_core::{AccountRole, EntityKind, Permission, RecordStatus};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod backend;
mod commands;
mod error;

use commands::Context;
use commands::entities::{Action, DraftArgs};
use error::CliError;

#[derive(Parser)]
#[command(name = "jb-cli")]
#[command(author, version, about = "Job-board admin CLI")]
struct Cli {
    /// Do not ask before deleting
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List records, optionally filtered
    List {
        /// Entity kind (industries, company-types, company-sizes, job-categories,
        /// locations, roles, users, news)
        kind: EntityKind,

        /// Case-insensitive search over name, description and range
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create a record
    Create {
        kind: EntityKind,

        #[command(flatten)]
        fields: DraftArgs,
    },
    /// Replace the editable fields of a record
    Update {
        kind: EntityKind,
        id: String,

        #[command(flatten)]
        fields: DraftArgs,
    },
    /// Flip a record between active and inactive
    Toggle { kind: EntityKind, id: String },
    /// Delete a record
    Delete { kind: EntityKind, id: String },
    /// Manage admin users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage role permissions
    Roles {
        #[command(subcommand)]
        action: RoleAction,
    },
    /// Manage news items
    News {
        #[command(subcommand)]
        action: NewsAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Change a user's account role
    Role { id: String, role: AccountRole },
    /// Set a user's status
    Status { id: String, status: RecordStatus },
    /// Reset a user's password (read from stdin)
    ResetPassword { id: String },
}

#[derive(Subcommand)]
enum RoleAction {
    /// Add a permission to a role
    Grant { id: String, permission: Permission },
    /// Remove a permission from a role
    Revoke { id: String, permission: Permission },
}

#[derive(Subcommand)]
enum NewsAction {
    /// Collapse duplicate items in a JSON export
    Dedupe {
        file: PathBuf,

        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Publish an item
    Publish { id: String },
    /// Unpublish an item
    Unpublish { id: String },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jobboard_admin=info,jobboard_cli=info".into());

    // Logs go to stderr so command output on stdout stays clean
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration is optional until a remote-backed kind is touched
    let config = AdminConfig::from_env().ok();
    let _sentry_guard = config.as_ref().and_then(init_sentry);
    init_tracing(config.as_ref().is_some_and(|c| c.log_json));

    let ctx = Context::new(config, cli.yes);
    let result: Result<(), CliError> = run(&ctx, cli.command).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(ctx: &Context, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::List { kind, search } => {
            commands::entities::run(ctx, kind, Action::List { search }).await?;
        }
        Commands::Create { kind, fields } => {
            commands::entities::run(ctx, kind, Action::Create(fields)).await?;
        }
        Commands::Update { kind, id, fields } => {
            commands::entities::run(ctx, kind, Action::Update { id, fields }).await?;
        }
        Commands::Toggle { kind, id } => {
            commands::entities::run(ctx, kind, Action::Toggle { id }).await?;
        }
        Commands::Delete { kind, id } => {
            commands::entities::run(ctx, kind, Action::Delete { id }).await?;
        }
        Commands::Users { action } => match action {
            UserAction::Role { id, role } => commands::users::change_role(ctx, &id, role).await?,
            UserAction::Status { id, status } => {
                commands::users::set_status(ctx, &id, status).await?;
            }
            UserAction::ResetPassword { id } => commands::users::reset_password(ctx, &id).await?,
        },
        Commands::Roles { action } => match action {
            RoleAction::Grant { id, permission } => {
                commands::roles::set_permission(ctx, &id, permission, true).await?;
            }
            RoleAction::Revoke { id, permission } => {
                commands::roles::set_permission(ctx, &id, permission, false).await?;
            }
        },
        Commands::News { action } => match action {
            NewsAction::Dedupe { file, output } => {
                commands::news::dedupe(&file, output.as_deref())?;
            }
            NewsAction::Publish { id } => commands::news::set_published(ctx, &id, true).await?,
            NewsAction::Unpublish { id } => commands::news::set_published(ctx, &id, false).await?,
        },
    }
    Ok(())
}
