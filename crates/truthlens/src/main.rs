// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Truthlens - a command-line client for a fake-news detection service.
//!
//! This is the binary entry point. It loads configuration, wires the SQLite
//! store and the HTTP adapter into the application core, and dispatches the
//! subcommand.

mod doctor;
mod render;
mod shell;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use secrecy::SecretString;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use truthlens_app::{
    Normalizer, Notifier, Orchestrator, SessionStore, Submission, UiEvent,
};
use truthlens_client::DetectorClient;
use truthlens_config::TruthlensConfig;
use truthlens_core::{PluginAdapter, TruthlensError};
use truthlens_security::{RedactingWriter, SecretRegistry};
use truthlens_storage::SqliteStore;

/// Truthlens - check whether a news article is likely to be fake.
#[derive(Parser, Debug)]
#[command(name = "truthlens", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable coloured output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and remember the session on this device.
    Login {
        email: String,
        /// Read the password from the first line of stdin.
        #[arg(long)]
        password_stdin: bool,
    },
    /// Create an account.
    Register {
        email: String,
        #[arg(long)]
        name: String,
        /// Read the password from the first line of stdin.
        #[arg(long)]
        password_stdin: bool,
    },
    /// Sign out. History stays on this device.
    Logout,
    /// Show the signed-in account.
    Whoami,
    /// Analyse a link, a piece of text, or a text file.
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show recent analyses of the signed-in account.
    History {
        /// Show every stored entry instead of the newest five.
        #[arg(long)]
        all: bool,
    },
    /// Launch an interactive session.
    Shell,
    /// Run diagnostic checks.
    Doctor,
    /// Print the effective configuration.
    Config,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// A link to a news article.
    #[arg(long)]
    url: Option<String>,
    /// The article text itself.
    #[arg(long)]
    content: Option<String>,
    /// A file holding the article text.
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,
}

impl InputArgs {
    fn into_submission(self) -> Result<Submission, TruthlensError> {
        if let Some(url) = self.url {
            return Ok(Submission::url(url));
        }
        if let Some(path) = self.file {
            let text = std::fs::read_to_string(&path).map_err(|e| {
                TruthlensError::Validation(format!("cannot read {}: {e}", path.display()))
            })?;
            return Ok(Submission::content(text));
        }
        Ok(Submission::content(self.content.unwrap_or_default()))
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let use_color = !cli.plain && std::io::stdout().is_terminal();
    if !use_color {
        colored::control::set_override(false);
    }

    let loaded = match &cli.config {
        Some(path) => truthlens_config::load_and_validate_path(path),
        None => truthlens_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            truthlens_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let secrets: SecretRegistry = Arc::new(RwLock::new(Vec::new()));
    init_tracing(&config.client.log_level, Arc::clone(&secrets));

    if let Err(e) = run(cli, config, secrets, use_color).await {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

async fn run(
    cli: Cli,
    config: TruthlensConfig,
    secrets: SecretRegistry,
    use_color: bool,
) -> Result<(), TruthlensError> {
    let command = match cli.command {
        Some(Commands::Config) => {
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| TruthlensError::Config(e.to_string()))?;
            print!("{rendered}");
            return Ok(());
        }
        Some(Commands::Doctor) => {
            return doctor::run_doctor(&config, cli.config.as_deref(), cli.plain).await;
        }
        Some(command) => command,
        None => {
            println!("truthlens: use --help for available commands");
            return Ok(());
        }
    };

    let store = Arc::new(SqliteStore::new(&config.storage));
    let api = Arc::new(DetectorClient::new(&config.api, &config.security)?);
    let session = SessionStore::new(store.clone(), api).with_secret_registry(secrets);
    let mut app = Orchestrator::new(
        session,
        Normalizer::new(&config.analysis),
        Notifier::new(&config.notifications),
    );
    let mut events = app.notifier().subscribe();
    let restored = app.restore().await;
    debug!(restored, "session restore");

    let outcome = dispatch(&mut app, command, &mut events, use_color).await;

    if let Err(e) = store.shutdown().await {
        warn!(error = %e, "store shutdown failed");
    }
    match outcome {
        Ok(()) => Ok(()),
        Err(CommandError::Reported) => std::process::exit(1),
        Err(CommandError::Unreported(e)) => Err(e),
    }
}

/// Failure of a dispatched command.
enum CommandError {
    /// Already shown to the user as a notification.
    Reported,
    Unreported(TruthlensError),
}

async fn dispatch(
    app: &mut Orchestrator,
    command: Commands,
    events: &mut broadcast::Receiver<UiEvent>,
    use_color: bool,
) -> Result<(), CommandError> {
    let outcome = match command {
        Commands::Login {
            email,
            password_stdin,
        } => {
            let password = read_password(password_stdin).map_err(CommandError::Unreported)?;
            let outcome = app.login(&email, &password).await;
            if outcome.is_ok() {
                println!("{}", render::user_line(app.session().user()));
            }
            outcome
        }
        Commands::Register {
            email,
            name,
            password_stdin,
        } => {
            let password = read_password(password_stdin).map_err(CommandError::Unreported)?;
            app.register(&name, &email, &password).await
        }
        Commands::Logout => app.logout().await,
        Commands::Whoami => {
            println!("{}", render::user_line(app.session().user()));
            Ok(())
        }
        Commands::Analyze { input, json } => {
            let submission = input.into_submission().map_err(CommandError::Unreported)?;
            match app.analyze(submission).await {
                Ok(result) if json => {
                    let rendered = serde_json::to_string_pretty(&result).map_err(|e| {
                        CommandError::Unreported(TruthlensError::Internal(e.to_string()))
                    })?;
                    println!("{rendered}");
                    Ok(())
                }
                Ok(result) => {
                    println!("{}", render::result_panel(&result, use_color));
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
        Commands::History { all } => {
            if app.session().is_authenticated() {
                print!(
                    "{}",
                    render::history_list(app.session().history(), all, use_color)
                );
            } else {
                println!("{}", render::user_line(None));
            }
            Ok(())
        }
        Commands::Shell => {
            shell::run_shell(app, use_color)
                .await
                .map_err(CommandError::Unreported)?;
            Ok(())
        }
        Commands::Doctor | Commands::Config => Ok(()),
    };

    print_events(events, use_color);
    outcome.map_err(|e| {
        debug!(error = %e, "command failed");
        CommandError::Reported
    })
}

fn print_events(events: &mut broadcast::Receiver<UiEvent>, use_color: bool) {
    while let Ok(event) = events.try_recv() {
        for line in render::event_lines(&event, false, use_color) {
            eprintln!("{line}");
        }
    }
}

fn read_password(from_stdin: bool) -> Result<SecretString, TruthlensError> {
    if from_stdin {
        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .map_err(|e| TruthlensError::Internal(format!("failed to read password: {e}")))?;
        return Ok(SecretString::from(
            line.trim_end_matches(['\r', '\n']).to_string(),
        ));
    }
    prompt_password("Password: ")
}

/// Prompt on the terminal without echo.
pub(crate) fn prompt_password(prompt: &str) -> Result<SecretString, TruthlensError> {
    if !std::io::stdin().is_terminal() {
        return Err(TruthlensError::Internal(
            "no terminal to prompt for a password; pass --password-stdin".to_string(),
        ));
    }
    let password = rpassword::prompt_password(prompt)
        .map_err(|e| TruthlensError::Internal(format!("failed to read password: {e}")))?;
    Ok(SecretString::from(password))
}

/// Initializes the tracing subscriber with the given log level.
///
/// Output goes to stderr through a redacting writer; the session layer adds
/// live tokens to `secrets` as they are issued.
fn init_tracing(log_level: &str, secrets: SecretRegistry) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("truthlens={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(move || RedactingWriter::new(std::io::stderr(), Arc::clone(&secrets)))
        .init();
}
