// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `truthlens shell` command implementation.
//!
//! An interactive REPL with a coloured prompt and readline history. Plain
//! input is analysed as article content; slash commands cover everything
//! else. Notifications and UI events are printed after every command.

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::broadcast;
use tracing::debug;

use truthlens_app::{Orchestrator, Submission, UiEvent};
use truthlens_core::TruthlensError;

use crate::prompt_password;
use crate::render;

/// One parsed line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Analyze(Submission),
    Login { email: String },
    Register { email: String, name: String },
    Logout,
    Whoami,
    History { all: bool },
    Reset,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

const HELP: &str = "\
  <text>                   analyse article content
  /url <link>              analyse a link
  /login <email>           sign in
  /register <email> <name> create an account
  /logout                  sign out
  /whoami                  show the signed-in account
  /history [all]           show recent analyses
  /reset                   clear the current result
  /quit                    leave the shell";

/// Parse one line of input.
pub fn parse_line(line: &str) -> ShellCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ShellCommand::Empty;
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return ShellCommand::Analyze(Submission::content(trimmed));
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };
    match (name, rest) {
        ("quit" | "exit", _) => ShellCommand::Quit,
        ("help", _) => ShellCommand::Help,
        ("logout", _) => ShellCommand::Logout,
        ("whoami", _) => ShellCommand::Whoami,
        ("reset", _) => ShellCommand::Reset,
        ("history", "all") => ShellCommand::History { all: true },
        ("history", "") => ShellCommand::History { all: false },
        // Empty links fall through to input validation.
        ("url", link) => ShellCommand::Analyze(Submission::url(link)),
        ("login", email) if !email.is_empty() => ShellCommand::Login {
            email: email.to_string(),
        },
        ("register", rest) => match rest.split_once(char::is_whitespace) {
            Some((email, name)) => ShellCommand::Register {
                email: email.to_string(),
                name: name.trim().to_string(),
            },
            None => ShellCommand::Unknown(trimmed.to_string()),
        },
        _ => ShellCommand::Unknown(trimmed.to_string()),
    }
}

/// Runs the `truthlens shell` interactive REPL.
pub async fn run_shell(app: &mut Orchestrator, use_color: bool) -> Result<(), TruthlensError> {
    let mut events = app.notifier().subscribe();
    let mut rl = DefaultEditor::new()
        .map_err(|e| TruthlensError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "truthlens shell".bold().green());
    println!("{}", render::user_line(app.session().user()).dimmed());
    println!("Type {} for commands, {} to exit.\n", "/help".yellow(), "/quit".yellow());

    let prompt = format!("{}> ", "truthlens".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let command = parse_line(&line);
                if command == ShellCommand::Quit {
                    break;
                }
                if command != ShellCommand::Empty {
                    let _ = rl.add_history_entry(&line);
                }
                if let Err(e) = handle_command(app, command, use_color).await {
                    debug!(error = %e, "shell command failed");
                }
                print_events(&mut events, use_color);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

/// Execute one command. Orchestrator failures have already been surfaced
/// as notifications, so only local failures are printed here.
async fn handle_command(
    app: &mut Orchestrator,
    command: ShellCommand,
    use_color: bool,
) -> Result<(), TruthlensError> {
    match command {
        ShellCommand::Analyze(submission) => {
            let result = app.analyze(submission).await?;
            println!("{}", render::result_panel(&result, use_color));
        }
        ShellCommand::Login { email } => {
            let password = prompt_password("Password: ").inspect_err(|e| {
                eprintln!("{}: {e}", "error".red());
            })?;
            app.login(&email, &password).await?;
            println!("{}", render::user_line(app.session().user()));
        }
        ShellCommand::Register { email, name } => {
            let password = prompt_password("Choose a password: ").inspect_err(|e| {
                eprintln!("{}: {e}", "error".red());
            })?;
            app.register(&name, &email, &password).await?;
        }
        ShellCommand::Logout => app.logout().await?,
        ShellCommand::Whoami => println!("{}", render::user_line(app.session().user())),
        ShellCommand::History { all } => {
            if app.session().is_authenticated() {
                print!("{}", render::history_list(app.session().history(), all, use_color));
            } else {
                println!("{}", render::user_line(None));
            }
        }
        ShellCommand::Reset => app.reset(),
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Unknown(input) => {
            eprintln!("{}: unknown command `{input}`, try /help", "error".red());
        }
        ShellCommand::Quit | ShellCommand::Empty => {}
    }
    Ok(())
}

/// Print everything published since the last call.
pub fn print_events(events: &mut broadcast::Receiver<UiEvent>, use_color: bool) {
    loop {
        match events.try_recv() {
            Ok(event) => {
                for line in render::event_lines(&event, true, use_color) {
                    eprintln!("{line}");
                }
            }
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                debug!(skipped, "ui events dropped");
            }
            Err(_) => break,
        }
    }
}
