mod commands;
mod config;
mod display;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{Action, Completion, Dispatcher, EditSession, HttpPromotionService};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc::UnboundedReceiver,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    commands::{parse_line, ShellCommand, HELP},
    config::{load_settings, DEFAULT_CONFIG_PATH},
    display::{flash_line, form_table, results_table},
};

#[derive(Parser, Debug)]
#[command(name = "promotions", about = "Operator console for the promotions service")]
struct Args {
    /// Overrides the configured service URL.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }

    let service = HttpPromotionService::new(settings.service_options())
        .with_context(|| format!("invalid promotions service settings for '{}'", settings.server_url))?;
    info!(collection = %service.collection_url(), "promotions console ready");

    let (dispatcher, completions) = Dispatcher::new(Arc::new(service));
    run_shell(dispatcher, completions).await
}

/// Owns the edit session; input lines and request completions are handled
/// one at a time on this task.
async fn run_shell(
    mut dispatcher: Dispatcher,
    mut completions: UnboundedReceiver<Completion>,
) -> Result<()> {
    let mut session = EditSession::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight = 0usize;
    let mut input_open = true;
    let mut waiting = false;

    loop {
        if !input_open && in_flight == 0 {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if input_open && !waiting => {
                let Some(line) = line.context("failed to read operator input")? else {
                    input_open = false;
                    continue;
                };
                match parse_line(&line) {
                    Ok(None) => {}
                    Ok(Some(ShellCommand::Quit)) => break,
                    Ok(Some(ShellCommand::Wait)) => waiting = in_flight > 0,
                    Ok(Some(ShellCommand::Run(action))) => {
                        if dispatcher.dispatch(&mut session, action).is_some() {
                            in_flight += 1;
                        } else {
                            print_form(&session);
                        }
                    }
                    Ok(Some(command)) => handle_local(&mut session, command),
                    Err(err) => eprintln!("{err}"),
                }
            }
            Some(completion) = completions.recv(), if in_flight > 0 => {
                in_flight -= 1;
                let action = completion.action;
                debug!(
                    sequence = completion.sequence,
                    %action,
                    in_flight,
                    "completion received"
                );
                session.apply(completion);
                print_completion(&session, action);
                if in_flight == 0 {
                    waiting = false;
                }
            }
        }
    }

    Ok(())
}

fn handle_local(session: &mut EditSession, command: ShellCommand) {
    match command {
        ShellCommand::Set { field, value } => session.form.set(field, value),
        ShellCommand::Show => print_form(session),
        ShellCommand::Html => match session.results_html() {
            Some(html) => println!("{html}"),
            None => println!("(no search results)"),
        },
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Run(_) | ShellCommand::Wait | ShellCommand::Quit => {}
    }
}

fn print_form(session: &EditSession) {
    println!("{}", flash_line(&session.flash));
    println!("{}", form_table(&session.form));
}

fn print_completion(session: &EditSession, action: Action) {
    if action == Action::Search {
        if let Some(results) = &session.results {
            println!("{}", results_table(results));
        }
    }
    print_form(session);
}
