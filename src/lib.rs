use std::path::Path;
use std::str::FromStr;

use crate::api::ClientApi;
use crate::controllers::creation::{Completion, CreationController, CreationState};
use crate::controllers::list::{ListController, ListState};
use crate::domain::client::Client;
use crate::forms::validation::{ClientField, PhonePolicy};

pub mod api;
pub mod controllers;
pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod forms;
pub mod models;
pub mod notice;
pub mod pagination;
pub mod services;

/// One-shot operations exposed by the command line binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// List one page of clients (zero-based page index).
    List { page: usize },
    /// Fetch a single client by its shared key.
    Lookup { shared_key: String },
    /// Download the full CSV export into the configured export directory.
    Export,
    /// Create a client from `field=value` pairs keyed by wire field name.
    Create { fields: Vec<(ClientField, String)> },
}

/// Settings shared by every command, usually taken from the loaded config.
#[derive(Clone, Copy, Debug)]
pub struct RunSettings<'a> {
    pub page_size: usize,
    pub export_dir: &'a Path,
    pub phone_policy: PhonePolicy,
}

fn parse_fields(words: &[&str]) -> Result<Vec<(ClientField, String)>, String> {
    let mut fields: Vec<(ClientField, String)> = Vec::new();
    for word in words {
        match word.split_once('=') {
            Some((name, value)) => {
                let field = name
                    .parse()
                    .map_err(|_| format!("unknown field: {name}"))?;
                if fields.iter().any(|(seen, _)| *seen == field) {
                    return Err(format!("field given twice: {name}"));
                }
                fields.push((field, value.to_string()));
            }
            // Words without `=` continue the previous value, e.g. `name=Ana Maria`.
            None => match fields.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(word);
                }
                None => return Err(format!("expected field=value, got {word}")),
            },
        }
    }
    Ok(fields)
}

impl Default for Command {
    fn default() -> Self {
        Command::List { page: 0 }
    }
}

impl FromStr for Command {
    type Err = String;

    /// Parses `list [page]`, `lookup <key>`, `export` or
    /// `create field=value...`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        match words.as_slice() {
            [] | ["list"] => Ok(Command::List { page: 0 }),
            ["list", page] => page
                .parse()
                .map(|page| Command::List { page })
                .map_err(|_| format!("invalid page: {page}")),
            ["lookup", key] => Ok(Command::Lookup {
                shared_key: key.to_string(),
            }),
            ["lookup"] => Err("lookup requires a shared key".to_string()),
            ["export"] => Ok(Command::Export),
            ["create", rest @ ..] => parse_fields(rest).map(|fields| Command::Create { fields }),
            [command @ ("list" | "lookup" | "export"), ..] => {
                Err(format!("too many arguments for {command}"))
            }
            [other, ..] => Err(format!("unknown command: {other}")),
        }
    }
}

async fn export_to<A>(
    controller: &mut ListController,
    api: &A,
    export_dir: &Path,
) -> std::io::Result<()>
where
    A: ClientApi + ?Sized,
{
    let result = controller.export_current_view(api).await;
    controller.record_export(&result);
    let export = result.map_err(|e| std::io::Error::other(format!("Export failed: {e}")))?;
    let path = export.write_to(export_dir)?;
    let rows = export
        .row_count()
        .map_err(|e| std::io::Error::other(format!("Invalid CSV export: {e}")))?;
    log::info!("Wrote {rows} clients to {}", path.display());
    Ok(())
}

/// Logs the created record; the binary has nothing to navigate to.
struct LogCompletion;

impl Completion for LogCompletion {
    fn on_success(&mut self, client: &Client) {
        log::info!("Created client {} ({})", client.shared_key, client.id);
    }

    fn on_cancel(&mut self) {
        log::info!("Client creation cancelled");
    }
}

async fn create<A>(
    api: &A,
    fields: Vec<(ClientField, String)>,
    phone_policy: PhonePolicy,
) -> std::io::Result<()>
where
    A: ClientApi + ?Sized,
{
    let mut controller = CreationController::new(phone_policy, LogCompletion);
    for (field, value) in fields {
        controller.set_field(field, value);
    }

    let succeeded = matches!(controller.submit(api).await, CreationState::Succeeded(_));
    for raised in controller.take_notices() {
        log::info!("{}: {}", notice::alert_class(raised.level), raised.message);
    }
    if succeeded {
        return Ok(());
    }

    let report = controller.report();
    if !report.is_valid() {
        return Err(std::io::Error::other(format!("Invalid client: {report}")));
    }
    let reason = controller
        .last_failure()
        .map(|failure| failure.message())
        .unwrap_or_else(|| "Client was not created".to_string());
    Err(std::io::Error::other(reason))
}

/// Runs `command` against `api` and logs the result.
pub async fn run<A>(api: &A, command: Command, settings: &RunSettings<'_>) -> std::io::Result<()>
where
    A: ClientApi + ?Sized,
{
    let mut controller = ListController::new(settings.page_size);

    let request = match command {
        Command::Export => return export_to(&mut controller, api, settings.export_dir).await,
        Command::Create { fields } => return create(api, fields, settings.phone_policy).await,
        Command::Lookup { shared_key } => controller.exact_key_lookup(&shared_key),
        Command::List { page } => controller.request_list(page, settings.page_size),
    };
    controller.run(api, request).await;

    for raised in controller.take_notices() {
        log::info!("{}: {}", notice::alert_class(raised.level), raised.message);
    }

    match controller.state() {
        ListState::Failed(kind) => Err(std::io::Error::other(kind.to_string())),
        _ => {
            let view = controller.view();
            log::info!(
                "Page {} of {} clients",
                view.page_number + 1,
                view.total_elements
            );
            for client in &view.clients {
                log::info!(
                    "{} {} <{}> {} {}..{}",
                    client.id,
                    client.shared_key,
                    client.email,
                    client.name,
                    client.start_date,
                    client.end_date
                );
            }
            Ok(())
        }
    }
}
