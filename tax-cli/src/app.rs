use anyhow::{Context, Result, bail};
use chrono::Local;
use tax_core::db::{DbConfig, InMemoryRepositoryFactory, RepositoryRegistry};
use tax_core::{AppState, HistoryFilter, NewClientProfile};
use tax_db_sqlite::SqliteRepositoryFactory;
use tracing::{debug, info};

use crate::cli::{Command, EstimateArgs, HistoryArgs};
use crate::render;

/// Build a [`RepositoryRegistry`] pre-loaded with every backend that is
/// compiled into this binary.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry.register(Box::new(InMemoryRepositoryFactory));
    registry
}

/// Opens the configured backend and loads the calculation history from it.
pub async fn open_state(
    registry: &RepositoryRegistry,
    config: &DbConfig,
) -> Result<AppState> {
    debug!("connecting to {} backend", config.backend);
    let repo = registry.create(config).await.with_context(|| {
        format!(
            "Failed to open {} backend '{}' (available: {})",
            config.backend,
            config.connection_string,
            registry.available_backends().join(", ")
        )
    })?;

    AppState::open(repo)
        .await
        .context("Failed to load calculation history")
}

/// Runs `command` against `state` and returns what should be printed.
pub async fn execute(
    state: &mut AppState,
    registry: &RepositoryRegistry,
    command: Command,
) -> Result<String> {
    match command {
        Command::Estimate(args) => estimate(state, args).await,
        Command::History(args) if args.clear => {
            let cleared = state.clear_history().await?;
            Ok(format!("Cleared {cleared} calculation(s)."))
        }
        Command::History(args) => Ok(history(state, &args)),
        Command::Show { id, json } => {
            let Some(calculation) = state.history().get(&id) else {
                bail!("no calculation with id '{id}'");
            };
            if json {
                Ok(serde_json::to_string_pretty(calculation)?)
            } else {
                Ok(render::calculation_detail(calculation, &Local))
            }
        }
        Command::Remove { id } => {
            if !state.remove_calculation(&id).await? {
                bail!("no calculation with id '{id}'");
            }
            info!(%id, "calculation removed");
            Ok(format!("Removed calculation {id}."))
        }
        Command::Chat { question, id } => chat(state, &question, id),
        Command::Backends => Ok(registry.available_backends().join("\n")),
    }
}

async fn estimate(
    state: &mut AppState,
    args: EstimateArgs,
) -> Result<String> {
    let input = NewClientProfile {
        name: args.name,
        company_type: args.company_type,
        annual_revenue: args.revenue,
        state: args.state,
        sector: args.sector,
        reference_date: args.reference_month,
    };

    let calculation = state.calculate(input).await?;
    if args.json {
        Ok(serde_json::to_string_pretty(&calculation)?)
    } else {
        Ok(format!(
            "Calculation {}\n\n{}",
            calculation.id,
            render::calculation_report(&calculation)
        ))
    }
}

fn history(
    state: &AppState,
    args: &HistoryArgs,
) -> String {
    let filter = HistoryFilter {
        name_contains: args.search.clone(),
        company_type: args.company_type,
        sector: args.sector,
    };

    let cards: Vec<String> = state
        .history()
        .search(&filter)
        .take(args.limit.unwrap_or(usize::MAX))
        .map(|calculation| render::history_card(calculation, &Local))
        .collect();

    if cards.is_empty() {
        if state.history().is_empty() {
            "No calculations yet.".to_string()
        } else {
            "No calculations match the filter.".to_string()
        }
    } else {
        cards.join("\n")
    }
}

fn chat(
    state: &mut AppState,
    question: &str,
    id: Option<String>,
) -> Result<String> {
    let target = match id {
        Some(id) => id,
        None => match state.history().latest() {
            Some(latest) => latest.id.clone(),
            None => bail!("no calculation to ask about; run `estimate` first"),
        },
    };
    if !state.set_current(&target) {
        bail!("no calculation with id '{target}'");
    }

    match state.ask(question) {
        Some(reply) => Ok(reply.content.clone()),
        None => bail!("the question is empty"),
    }
}
