//! Subcommands executed end-to-end against the in-memory backend.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_cli::app;
use tax_cli::cli::{Command, EstimateArgs, HistoryArgs};
use tax_core::clock::{FixedClock, SequentialIds};
use tax_core::db::{DbConfig, RepositoryRegistry};
use tax_core::history::HistoryStore;
use tax_core::{AppState, CompanyType, ReferenceMonth, Sector, StateCode, TaxCalculation};

async fn setup() -> (AppState, RepositoryRegistry) {
    let registry = app::build_registry();
    let repo = registry
        .create(&DbConfig {
            backend: "memory".to_string(),
            connection_string: String::new(),
        })
        .await
        .expect("memory backend should be registered");
    let history = HistoryStore::open(repo).await.unwrap();
    let state = AppState::new(
        history,
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap())),
        Arc::new(SequentialIds::new("cli")),
    );
    (state, registry)
}

fn estimate_args(
    name: &str,
    company_type: CompanyType,
    sector: Sector,
) -> EstimateArgs {
    EstimateArgs {
        name: name.to_string(),
        company_type,
        revenue: dec!(100000),
        state: StateCode::SP,
        sector,
        reference_month: ReferenceMonth::new(2025, 3).unwrap(),
        json: false,
    }
}

#[tokio::test]
async fn test_estimate_prints_report_and_records_it() {
    let (mut state, registry) = setup().await;

    let output = app::execute(
        &mut state,
        &registry,
        Command::Estimate(estimate_args(
            "Studio Lima",
            CompanyType::PresumedProfitCorp,
            Sector::Services,
        )),
    )
    .await
    .unwrap();

    assert!(output.starts_with("Calculation cli-2\n\nTax "));
    assert!(output.contains("Total: R$ 22.330,00\n"));
    assert!(output.contains(
        "For Studio Lima, with revenue of R$ 100.000,00, the estimated taxes are: IRPJ, CSLL, PIS and others."
    ));
    assert_eq!(state.calculations().count(), 1);
}

#[tokio::test]
async fn test_estimate_json_round_trips() {
    let (mut state, registry) = setup().await;
    let mut args = estimate_args("Loja Azul", CompanyType::SimplifiedCorp, Sector::Trade);
    args.json = true;

    let output = app::execute(&mut state, &registry, Command::Estimate(args))
        .await
        .unwrap();

    let calculation: TaxCalculation = serde_json::from_str(&output).unwrap();
    assert_eq!(calculation.client.name, "Loja Azul");
    assert_eq!(Some(&calculation), state.current());
}

#[tokio::test]
async fn test_estimate_rejects_short_name() {
    let (mut state, registry) = setup().await;

    let err = app::execute(
        &mut state,
        &registry,
        Command::Estimate(estimate_args("X", CompanyType::Individual, Sector::Services)),
    )
    .await
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid client profile: name must have at least 2 characters"
    );
    assert_eq!(state.calculations().count(), 0);
}

#[tokio::test]
async fn test_history_filters_and_limits() {
    let (mut state, registry) = setup().await;
    for (name, company_type, sector) in [
        ("Padaria Sol", CompanyType::SimplifiedCorp, Sector::Trade),
        ("Studio Lima", CompanyType::PresumedProfitCorp, Sector::Services),
        ("Solar Engenharia", CompanyType::RealProfitCorp, Sector::Services),
    ] {
        app::execute(
            &mut state,
            &registry,
            Command::Estimate(estimate_args(name, company_type, sector)),
        )
        .await
        .unwrap();
    }

    let by_name = app::execute(
        &mut state,
        &registry,
        Command::History(HistoryArgs {
            search: Some("sol".to_string()),
            ..HistoryArgs::default()
        }),
    )
    .await
    .unwrap();
    let names: Vec<&str> = by_name
        .lines()
        .filter(|line| !line.starts_with(' ') && !line.is_empty())
        .collect();
    assert_eq!(names, vec!["Solar Engenharia  [cli-6]", "Padaria Sol  [cli-2]"]);

    let limited = app::execute(
        &mut state,
        &registry,
        Command::History(HistoryArgs {
            sector: Some(Sector::Services),
            limit: Some(1),
            ..HistoryArgs::default()
        }),
    )
    .await
    .unwrap();
    assert!(limited.starts_with("Solar Engenharia  [cli-6]\n"));
    assert!(!limited.contains("Studio Lima"));

    let none = app::execute(
        &mut state,
        &registry,
        Command::History(HistoryArgs {
            company_type: Some(CompanyType::Individual),
            ..HistoryArgs::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(none, "No calculations match the filter.");
}

#[tokio::test]
async fn test_history_when_empty() {
    let (mut state, registry) = setup().await;

    let output = app::execute(&mut state, &registry, Command::History(HistoryArgs::default()))
        .await
        .unwrap();

    assert_eq!(output, "No calculations yet.");
}

#[tokio::test]
async fn test_history_clear_empties_store() {
    let (mut state, registry) = setup().await;
    for name in ["Padaria Sol", "Studio Lima"] {
        app::execute(
            &mut state,
            &registry,
            Command::Estimate(estimate_args(name, CompanyType::SimplifiedCorp, Sector::Trade)),
        )
        .await
        .unwrap();
    }

    let output = app::execute(
        &mut state,
        &registry,
        Command::History(HistoryArgs {
            clear: true,
            ..HistoryArgs::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(output, "Cleared 2 calculation(s).");

    let listing = app::execute(&mut state, &registry, Command::History(HistoryArgs::default()))
        .await
        .unwrap();
    assert_eq!(listing, "No calculations yet.");
    assert!(state.current().is_none());
}

#[tokio::test]
async fn test_show_and_remove() {
    let (mut state, registry) = setup().await;
    app::execute(
        &mut state,
        &registry,
        Command::Estimate(estimate_args("Studio Lima", CompanyType::PresumedProfitCorp, Sector::Services)),
    )
    .await
    .unwrap();

    let shown = app::execute(
        &mut state,
        &registry,
        Command::Show {
            id: "cli-2".to_string(),
            json: false,
        },
    )
    .await
    .unwrap();
    assert!(shown.starts_with("Calculation cli-2\n"));
    assert!(shown.contains("Regime:          Company - Lucro Presumido\n"));

    let removed = app::execute(&mut state, &registry, Command::Remove { id: "cli-2".to_string() })
        .await
        .unwrap();
    assert_eq!(removed, "Removed calculation cli-2.");

    let err = app::execute(
        &mut state,
        &registry,
        Command::Show {
            id: "cli-2".to_string(),
            json: true,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "no calculation with id 'cli-2'");
}

#[tokio::test]
async fn test_chat_defaults_to_latest_calculation() {
    let (mut state, registry) = setup().await;
    for name in ["Primeira Ltda", "Segunda Ltda"] {
        app::execute(
            &mut state,
            &registry,
            Command::Estimate(estimate_args(name, CompanyType::RealProfitCorp, Sector::Industry)),
        )
        .await
        .unwrap();
    }

    let answer = app::execute(
        &mut state,
        &registry,
        Command::Chat {
            question: "Quais os prazos?".to_string(),
            id: None,
        },
    )
    .await
    .unwrap();
    assert!(answer.starts_with("The main deadlines for Segunda Ltda are:"));

    let answer = app::execute(
        &mut state,
        &registry,
        Command::Chat {
            question: "regime?".to_string(),
            id: Some("cli-2".to_string()),
        },
    )
    .await
    .unwrap();
    assert!(answer.contains("(Company - Lucro Real)"));
}

#[tokio::test]
async fn test_chat_without_history_fails() {
    let (mut state, registry) = setup().await;

    let err = app::execute(
        &mut state,
        &registry,
        Command::Chat {
            question: "hello".to_string(),
            id: None,
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "no calculation to ask about; run `estimate` first");
}

#[tokio::test]
async fn test_backends_lists_registered_names() {
    let (mut state, registry) = setup().await;

    let output = app::execute(&mut state, &registry, Command::Backends).await.unwrap();

    assert_eq!(output, "memory\nsqlite");
}
