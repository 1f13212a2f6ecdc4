use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tax_core::{CompanyType, ReferenceMonth, Sector, StateCode};

use crate::config::ConfigOverrides;
use crate::utils::{
    parse_company_type, parse_reference_month, parse_revenue, parse_sector, parse_state,
};

/// Estimated Brazilian tax obligations for accounting clients.
///
/// Calculations are kept in a history stored in the configured backend and
/// can be listed, inspected, removed and asked about afterwards.
#[derive(Debug, Parser)]
#[command(name = "tax-estimator", version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage backend (overrides the config file).
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Backend connection string.
    /// For SQLite this is a file path (e.g. `taxai.db`) or `:memory:`.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Log level or EnvFilter directive. `RUST_LOG` takes precedence.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            backend: self.backend.clone(),
            connection_string: self.db.clone(),
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Estimate the taxes of a client and record the result.
    Estimate(EstimateArgs),

    /// List recorded calculations, newest first.
    History(HistoryArgs),

    /// Show one recorded calculation in full.
    Show {
        id: String,

        /// Print the calculation as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Delete a recorded calculation.
    Remove { id: String },

    /// Ask a question about a calculation.
    Chat {
        question: String,

        /// Calculation to ask about. Defaults to the most recent one.
        #[arg(long)]
        id: Option<String>,
    },

    /// List the available storage backends.
    Backends,
}

#[derive(Debug, Clone, Args)]
pub struct EstimateArgs {
    /// Client or company name.
    #[arg(long)]
    pub name: String,

    /// INDIVIDUAL, SIMPLIFIED_CORP, PRESUMED_PROFIT_CORP, REAL_PROFIT_CORP
    /// (or PF, PJ_SIMPLES, PJ_PRESUMIDO, PJ_REAL).
    #[arg(long, value_parser = parse_company_type)]
    pub company_type: CompanyType,

    /// Gross annual revenue, e.g. `R$ 1.250.000,00` or `1250000.00`.
    #[arg(long, value_parser = parse_revenue, allow_negative_numbers = true)]
    pub revenue: Decimal,

    /// Two-letter state code.
    #[arg(long, value_parser = parse_state)]
    pub state: StateCode,

    /// TRADE, SERVICES, INDUSTRY or AGRIBUSINESS.
    #[arg(long, value_parser = parse_sector)]
    pub sector: Sector,

    /// Reference month as YYYY-MM.
    #[arg(long, value_parser = parse_reference_month)]
    pub reference_month: ReferenceMonth,

    /// Print the calculation as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct HistoryArgs {
    /// Only clients whose name contains this text.
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, value_parser = parse_company_type)]
    pub company_type: Option<CompanyType>,

    #[arg(long, value_parser = parse_sector)]
    pub sector: Option<Sector>,

    /// Show at most this many entries.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Delete every recorded calculation instead of listing them.
    #[arg(long, conflicts_with_all = ["search", "company_type", "sector", "limit"])]
    pub clear: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn estimate_parses_all_fields() {
        let cli = Cli::try_parse_from([
            "tax-estimator",
            "estimate",
            "--name",
            "Studio Lima",
            "--company-type",
            "pj_presumido",
            "--revenue",
            "R$ 100.000,00",
            "--state",
            "sp",
            "--sector",
            "services",
            "--reference-month",
            "2025-03",
        ])
        .unwrap();

        let Command::Estimate(args) = cli.command else {
            panic!("expected estimate");
        };
        assert_eq!(args.company_type, CompanyType::PresumedProfitCorp);
        assert_eq!(args.revenue, dec!(100000));
        assert_eq!(args.state, StateCode::SP);
        assert_eq!(args.sector, Sector::Services);
        assert!(!args.json);
    }

    #[test]
    fn estimate_rejects_negative_revenue() {
        let result = Cli::try_parse_from([
            "tax-estimator",
            "estimate",
            "--name",
            "Studio Lima",
            "--company-type",
            "PF",
            "--revenue",
            "-10",
            "--state",
            "SP",
            "--sector",
            "TRADE",
            "--reference-month",
            "2025-03",
        ]);

        let err = result.unwrap_err();
        assert!(err.to_string().contains("revenue must not be negative"));
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tax-estimator",
            "history",
            "--backend",
            "memory",
            "--log-level",
            "debug",
            "--limit",
            "5",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.backend.as_deref(), Some("memory"));
        assert_eq!(overrides.log_level.as_deref(), Some("debug"));
        assert_eq!(overrides.connection_string, None);
        let Command::History(args) = cli.command else {
            panic!("expected history");
        };
        assert_eq!(args.limit, Some(5));
    }

    #[test]
    fn history_clear_refuses_filters() {
        let cli = Cli::try_parse_from(["tax-estimator", "history", "--clear"]).unwrap();
        let Command::History(args) = cli.command else {
            panic!("expected history");
        };
        assert!(args.clear);

        let result = Cli::try_parse_from(["tax-estimator", "history", "--clear", "--search", "Lima"]);
        assert!(result.is_err());
    }

    #[test]
    fn chat_takes_question_and_optional_id() {
        let cli =
            Cli::try_parse_from(["tax-estimator", "chat", "quando vence?", "--id", "calc-1"]).unwrap();

        let Command::Chat { question, id } = cli.command else {
            panic!("expected chat");
        };
        assert_eq!(question, "quando vence?");
        assert_eq!(id.as_deref(), Some("calc-1"));
    }
}
