#![warn(clippy::uninlined_format_args)]

mod bootstrap;

use bootstrap::{AppConfig, init_logging};
use splitledger_application::{GroupId, GroupReport, LedgerService};
use splitledger_infrastructure::TextLedgerSource;
use std::{borrow::Cow, env, fs, path::Path, process};

type CliResult<T> = Result<T, Cow<'static, str>>;

const USAGE: &str = "Usage: splitledger <file.ledger> [--strict]";

fn main() {
    init_logging();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

#[derive(Debug, PartialEq, Eq)]
struct CliArgs {
    path: String,
    strict: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> CliResult<CliArgs> {
    let mut path = None;
    let mut strict = false;

    for arg in args {
        if arg == "--strict" {
            strict = true;
        } else if arg.starts_with("--") {
            return Err(format!("Unknown option '{arg}'\n{USAGE}").into());
        } else if path.is_none() {
            path = Some(arg);
        } else {
            return Err(USAGE.into());
        }
    }

    let Some(path) = path else {
        return Err(USAGE.into());
    };
    Ok(CliArgs { path, strict })
}

fn run() -> CliResult<()> {
    let args = parse_args(env::args().skip(1))?;
    let config = AppConfig::from_env()
        .map_err(|err| err.to_string())?
        .with_strict_override(args.strict);
    tracing::debug!(
        path = %args.path,
        policy = %config.ledger.reference_policy,
        "Loading ledger"
    );

    let content = fs::read_to_string(&args.path)
        .map_err(|err| format!("Failed to read '{}': {err}", args.path))?;

    let group = group_id_for(&args.path);
    let source = TextLedgerSource::new().with_document(group.clone(), content);
    let service = LedgerService::new(&source, config.ledger);

    let report = service.report(&group).map_err(|err| err.to_string())?;
    println!("{}", render_report(&report));
    Ok(())
}

fn group_id_for(path: &str) -> GroupId {
    let stem = Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("ledger");
    GroupId::from(stem)
}

fn render_report(report: &GroupReport) -> String {
    let width = report
        .balances
        .iter()
        .map(|balance| balance.member.as_str().len())
        .max()
        .unwrap_or(0);

    let mut lines = vec!["Balances:".to_string()];
    for balance in &report.balances {
        let name = balance.member.as_str();
        let amount = balance.net_balance;
        let sign = if amount.is_positive() { "+" } else { "" };
        lines.push(format!("  {name:<width$}  {sign}{amount}"));
    }

    if report.is_settled() {
        lines.push("Everyone is settled up.".to_string());
    } else {
        lines.push("Transfers:".to_string());
        for transfer in &report.transfers {
            lines.push(format!(
                "  {} -> {}: {}",
                transfer.from, transfer.to, transfer.amount
            ));
        }
    }

    if !report.residue.debt.is_zero() || !report.residue.credit.is_zero() {
        lines.push(format!(
            "Unmatched residue: debt {}, credit {}",
            report.residue.debt, report.residue.credit
        ));
    }

    lines.push(format!("Total expenses: {}", report.total_expenses));
    lines.join("\n")
}
