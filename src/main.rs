//! Funds Outrights CLI
//!
//! Command-line interface for computing, exporting and managing saved cases

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

use funds_outrights::api::Api;
use funds_outrights::export::{csv_bytes, render_workbook, one_month_spreads};
use funds_outrights::{AppConfig, ComputeRequest, MonthlySummary, ScenarioRunner};

#[derive(Parser)]
#[command(name = "funds_outrights", version, about = "Monthly funds-futures outrights from a policy-rate path")]
struct Cli {
    /// Target year (overrides OUTRIGHTS_YEAR)
    #[arg(long, global = true)]
    year: Option<i32>,

    /// Case store document (overrides OUTRIGHTS_CASES_FILE)
    #[arg(long, global = true)]
    cases_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute monthly outrights for a request file
    Compute {
        request: PathBuf,
        /// Also write the table as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Export a request (csv) or the saved cases (xlsx)
    Export {
        request: PathBuf,
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        #[arg(long)]
        output: PathBuf,
    },
    /// Compare outrights across several request files
    Compare {
        #[arg(required = true)]
        requests: Vec<PathBuf>,
    },
    /// Manage saved cases
    Cases {
        #[command(subcommand)]
        action: CaseAction,
    },
}

#[derive(Subcommand)]
enum CaseAction {
    List,
    Show { id: usize },
    Save {
        request: PathBuf,
        #[arg(long)]
        name: Option<String>,
    },
    Delete { id: usize },
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Xlsx,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    if let Some(year) = cli.year {
        config = config.with_year(year);
    }
    if let Some(path) = cli.cases_file {
        config = config.with_cases_path(path);
    }

    let api = Api::new(config.clone());

    match cli.command {
        Command::Compute { request, csv } => {
            let results = api.compute_value(&read_request(&request)?)?;
            print_table(&results);
            if let Some(path) = csv {
                fs::write(&path, csv_bytes(&results)?)
                    .with_context(|| format!("Unable to write {}", path.display()))?;
                println!("\nCSV written to: {}", path.display());
            }
        }
        Command::Export { request, format, output } => {
            let payload = read_request(&request)?;
            let bytes = match format {
                ExportFormat::Csv => csv_bytes(&api.compute_value(&payload)?)?,
                ExportFormat::Xlsx => render_workbook(&api.workbook_cases(|| Ok(payload))?)?,
            };
            fs::write(&output, bytes)
                .with_context(|| format!("Unable to write {}", output.display()))?;
            println!("Export written to: {}", output.display());
        }
        Command::Compare { requests } => {
            let parsed = requests
                .iter()
                .map(|path| Ok(ComputeRequest::from_value(read_request(path)?)?))
                .collect::<Result<Vec<_>>>()?;
            let runner = ScenarioRunner::new(config);
            let results = runner.run_requests(&parsed)?;
            print_comparison(&requests, &results);
        }
        Command::Cases { action } => run_case_action(&api, action)?,
    }

    Ok(())
}

fn run_case_action(api: &Api, action: CaseAction) -> Result<()> {
    let store = api.store();
    match action {
        CaseAction::List => {
            let cases = store.list();
            if cases.is_empty() {
                println!("No saved cases in {}", store.path().display());
            }
            for case in cases {
                println!("{:>3}  {:<32} {}", case.id, case.name, case.created.to_rfc3339());
            }
        }
        CaseAction::Show { id } => {
            let case = store.get(id)?;
            println!("Case {}: {}", case.id, case.name);
            println!("  Created: {}", case.created.to_rfc3339());
            if let Some(updated) = case.updated {
                println!("  Updated: {}", updated.to_rfc3339());
            }
            println!("  Inputs:  {}", case.inputs);
            println!();
            print_table(&case.results);
        }
        CaseAction::Save { request, name } => {
            let payload = read_request(&request)?;
            let results = api.compute_value(&payload)?;
            let name = name.or_else(|| payload.get("name").and_then(Value::as_str).map(String::from));
            let case = store.append(name, payload, results)?;
            println!("Saved case {} ({})", case.id, case.name);
        }
        CaseAction::Delete { id } => {
            store.delete(id)?;
            println!("Deleted case {}; remaining cases renumbered", id);
        }
        CaseAction::Clear => {
            store.clear()?;
            println!("Cleared all cases");
        }
    }
    Ok(())
}

fn read_request(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Unable to read request {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("Request {} is not valid JSON", path.display()))?;
    if !value.is_object() {
        bail!("Request {} must be a JSON object", path.display());
    }
    Ok(value)
}

fn print_table(results: &[MonthlySummary]) {
    println!("{:<10} {:>14} {:>10} {:>10}", "Month", "Avg Rate (%)", "Outright", "1M Spread");
    println!("{}", "-".repeat(47));
    for (row, spread) in results.iter().zip(one_month_spreads(results)) {
        let spread = spread.map_or_else(|| "N/A".to_string(), |s| format!("{:.4}", s));
        println!("{:<10} {:>14.4} {:>10.4} {:>10}", row.month, row.avg_rate, row.outright, spread);
    }
}

fn print_comparison(paths: &[PathBuf], results: &[Vec<MonthlySummary>]) {
    print!("{:<10}", "Month");
    for path in paths {
        let label = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        print!(" {:>14}", label);
    }
    println!();

    let months = results.first().map_or(0, Vec::len);
    for m in 0..months {
        print!("{:<10}", results[0][m].month);
        for scenario in results {
            print!(" {:>14.4}", scenario[m].outright);
        }
        println!();
    }
}
