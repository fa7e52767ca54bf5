//! Painel - Municipal labor-market & GDP dashboard data engine
//!
//! Loads CAGED, RAIS and IBGE snapshots once and recomputes the derived
//! table behind each dashboard chart on demand.

mod charts;
mod cli;
mod dashboard;
mod data;
mod settings;
mod stats;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use charts::{default_bindings, ChartTable};
use cli::{Cli, Commands};
use dashboard::{Dashboard, DashboardContext};
use data::{column_names, CATALOG};
use settings::Settings;
use stats::Selection;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;

    let env = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&settings.logging.filter))
    };
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let data_dir = cli.data_dir.clone().unwrap_or(settings.data.dir);
    info!(data_dir = %data_dir.display(), "startup");

    let context = DashboardContext::load(&data_dir, CATALOG)
        .with_context(|| format!("loading datasets from {}", data_dir.display()))?;
    let dashboard = Dashboard::new(context, default_bindings());

    match cli.command {
        Commands::Check => check(&dashboard, cli.json),
        Commands::Charts => list_charts(&dashboard, cli.json),
        Commands::Options { input } => {
            let options = dashboard.options(&input)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&options)?);
            } else {
                for option in options {
                    println!("{option}");
                }
            }
            Ok(())
        }
        Commands::Chart { chart, select } => {
            let table = dashboard.render(&chart, &Selection::from_input(&select))?;
            print_table(&table, cli.json)
        }
        Commands::Input { input, value } => {
            let table = dashboard.on_input(&input, &value)?;
            print_table(&table, cli.json)
        }
    }
}

fn check(dashboard: &Dashboard, as_json: bool) -> Result<()> {
    let report: Vec<_> = dashboard
        .context()
        .datasets()
        .map(|(id, df)| json!({ "dataset": id, "rows": df.height(), "columns": column_names(df) }))
        .collect();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (id, df) in dashboard.context().datasets() {
            println!("{id:<22} {:>8} rows {:>3} columns", df.height(), df.width());
        }
        println!("all {} datasets loaded", report.len());
    }
    Ok(())
}

fn list_charts(dashboard: &Dashboard, as_json: bool) -> Result<()> {
    if as_json {
        let charts: Vec<_> = dashboard
            .bindings()
            .iter()
            .map(|b| {
                json!({
                    "chart": b.output_id,
                    "input": b.input_id,
                    "dataset": b.dataset,
                    "kind": b.kind,
                    "title": b.title,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&charts)?);
    } else {
        for b in dashboard.bindings() {
            println!(
                "{:<28} {:<32} {}",
                b.output_id,
                b.input_id.unwrap_or("-"),
                b.title
            );
        }
    }
    Ok(())
}

fn print_table(table: &ChartTable, as_json: bool) -> Result<()> {
    if table.is_empty() {
        warn!(chart = %table.chart_id, "selection matched no rows");
    }
    if as_json {
        println!("{}", serde_json::to_string_pretty(table)?);
    } else {
        println!("{} [{}]", table.title, table.chart_id);
        println!("{}", table.frame);
        println!("{}", table.source);
    }
    Ok(())
}
