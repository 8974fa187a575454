//! BESS simulator entry point: CLI wiring and config-driven engine construction.

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bess_sim::config::ScenarioConfig;
use bess_sim::devices::Battery;
use bess_sim::io::{export_csv, load_market_csv};
use bess_sim::market::{MarketInterval, MarketSummary, SyntheticMarket};
use bess_sim::sim::engine::Engine;
use bess_sim::sim::kpi::KpiReport;
use bess_sim::sim::policy::TimeOfDayPolicy;

use crate::cli::Args;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let scenario = load_scenario(&args)?;
    let sim_config = scenario.simulation.sim_config();

    let intervals = market_data(&args, &scenario)?;
    if let Some(summary) = MarketSummary::from_intervals(&intervals) {
        println!("{summary}\n");
    }

    let battery = Battery::from_config(&scenario.battery).context("invalid battery parameters")?;
    println!("{battery}\n");

    let policy = TimeOfDayPolicy::from_config(&scenario.schedule);
    let mut engine = Engine::new(sim_config, battery, policy);
    let records = engine.run(&intervals).context("simulation failed")?;

    if args.print_records {
        for r in &records {
            println!("{r}");
        }
        println!();
    }

    let kpi = KpiReport::from_results(&records, engine.battery());
    println!("{kpi}");

    if let Some(path) = &args.telemetry_out {
        export_csv(&intervals, &records, engine.battery().name(), path)
            .with_context(|| format!("failed to write CSV to \"{}\"", path.display()))?;
        info!(path = %path.display(), rows = records.len(), "telemetry written");
    }

    Ok(())
}

/// Resolves the scenario from the command line, applies overrides, and validates it.
fn load_scenario(args: &Args) -> Result<ScenarioConfig> {
    let mut scenario = if let Some(path) = &args.scenario {
        ScenarioConfig::from_file(path)?
    } else if let Some(name) = &args.preset {
        ScenarioConfig::from_preset(name)?
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(seed) = args.seed {
        scenario.simulation.seed = seed;
    }
    if let Some(days) = args.days {
        scenario.simulation.days = days;
    }
    if let Some(date) = args.start_date {
        scenario.simulation.start_date = Some(date);
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        bail!("scenario has {} invalid field(s)", errors.len());
    }

    Ok(scenario)
}

fn market_data(args: &Args, scenario: &ScenarioConfig) -> Result<Vec<MarketInterval>> {
    if let Some(path) = &args.market_data {
        return load_market_csv(path)
            .with_context(|| format!("failed to load market data from \"{}\"", path.display()));
    }

    let start_date = scenario.simulation.resolved_start_date();
    let mut market = SyntheticMarket::new(
        scenario.market.clone(),
        &scenario.simulation.sim_config(),
        start_date,
    );
    Ok(market.generate())
}
