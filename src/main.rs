//! Solar Estimator CLI
//!
//! Command-line interface for savings projections and battery estimates

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use solar_estimator::{
    format::{money0, money2},
    input::{InputMode, RawValue},
    request::{ArbitrageRequest, BatteryRequest, SavingsRequest},
    scenario::STANDARD_SOLAR_ESCALATIONS,
    Catalogs, Estimator, EstimatorConfig, ScenarioRunner,
};

#[derive(Debug, Parser)]
#[command(name = "solar-estimator", version, about = "Solar savings and battery credit estimates")]
struct Cli {
    /// Directory with batteries.csv, programs.csv and seasons.csv (built-in tables if omitted)
    #[arg(long, global = true)]
    catalogs: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reject malformed and out-of-range input instead of coercing it
    #[arg(long, global = true)]
    strict: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Utility bill vs. solar payment over a horizon
    Savings(SavingsArgs),
    /// Battery program credit estimate
    Battery(BatteryArgs),
    /// Energy arbitrage estimate
    Arbitrage(ArbitrageArgs),
    /// Savings across solar escalation rates
    Sweep(SweepArgs),
    /// Run a JSON estimate request from a file ("-" for stdin)
    Request { path: String },
    /// List catalog entries
    Catalogs,
}

#[derive(Debug, Args)]
struct SavingsArgs {
    #[arg(long)]
    bill: Option<String>,
    #[arg(long)]
    solar: Option<String>,
    #[arg(long)]
    years: Option<String>,
    #[arg(long)]
    utility_esc: Option<String>,
    #[arg(long)]
    solar_esc: Option<String>,
    /// Print the year-by-year schedule
    #[arg(long)]
    schedule: bool,
    /// Write the year-by-year schedule to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl SavingsArgs {
    fn to_request(&self) -> SavingsRequest {
        SavingsRequest {
            monthly_bill: raw(&self.bill),
            monthly_solar: raw(&self.solar),
            years: raw(&self.years),
            utility_escalation: raw(&self.utility_esc),
            solar_escalation: raw(&self.solar_esc),
            include_schedule: self.schedule || self.csv.is_some(),
        }
    }
}

#[derive(Debug, Args)]
struct BatteryArgs {
    #[arg(long)]
    program: Option<String>,
    #[arg(long)]
    battery: Option<String>,
    #[arg(long)]
    quantity: Option<String>,
    #[arg(long)]
    perf: Option<String>,
    #[arg(long)]
    committed_kw: Option<String>,
}

#[derive(Debug, Args)]
struct ArbitrageArgs {
    #[arg(long)]
    season: Option<String>,
    /// Pick the season from a date (YYYY-MM-DD) when --season is absent
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    kwh_per_day: Option<String>,
    #[arg(long)]
    rte: Option<String>,
}

#[derive(Debug, Args)]
struct SweepArgs {
    #[command(flatten)]
    savings: SavingsArgs,
    /// Comma-separated solar escalation rates
    #[arg(long, value_delimiter = ',')]
    rates: Vec<f64>,
}

fn raw(value: &Option<String>) -> Option<RawValue> {
    value.as_deref().map(RawValue::from)
}

fn load_estimator(cli: &Cli) -> Result<Estimator> {
    let catalogs = match &cli.catalogs {
        Some(dir) => Catalogs::from_csv_path(dir)
            .with_context(|| format!("loading catalogs from {}", dir.display()))?,
        None => Catalogs::default_catalogs(),
    };

    let mut config = match &cli.config {
        Some(path) => EstimatorConfig::from_json_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EstimatorConfig::default(),
    };
    if cli.strict {
        config.input_mode = InputMode::Strict;
    }

    Ok(Estimator::new(&catalogs, config))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let estimator = load_estimator(&cli)?;

    match &cli.command {
        Command::Savings(args) => run_savings(&estimator, args, cli.json),
        Command::Battery(args) => run_battery(&estimator, args, cli.json),
        Command::Arbitrage(args) => run_arbitrage(&estimator, args, cli.json),
        Command::Sweep(args) => run_sweep(&estimator, args, cli.json),
        Command::Request { path } => run_request(&estimator, path),
        Command::Catalogs => run_catalogs(&estimator),
    }
}

fn run_savings(estimator: &Estimator, args: &SavingsArgs, json: bool) -> Result<()> {
    let section = estimator.savings(&args.to_request())?;

    if let (Some(path), Some(schedule)) = (&args.csv, &section.schedule) {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        schedule.write_csv(file)?;
        eprintln!("Schedule written to: {}", path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&section)?);
        return Ok(());
    }

    let d = &section.display;
    println!("Savings over {} years", section.result.horizon_years);
    println!("  Utility total:  {:>14}", d.utility_total);
    println!("  Solar total:    {:>14}", d.solar_total);
    println!("  Savings:        {:>14}", d.savings);
    println!();
    println!("Year {} snapshot", d.snapshot_year);
    println!("  Monthly utility: {:>13}", d.monthly_utility);
    println!("  Monthly solar:   {:>13}", d.monthly_solar);
    println!("  Monthly savings: {:>13}", d.monthly_savings);
    println!("  Annual savings:  {:>13}", d.annual_savings);

    if let Some(schedule) = section.schedule.as_ref().filter(|_| args.schedule) {
        println!();
        println!("{:>4} {:>12} {:>12} {:>14} {:>14} {:>14}",
            "Year", "Utility/mo", "Solar/mo", "Utility cum", "Solar cum", "Savings cum");
        println!("{}", "-".repeat(76));
        for row in &schedule.rows {
            println!("{:>4} {:>12} {:>12} {:>14} {:>14} {:>14}",
                row.year,
                money2(row.utility_monthly),
                money2(row.solar_monthly),
                money0(row.utility_cumulative),
                money0(row.solar_cumulative),
                money0(row.cumulative_savings),
            );
        }
        match schedule.break_even_year() {
            Some(year) => println!("\nBreak-even in year {}", year),
            None => println!("\nNo break-even within the horizon"),
        }
    }

    Ok(())
}

fn run_battery(estimator: &Estimator, args: &BatteryArgs, json: bool) -> Result<()> {
    let section = estimator.battery(&BatteryRequest {
        program: args.program.clone(),
        battery_model: args.battery.clone(),
        quantity: raw(&args.quantity),
        performance_factor: raw(&args.perf),
        committed_kw_per_unit: raw(&args.committed_kw),
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&section)?);
        return Ok(());
    }

    let r = &section.result;
    let d = &section.display;
    println!("{} x{} on {}", r.battery_label, r.quantity, r.program_label);
    println!("  Usable capacity:      {} kWh", d.usable_kwh);
    println!("  Discharge capability: {} kW", d.power_kw);
    println!("  Committed capacity:   {} kW", d.committed_kw);
    println!("  Monthly credit (avg): {}", d.monthly_credit);
    println!("  Annual credit:        {}", d.annual_credit);
    println!();
    println!("{}", d.note);
    Ok(())
}

fn run_arbitrage(estimator: &Estimator, args: &ArbitrageArgs, json: bool) -> Result<()> {
    let section = estimator.arbitrage(&ArbitrageRequest {
        season: args.season.clone(),
        date: args.date,
        kwh_shifted_per_day: raw(&args.kwh_per_day),
        round_trip_efficiency: raw(&args.rte),
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&section)?);
        return Ok(());
    }

    println!("{}: {} per month", section.result.season_label, section.display.monthly_value);
    println!("{}", section.display.detail);
    Ok(())
}

fn run_sweep(estimator: &Estimator, args: &SweepArgs, json: bool) -> Result<()> {
    let (utility, solar) = estimator.savings_series(&args.savings.to_request())?;
    let rates = if args.rates.is_empty() {
        STANDARD_SOLAR_ESCALATIONS.to_vec()
    } else {
        args.rates.clone()
    };

    let runner = ScenarioRunner::with_engine(estimator.projection_engine().clone());
    let points = runner.solar_escalation_sweep(utility, solar, &rates);

    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    println!("{:>8} {:>14} {:>14} {:>14}", "SolarEsc", "Utility total", "Solar total", "Savings");
    println!("{}", "-".repeat(53));
    for point in &points {
        let p = &point.projection;
        println!("{:>7.1}% {:>14} {:>14} {:>14}",
            point.value * 100.0,
            money0(p.utility_total),
            money0(p.solar_total),
            money0(p.savings),
        );
    }
    Ok(())
}

fn run_request(estimator: &Estimator, path: &str) -> Result<()> {
    let mut body = String::new();
    if path == "-" {
        std::io::stdin().read_to_string(&mut body)?;
    } else {
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut body))
            .with_context(|| format!("reading request {}", path))?;
    }

    println!("{}", estimator.handle_json(&body)?);
    Ok(())
}

fn run_catalogs(estimator: &Estimator) -> Result<()> {
    println!("Batteries:");
    for b in estimator.credit_engine().batteries().entries() {
        println!("  {:<12} {:<24} {:>5.1} kWh {:>5.1} kW  committed {:.1} kW",
            b.key, b.label, b.usable_capacity_kwh, b.max_discharge_kw, b.default_committed_kw);
    }
    println!("Programs:");
    for p in estimator.credit_engine().programs().entries() {
        println!("  {:<20} {:<28} ${}/kW/season x {}",
            p.key, p.label, p.rate_per_kw_per_season, p.seasons_per_year);
    }
    println!("Seasons:");
    for s in estimator.arbitrage_engine().seasons().entries() {
        println!("  {:<12} {:<24} value {} on {} off {}",
            s.key, s.label, s.peak_value_per_kwh, s.on_peak_rate, s.off_peak_rate);
    }
    Ok(())
}
