//! Hobart CLI binary.
//!
//! Runs the VaR engine either on a bundled synthetic demo portfolio or on
//! position and return files supplied by the caller.

use chrono::Utc;
use clap::{Parser, Subcommand};
use hobart::engine::{EngineConfig, VarEngine};
use hobart::{
    AssetClass, ConfidenceLevel, MonteCarloConfig, Position, ReturnMatrix, TimeHorizon, VarMethod,
    VarRequest, VarResult,
};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "hobart")]
#[command(about = "Hobart: portfolio Value-at-Risk engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the engine on a seeded synthetic multi-asset portfolio
    Demo {
        /// Number of instruments in the synthetic portfolio
        #[arg(long, default_value = "8")]
        assets: usize,

        /// Days of synthetic return history
        #[arg(long, default_value = "252")]
        days: usize,

        #[command(flatten)]
        calc: CalcArgs,
    },

    /// Run the engine on position and return CSV files
    Run {
        /// Positions CSV (position_id,security_id,symbol,market_value,asset_class,sector)
        positions: PathBuf,

        /// Returns CSV (header row of symbols, one row per trading day)
        returns: PathBuf,

        #[command(flatten)]
        calc: CalcArgs,
    },
}

#[derive(clap::Args)]
struct CalcArgs {
    /// Methodology: parametric, historical or monte-carlo
    #[arg(long, default_value = "parametric")]
    method: String,

    /// Confidence level in percent (95, 99 or 99.9)
    #[arg(long, default_value = "95")]
    confidence: f64,

    /// Horizon code (1D, 1W, 2W, 1M, 3M, 6M, 1Y)
    #[arg(long, default_value = "1D")]
    horizon: String,

    /// Monte Carlo simulation count
    #[arg(long, default_value = "10000")]
    simulations: usize,

    /// Monte Carlo seed (also seeds the demo generator)
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Backtest the model against the same return window
    #[arg(long)]
    backtest: bool,

    /// Write the full result as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the decomposition tables as CSV to this path
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { assets, days, calc } => {
            let (positions, returns) = synthetic_portfolio(assets, days, calc.seed)?;
            calculate_and_report("demo-portfolio", &positions, &returns, &calc)
        }
        Commands::Run {
            positions,
            returns,
            calc,
        } => {
            let positions = load_positions(&positions)?;
            let returns = load_returns(&returns)?;
            calculate_and_report("portfolio", &positions, &returns, &calc)
        }
    }
}

fn calculate_and_report(
    portfolio_id: &str,
    positions: &[Position],
    returns: &ReturnMatrix,
    calc: &CalcArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = VarRequest {
        portfolio_id: portfolio_id.to_string(),
        tenant_id: "cli".to_string(),
        as_of_date: Utc::now().date_naive(),
        method: parse_method(&calc.method)?,
        confidence: ConfidenceLevel::try_from_percent(calc.confidence)?,
        horizon: TimeHorizon::parse(&calc.horizon)?,
        include_backtest: calc.backtest,
    };
    let engine = VarEngine::new(EngineConfig {
        monte_carlo: MonteCarloConfig {
            simulations: calc.simulations,
            seed: Some(calc.seed),
        },
        ..EngineConfig::default()
    });

    let result = engine.calculate(&request, positions, returns)?;
    print_result(&result, positions);

    if let Some(path) = &calc.json {
        std::fs::write(path, hobart::report::to_json(&result)?)?;
        println!("Result written to {}", path.display());
    }
    if let Some(path) = &calc.csv {
        std::fs::write(path, hobart::report::decomposition_csv(&result)?)?;
        println!("Decomposition written to {}", path.display());
    }
    Ok(())
}

fn parse_method(name: &str) -> Result<VarMethod, String> {
    match name.to_lowercase().as_str() {
        "parametric" => Ok(VarMethod::Parametric),
        "historical" => Ok(VarMethod::HistoricalSimulation),
        "monte-carlo" | "montecarlo" => Ok(VarMethod::MonteCarlo),
        other => Err(format!(
            "unknown method '{other}' (expected parametric, historical or monte-carlo)"
        )),
    }
}

fn print_result(result: &VarResult, positions: &[Position]) {
    let total_value: f64 = positions.iter().map(|p| p.market_value).sum();

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!(
        "║{:^62}║",
        format!("PORTFOLIO VALUE-AT-RISK: {}", result.request.method)
    );
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Portfolio:        {}", result.request.portfolio_id);
    println!(
        "Positions:        {} (net value ${total_value:.2})",
        positions.len()
    );
    println!(
        "Confidence:       {}%  Horizon: {}",
        result.request.confidence.percent(),
        result.request.horizon
    );
    println!();
    println!("Total VaR:              ${:>14.2}", result.total_var);
    println!("Undiversified VaR:      ${:>14.2}", result.undiversified_var);
    println!(
        "Diversification benefit:${:>14.2}",
        result.diversification_benefit
    );

    println!("\nComponent VaR by asset class");
    println!("{:<16} {:>14} {:>10} {:>10}", "group", "var", "% total", "avg corr");
    for component in &result.component_var {
        println!(
            "{:<16} {:>14.2} {:>9.1}% {:>10.3}",
            component.group_key,
            component.var_amount,
            component.percent_of_total,
            component.intra_group_correlation
        );
    }

    println!("\nMarginal contributions (Euler)");
    println!("{:<16} {:>14} {:>14} {:>10}", "position", "marginal", "contribution", "% total");
    for marginal in &result.marginal_var {
        println!(
            "{:<16} {:>14.2} {:>14.2} {:>9.1}%",
            marginal.position_id,
            marginal.marginal_var,
            marginal.contribution,
            marginal.percent_contribution
        );
    }

    println!("\nIncremental VaR (leave one out)");
    println!("{:<16} {:>14} {:>14}", "position", "incremental", "var without");
    for incremental in &result.incremental_var {
        println!(
            "{:<16} {:>14.2} {:>14.2}",
            incremental.position_id, incremental.incremental_var, incremental.var_without
        );
    }

    if let Some(backtest) = &result.backtest {
        println!("\nBacktest ({} days)", backtest.test_period_days);
        println!(
            "Exceptions:       {} observed ({:.2}% vs {:.2}% expected)",
            backtest.exceptions,
            100.0 * backtest.exception_rate,
            100.0 * backtest.expected_exception_rate
        );
        println!(
            "Kupiec:           LR = {:.3} vs {:.3}  ->  {}",
            backtest.kupiec.lr_statistic,
            backtest.kupiec.critical_value,
            if backtest.kupiec.reject_null { "REJECT" } else { "pass" }
        );
        println!(
            "Christoffersen:   LR = {:.3} vs {:.3}  ->  {}",
            backtest.christoffersen.lr_statistic,
            backtest.christoffersen.critical_value,
            if backtest.christoffersen.reject_null { "REJECT" } else { "pass" }
        );
        println!(
            "Model accurate:   {}",
            if backtest.model_accurate { "yes" } else { "no" }
        );
    }

    println!("\nCalculated in {} ms (result {})", result.calculation_time_ms, result.id);
}

/// Seeded one-factor return generator: a shared market factor with
/// per-instrument beta plus idiosyncratic noise, so the instruments are
/// genuinely correlated without being collinear.
fn synthetic_portfolio(
    assets: usize,
    days: usize,
    seed: u64,
) -> Result<(Vec<Position>, ReturnMatrix), Box<dyn std::error::Error>> {
    if assets == 0 || days == 0 {
        return Err("assets and days must both be positive".into());
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let market = Normal::new(0.0, 0.010)?;
    let idio = Normal::new(0.0, 0.008)?;

    let classes = [
        (AssetClass::Equity, "Tech"),
        (AssetClass::Equity, "Energy"),
        (AssetClass::FixedIncome, "Rates"),
        (AssetClass::Commodity, "Metals"),
        (AssetClass::Currency, "G10"),
    ];
    let mut positions = Vec::with_capacity(assets);
    let mut betas = Vec::with_capacity(assets);
    for i in 0..assets {
        let (asset_class, sector) = &classes[i % classes.len()];
        let symbol = format!("SYN{i:02}");
        positions.push(Position::new(
            format!("pos-{i:02}"),
            format!("sec-{i:02}"),
            &symbol,
            rng.gen_range(50_000.0..500_000.0_f64).round(),
            asset_class.clone(),
            *sector,
        ));
        betas.push(rng.gen_range(0.3..1.5_f64));
    }

    let mut data = Array2::zeros((days, assets));
    for t in 0..days {
        let factor = market.sample(&mut rng);
        for (j, beta) in betas.iter().enumerate() {
            data[[t, j]] = beta * factor + idio.sample(&mut rng);
        }
    }
    let symbols = positions.iter().map(|p| p.symbol.clone()).collect();
    Ok((positions, ReturnMatrix::new(data, symbols)?))
}

fn load_positions(path: &Path) -> Result<Vec<Position>, Box<dyn std::error::Error>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut positions = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() != 6 {
            return Err(format!(
                "{}: expected 6 columns per position, got {}",
                path.display(),
                record.len()
            )
            .into());
        }
        positions.push(Position::new(
            &record[0],
            &record[1],
            &record[2],
            record[3].parse::<f64>()?,
            parse_asset_class(&record[4]),
            &record[5],
        ));
    }
    Ok(positions)
}

fn parse_asset_class(label: &str) -> AssetClass {
    match label {
        "EQUITY" => AssetClass::Equity,
        "FIXED_INCOME" => AssetClass::FixedIncome,
        "COMMODITY" => AssetClass::Commodity,
        "CURRENCY" => AssetClass::Currency,
        "ALTERNATIVE" => AssetClass::Alternative,
        other => AssetClass::Other(other.to_string()),
    }
}

fn load_returns(path: &Path) -> Result<ReturnMatrix, Box<dyn std::error::Error>> {
    let mut reader = csv::Reader::from_path(path)?;
    let symbols: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows: Vec<f64> = Vec::new();
    let mut days = 0;
    for record in reader.records() {
        let record = record?;
        if record.len() != symbols.len() {
            return Err(format!(
                "{}: row {} has {} cells, header has {}",
                path.display(),
                days + 1,
                record.len(),
                symbols.len()
            )
            .into());
        }
        for cell in record.iter() {
            rows.push(cell.trim().parse::<f64>()?);
        }
        days += 1;
    }

    let data = Array2::from_shape_vec((days, symbols.len()), rows)?;
    Ok(ReturnMatrix::new(data, symbols)?)
}
