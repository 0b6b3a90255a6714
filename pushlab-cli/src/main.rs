use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use pushlab_core::diagnostics::{energy_series, format_run_error, gyration_speeds, EnergyReport};
use pushlab_core::{
    Comparison, IntegratorKind, Model, Outcome, Phase, RunLength, Scenario, ScenarioError,
    SimError,
};
use std::fmt::Display;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pushlab")]
#[command(about = "Particle pusher lab - integrate an oscillator or a charged particle", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file (TOML)
    Run {
        /// Path to the scenario file
        file: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Run a built-in scenario (forward, leapfrog, gyration)
    Preset {
        name: String,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// List built-in scenarios and integrators
    List,
}

#[derive(Args)]
struct Overrides {
    /// Time step (overrides the scenario)
    #[arg(long, value_name = "DT")]
    dt: Option<f64>,

    /// Integrator: forward_euler, semi_implicit_euler, leapfrog, boris
    #[arg(short, long, value_name = "NAME")]
    integrator: Option<String>,

    /// Number of periods to cover (overrides the scenario length)
    #[arg(long, value_name = "COUNT")]
    periods: Option<f64>,

    /// Print every Nth state of the trajectory next to the exact solution
    #[arg(long, value_name = "N")]
    every: Option<usize>,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    let result = match cli.command {
        Commands::Run { file, overrides } => run_file(&file, &overrides),
        Commands::Preset { name, overrides } => run_preset(&name, &overrides),
        Commands::List => {
            list();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_file(file: &PathBuf, overrides: &Overrides) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(file)?;
    let scenario = Scenario::from_toml_str(&source)?;
    run_scenario(scenario, overrides)
}

fn run_preset(name: &str, overrides: &Overrides) -> Result<(), Box<dyn std::error::Error>> {
    let scenario = Scenario::preset(name).ok_or_else(|| format!("unknown preset '{}'", name))?;
    run_scenario(scenario, overrides)
}

fn list() {
    println!("presets:");
    for scenario in Scenario::presets() {
        println!("  {:<10} {} (dt = {})", scenario.name, scenario.integrator, scenario.dt);
    }
    println!("integrators:");
    for kind in IntegratorKind::ALL {
        println!("  {}", kind);
    }
}

fn run_scenario(mut scenario: Scenario, overrides: &Overrides) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dt) = overrides.dt {
        scenario.dt = dt;
    }
    if let Some(name) = &overrides.integrator {
        scenario.integrator = IntegratorKind::from_name(name)
            .ok_or_else(|| format!("unknown integrator '{}'", name))?;
    }
    if let Some(periods) = overrides.periods {
        scenario.length = RunLength::Periods(periods);
    }

    println!("scenario {} ({}, dt = {})", scenario.name, scenario.integrator, scenario.dt);
    let outcome = match scenario.run() {
        Ok(outcome) => outcome,
        Err(ScenarioError::OscillatorDiverged(err)) => return Err(report_divergence(&err).into()),
        Err(ScenarioError::ParticleDiverged(err)) => return Err(report_divergence(&err).into()),
        Err(err) => return Err(err.into()),
    };
    match outcome {
        Outcome::Oscillator { model, comparison } => {
            summarize(&model, &comparison);
            if let Some(every) = overrides.every {
                print_table(&comparison, every);
            }
        }
        Outcome::ChargedParticle { model, comparison } => {
            summarize(&model, &comparison);
            let speeds = gyration_speeds(&model, &comparison.numerical);
            let spread = speeds.iter().fold(0.0_f64, |acc, s| acc.max((s - speeds[0]).abs()));
            println!("gyration speed spread    {:.3e}", spread);
            if let Some(every) = overrides.every {
                print_table(&comparison, every);
            }
        }
    }
    Ok(())
}

fn summarize<M: Model>(model: &M, comparison: &Comparison<M::Vector>) {
    let numerical = &comparison.numerical;
    println!("states                   {}", numerical.len());
    if let Some(last) = numerical.last() {
        println!("final time               {:.6}", last.time);
    }
    println!("max position error       {:.3e}", comparison.max_position_error());
    println!("max velocity error       {:.3e}", comparison.max_velocity_error());
    if let Some(report) = EnergyReport::from_series(&energy_series(model, numerical)) {
        println!("energy max deviation     {:.3e}", report.max_relative_deviation);
        println!("energy final drift       {:.3e}", report.final_relative_drift);
    }
}

/// Print the last finite state of a diverged run and return the error text
fn report_divergence<V: Phase + Display>(err: &SimError<V>) -> String {
    if let Some(last) = err.partial().and_then(|partial| partial.last()) {
        println!("last finite state        t = {:.6}", last.time);
        println!("  position               {}", last.position);
        println!("  velocity               {}", last.velocity);
    }
    format_run_error(err)
}

fn print_table<V: Phase + Display>(comparison: &Comparison<V>, every: usize) {
    println!("{:>10}  {:>24}  {:>24}", "t", "numerical", "exact");
    let rows = comparison
        .numerical
        .iter()
        .zip(comparison.analytic.iter())
        .step_by(every.max(1));
    for (num, exact) in rows {
        println!("{:>10.4}  {:>24}  {:>24}", num.time, num.position, exact.position);
    }
}
