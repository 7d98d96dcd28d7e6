use clap::{Args, Parser, Subcommand, ValueEnum};
use lf_controls::StepScheme;
use lf_project::{ProjectError, Scenario, validate_scenario};
use lf_sim::{CascadeRecord, CascadeSummary, SimError, run_cascade};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lf-cli")]
#[command(about = "LevelFlow CLI - P-only tank level control in series", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario and export the time series
    Run {
        /// Path to a scenario YAML/JSON file (defaults to the two-tank study)
        scenario: Option<PathBuf>,
        #[command(flatten)]
        overrides: SimOverrides,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },
    /// Run a scenario and print level and flow statistics per tank
    Summary {
        /// Path to a scenario YAML/JSON file (defaults to the two-tank study)
        scenario: Option<PathBuf>,
        #[command(flatten)]
        overrides: SimOverrides,
    },
    /// Print the default scenario
    Defaults {
        /// Print JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
    /// Validate scenario file syntax and parameters
    Validate {
        /// Path to the scenario YAML/JSON file
        scenario: PathBuf,
    },
}

#[derive(Args)]
struct SimOverrides {
    /// Integration scheme
    #[arg(long)]
    scheme: Option<StepScheme>,
    /// Time step in seconds
    #[arg(long)]
    dt: Option<f64>,
    /// End time in seconds
    #[arg(long)]
    t_end: Option<f64>,
    /// Record every N-th step
    #[arg(long)]
    record_every: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    // Logs go to stderr so series written to stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            overrides,
            output,
            format,
        } => cmd_run(scenario.as_deref(), &overrides, output.as_deref(), format),
        Commands::Summary {
            scenario,
            overrides,
        } => cmd_summary(scenario.as_deref(), &overrides),
        Commands::Defaults { json } => cmd_defaults(json),
        Commands::Validate { scenario } => cmd_validate(&scenario),
    }
}

fn load_scenario(path: Option<&Path>, overrides: &SimOverrides) -> CliResult<Scenario> {
    let mut scenario = match path {
        Some(path) => lf_project::load(path)?,
        None => Scenario::default(),
    };

    if let Some(scheme) = overrides.scheme {
        scenario.sim.scheme = scheme;
    }
    if let Some(dt) = overrides.dt {
        scenario.sim.dt = dt;
    }
    if let Some(t_end) = overrides.t_end {
        scenario.sim.t_end = t_end;
    }
    if let Some(record_every) = overrides.record_every {
        scenario.sim.record_every = record_every;
    }

    validate_scenario(&scenario).map_err(ProjectError::from)?;
    tracing::info!(
        name = %scenario.name,
        tanks = scenario.tanks.len(),
        scheme = %scenario.sim.scheme,
        "scenario loaded"
    );
    Ok(scenario)
}

fn simulate(scenario: &Scenario) -> CliResult<CascadeRecord> {
    let mut cascade = scenario.build_cascade().map_err(ProjectError::from)?;
    let record = run_cascade(&mut cascade, &scenario.inflow, &scenario.sim)?;
    Ok(record)
}

fn cmd_run(
    scenario_path: Option<&Path>,
    overrides: &SimOverrides,
    output: Option<&Path>,
    format: OutputFormat,
) -> CliResult<()> {
    let scenario = load_scenario(scenario_path, overrides)?;
    eprintln!("Running scenario: {}", scenario.name);
    eprintln!(
        "  tanks = {}, scheme = {}, dt = {:.3} s, t_end = {:.1} s",
        scenario.tanks.len(),
        scenario.sim.scheme,
        scenario.sim.dt,
        scenario.sim.t_end
    );

    let record = simulate(&scenario)?;

    let content = match format {
        OutputFormat::Csv => record.to_csv(),
        OutputFormat::Json => serde_json::to_string_pretty(&record)?,
    };

    if let Some(path) = output {
        std::fs::write(path, content)?;
        eprintln!(
            "✓ Exported {} data points to {}",
            record.len(),
            path.display()
        );
    } else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()?;
    }

    if let Some(summary) = record.summary() {
        let mut stderr = io::stderr().lock();
        write_summary(&mut stderr, &summary)?;
    }
    Ok(())
}

fn cmd_summary(scenario_path: Option<&Path>, overrides: &SimOverrides) -> CliResult<()> {
    let scenario = load_scenario(scenario_path, overrides)?;
    let record = simulate(&scenario)?;

    println!("Scenario: {}", scenario.name);
    println!("  Time points: {}", record.len());
    match record.summary() {
        Some(summary) => write_summary(&mut io::stdout().lock(), &summary)?,
        None => println!("  No samples recorded (t_end shorter than dt)"),
    }
    Ok(())
}

fn cmd_defaults(json: bool) -> CliResult<()> {
    let scenario = Scenario::default();
    if json {
        println!("{}", serde_json::to_string_pretty(&scenario)?);
    } else {
        print!("{}", serde_yaml::to_string(&scenario)?);
    }
    Ok(())
}

fn cmd_validate(scenario_path: &Path) -> CliResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = lf_project::load(scenario_path)?;
    let cascade = scenario.build_cascade().map_err(ProjectError::from)?;
    println!("✓ Scenario is valid");
    for (name, tank) in cascade.names().iter().zip(cascade.tanks()) {
        let limit = tank
            .explicit_stability_limit()
            .map_or_else(|| "none".to_string(), |dt| format!("{dt:.1} s"));
        println!(
            "  {}: Kc = {:.4}, process gain = {:.6}, explicit dt limit = {}",
            name,
            tank.controller_gain(),
            tank.process_gain(),
            limit
        );
    }
    Ok(())
}

fn write_summary(out: &mut impl Write, summary: &CascadeSummary) -> io::Result<()> {
    writeln!(out, "\nSummary:")?;
    writeln!(
        out,
        "  {:<12} {:>10} {:>10} {:>10} {:>10}",
        "series", "min", "max", "mean", "swing"
    )?;
    let mut row = |label: &str, s: &lf_sim::SeriesStats| {
        writeln!(
            out,
            "  {:<12} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
            label, s.min, s.max, s.mean, s.swing
        )
    };
    row("inflow", &summary.inflow)?;
    for tank in &summary.tanks {
        row(&format!("{} level", tank.name), &tank.level)?;
        row(&format!("{} flow", tank.name), &tank.outflow)?;
    }
    Ok(())
}
