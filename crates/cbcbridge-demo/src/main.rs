//! Solves a small three-variable integer program through the CBC bridge.
//!
//! ```text
//! maximize    10x + 6y + 4z
//! subject to   x +  y +  z <= 100
//!             10x + 4y + 5z <= 600
//!              2x + 2y + 6z <= 300
//!              x, y, z >= 0 and integer
//! ```

mod memory;

use cbcbridge_cbc::{SolutionStatus, Solver, SolverConfig, SolverError};
use clap::{Parser, ValueEnum};
use memory::MemoryProbe;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const VARIABLE_NAMES: [&str; 3] = ["x", "y", "z"];
const OBJECTIVE: [f64; 3] = [10.0, 6.0, 4.0];
const ROWS: [([f64; 3], f64); 3] = [
    ([1.0, 1.0, 1.0], 100.0),
    ([10.0, 4.0, 5.0], 600.0),
    ([2.0, 2.0, 6.0], 300.0),
];
const INFINITY: f64 = 1e30;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Solve a fixed three-variable integer program with CBC"
)]
struct Cli {
    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// CBC console log level (0 silences the solver)
    #[arg(long, default_value_t = 0)]
    log_level: u32,

    /// Tracing filter directive, e.g. `debug` or `cbcbridge_cbc=trace`
    /// (falls back to RUST_LOG)
    #[arg(long)]
    trace: Option<String>,

    /// Build, solve and free the problem this many times while sampling RSS
    #[arg(long, default_value_t = 1)]
    repeat: u32,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Serialize)]
struct VariableValue {
    name: &'static str,
    value: f64,
}

#[derive(Debug, Clone, Serialize)]
struct MemoryReport {
    iterations: u32,
    rss_before_bytes: u64,
    rss_after_bytes: u64,
    rss_delta_bytes: i64,
}

#[derive(Debug, Clone, Serialize)]
struct Report {
    status: &'static str,
    status_code: i32,
    objective_value: f64,
    solve_time_seconds: f64,
    variables: Vec<VariableValue>,
    memory: Option<MemoryReport>,
}

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.trace.as_deref())?;
    if cli.repeat == 0 {
        return Err("repeat must be greater than zero".into());
    }

    let mut probe = MemoryProbe::new();
    let measure = cli.repeat > 1;
    if measure {
        probe.record("before")?;
    }

    let mut report = None;
    for iteration in 0..cli.repeat {
        let mut solver = build_fixture(cli.log_level)?;
        let status = solver.solve()?;
        debug!(
            component = "demo",
            operation = "solve",
            iteration,
            status = status.as_str(),
            "Solved fixture"
        );
        report = Some(build_report(&solver, status)?);
    }

    let Some(mut report) = report else {
        return Err("no solve was run".into());
    };

    if measure {
        probe.record("after")?;
        for snapshot in probe.snapshots() {
            debug!(
                component = "demo",
                operation = "memory",
                stage = %snapshot.stage,
                rss_bytes = snapshot.rss_bytes,
                age_ms = snapshot.timestamp.elapsed().as_millis() as u64,
                "RSS sample"
            );
        }
        if let (Some(first), Some(last)) = (probe.snapshots().first(), probe.snapshots().last()) {
            report.memory = Some(MemoryReport {
                iterations: cli.repeat,
                rss_before_bytes: first.rss_bytes,
                rss_after_bytes: last.rss_bytes,
                rss_delta_bytes: probe.total_diff().unwrap_or(0),
            });
        }
    }

    info!(
        component = "demo",
        operation = "report",
        status = report.status,
        objective = report.objective_value,
        "Fixture finished"
    );
    render(cli.format, &report)?;
    Ok(report.status_code == SolutionStatus::CODE_OPTIMAL)
}

fn init_tracing(filter: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match filter {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => return Ok(()),
        },
    };
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    Ok(())
}

fn build_fixture(log_level: u32) -> Result<Solver, SolverError> {
    let mut solver = Solver::with_config(SolverConfig::new().with_log_level(log_level));
    solver.set_objective(&OBJECTIVE)?;
    for index in 0..OBJECTIVE.len() {
        solver.set_variable_bounds(index, 0.0, INFINITY)?;
    }
    for (values, upper) in ROWS {
        solver.add_constraint(&[0, 1, 2], &values, -INFINITY, upper)?;
    }
    for index in 0..OBJECTIVE.len() {
        solver.set_variable_integer(index)?;
    }
    Ok(solver)
}

fn build_report(solver: &Solver, status: SolutionStatus) -> Result<Report, SolverError> {
    let variables = if status.is_optimal() {
        VARIABLE_NAMES
            .iter()
            .zip(solver.solution()?)
            .map(|(&name, &value)| VariableValue { name, value })
            .collect()
    } else {
        Vec::new()
    };
    Ok(Report {
        status: status.as_str(),
        status_code: status.code(),
        objective_value: solver.objective_value(),
        solve_time_seconds: solver
            .last_solution()
            .map_or(0.0, |solution| solution.solve_time_seconds()),
        variables,
        memory: None,
    })
}

fn render(format: OutputFormat, report: &Report) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Table => {
            print_table(report);
            Ok(())
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
            Ok(())
        }
    }
}

fn print_table(report: &Report) {
    println!("{:<12} {}", "status", report.status);
    println!("{:<12} {:.6}", "objective", report.objective_value);
    println!("{:<12} {:.3}s", "solve time", report.solve_time_seconds);
    if !report.variables.is_empty() {
        println!();
        println!("{:<8} {:>12}", "variable", "value");
        for variable in &report.variables {
            println!("{:<8} {:>12.3}", variable.name, variable.value);
        }
    }
    if let Some(memory) = &report.memory {
        println!();
        println!(
            "rss over {} runs: {} -> {} bytes ({:+})",
            memory.iterations, memory.rss_before_bytes, memory.rss_after_bytes, memory.rss_delta_bytes
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["simple-mip"]);
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.log_level, 0);
        assert_eq!(cli.repeat, 1);
        assert!(cli.trace.is_none());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "simple-mip",
            "--format",
            "json",
            "--repeat",
            "5",
            "--trace",
            "debug",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.repeat, 5);
        assert_eq!(cli.trace.as_deref(), Some("debug"));
    }

    #[test]
    fn test_fixture_report() {
        let mut solver = build_fixture(0).unwrap_or_else(|err| panic!("{}", err));
        let status = solver.solve().unwrap_or_else(|err| panic!("{}", err));
        let report = build_report(&solver, status).unwrap_or_else(|err| panic!("{}", err));
        assert_eq!(report.status, "optimal");
        assert_eq!(report.status_code, 0);
        assert!((report.objective_value - 732.0).abs() < 1e-6);
        let values: Vec<f64> = report.variables.iter().map(|v| v.value).collect();
        assert_eq!(values.len(), 3);
        assert!((values[0] - 33.0).abs() < 1e-6);
        assert!((values[1] - 67.0).abs() < 1e-6);
        assert!(values[2].abs() < 1e-6);

        let json = serde_json::to_string(&report).unwrap_or_else(|err| panic!("{}", err));
        assert!(json.contains("\"status\":\"optimal\""));
    }
}
