use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::SisError;
use crate::hashing::HashMap;
use crate::loader::load_graph;
use crate::log::{info, set_log_level, LevelFilter};
use crate::report::write_sweep_reports;
use crate::sweep::{run_sweep, Execution, SweepConfig};

/// Default cli arguments for the sweep runner
#[derive(Parser, Debug)]
#[command(name = "netsis")]
#[command(about = "Monte Carlo SIS prevalence sweeps over contact networks")]
pub struct BaseArgs {
    /// Edge list or Pajek (.net) files to sweep
    #[arg(required = true)]
    pub graphs: Vec<PathBuf>,

    /// Random seed
    #[arg(short, long, default_value = "0")]
    pub random_seed: u64,

    /// Optional path for a JSON sweep config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for report output
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Maximum level of log messages (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "off")]
    pub log_level: LevelFilter,

    /// Run the trials of each sweep point on all cores
    #[arg(long)]
    pub parallel: bool,
}

/// Parses the command line and runs the sweep it describes.
///
/// # Errors
///
/// Returns an error if the configuration or a graph cannot be loaded, the configuration is
/// invalid, or a report cannot be written.
pub fn run() -> Result<(), SisError> {
    run_with_args(BaseArgs::parse())
}

/// Runs the sweep described by `args`: every graph is loaded, swept with the same
/// configuration and written to `<output_dir>/<graph stem>_prevalence.csv` and
/// `<output_dir>/<graph stem>_series.csv`.
///
/// # Errors
///
/// See [`run`].
pub fn run_with_args(args: BaseArgs) -> Result<(), SisError> {
    // Logging starts out disabled.
    if args.log_level != LevelFilter::Off {
        set_log_level(args.log_level);
    }

    let config = match &args.config {
        Some(path) => {
            println!("Loading sweep config from: {}", path.display());
            SweepConfig::from_json_file(path)?
        }
        None => SweepConfig::default(),
    };
    config.validate()?;

    let execution = if args.parallel {
        Execution::Parallel
    } else {
        Execution::Sequential
    };

    let names = report_names(&args.graphs)?;
    for (path, name) in args.graphs.iter().zip(names) {
        let graph = load_graph(path)?;
        info!("loaded graph {name} from {}", path.display());

        let outcome = run_sweep(&config, &name, &graph, args.random_seed, execution)?;
        write_sweep_reports(&outcome, &args.output_dir, &name)?;
        println!(
            "{name}: {} points in {}",
            outcome.points.len(),
            humantime::format_duration(std::time::Duration::from_secs(
                outcome.elapsed.as_secs()
            ))
        );
    }
    Ok(())
}

fn graph_name(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "graph".to_string(), |stem| stem.to_string_lossy().into_owned())
}

/// Names the reports of each graph after its file stem. Two graphs with the same stem would
/// write to the same report files, so that is rejected before anything runs.
fn report_names(paths: &[PathBuf]) -> Result<Vec<String>, SisError> {
    let mut seen: HashMap<String, &Path> = HashMap::default();
    let mut names = Vec::with_capacity(paths.len());
    for path in paths {
        let name = graph_name(path);
        if let Some(previous) = seen.insert(name.clone(), path) {
            return Err(SisError::InvalidConfiguration(format!(
                "graphs {} and {} would both write reports named `{name}`",
                previous.display(),
                path.display()
            )));
        }
        names.push(name);
    }
    Ok(names)
}
