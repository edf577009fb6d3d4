use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use sn_graph::DofMap;
use sn_project::{ProjectResult, build_network, build_simulation};
use sn_sim::{RunOptions, SimRecord, run_sim};
use sn_solver::assemble;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sn-cli")]
#[command(about = "SpringNet CLI - mass-spring network simulation tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and structure
    Validate {
        /// Path to the scenario file (.yaml or .json)
        scenario_path: PathBuf,
    },
    /// Print network size, stiffness checks and the stability limit
    Inspect {
        /// Path to the scenario file (.yaml or .json)
        scenario_path: PathBuf,
    },
    /// Step a scenario for a fixed number of frames
    Run {
        /// Path to the scenario file (.yaml or .json)
        scenario_path: PathBuf,
        /// Number of frames to advance
        #[arg(long, default_value_t = 60)]
        frames: usize,
        /// Elapsed time per frame in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        frame_dt: f64,
        /// Record every N-th frame
        #[arg(long, default_value_t = 1)]
        every: usize,
        /// Write recorded snapshots as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ProjectResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Inspect { scenario_path } => cmd_inspect(&scenario_path),
        Commands::Run {
            scenario_path,
            frames,
            frame_dt,
            every,
            output,
        } => cmd_run(&scenario_path, frames, frame_dt, every, output.as_deref()),
    }
}

fn cmd_validate(scenario_path: &Path) -> ProjectResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = sn_project::load(scenario_path)?;
    // Topology checks only run when the network is built.
    build_network(&scenario.network)?;
    println!("✓ Scenario is valid");
    Ok(())
}

fn cmd_inspect(scenario_path: &Path) -> ProjectResult<()> {
    let scenario = sn_project::load(scenario_path)?;
    let options = &scenario.simulation;
    let network = build_network(&scenario.network)?;
    let dofs = DofMap::from_network(&network, options.dim);
    let system = assemble(&network, options.dim).map_err(sn_sim::SimError::from)?;

    println!("Scenario: {}", scenario.name);
    println!(
        "  Nodes: {} ({} fixed)",
        network.node_count(),
        network.fixed_count()
    );
    println!("  Springs: {}", network.spring_count());
    println!(
        "  DOFs: {} ({} free, dim {})",
        dofs.dof_count(),
        dofs.free_count(),
        options.dim
    );
    println!("  Model: {:?}, solver: {:?}", options.model, options.solver);
    println!("  K asymmetry: {:.3e}", system.max_asymmetry());

    let unconstrained: Vec<usize> = system
        .zero_diagonal_dofs()
        .into_iter()
        .filter(|&dof| !dofs.is_fixed(dof))
        .collect();
    if unconstrained.is_empty() {
        println!("  Free DOFs without stiffness: none");
    } else {
        println!("  Free DOFs without stiffness: {:?}", unconstrained);
    }

    match sn_sim::critical_time_step(&system, &dofs, options.damping) {
        Some(crit) => {
            let marker = if options.dt < crit { "✓" } else { "✗" };
            println!(
                "  Critical dt: {:.4e} s (nominal {:.4e} s {})",
                crit, options.dt, marker
            );
        }
        None => println!("  Critical dt: unbounded"),
    }
    Ok(())
}

fn cmd_run(
    scenario_path: &Path,
    frames: usize,
    frame_dt: f64,
    every: usize,
    output: Option<&Path>,
) -> ProjectResult<()> {
    let scenario = sn_project::load(scenario_path)?;
    println!("Running scenario: {}", scenario.name);
    println!("  frames = {}, frame_dt = {:.4} s", frames, frame_dt);

    let mut sim = build_simulation(&scenario)?;
    let opts = RunOptions {
        frame_dt,
        t_end: frames as f64 * frame_dt,
        max_frames: frames.max(1),
        record_every: every,
    };

    let started = Instant::now();
    let record = run_sim(&mut sim, &opts)?;
    let elapsed = started.elapsed();

    println!(
        "✓ Completed {} ticks to t = {:.4} s in {:.1} ms",
        sim.tick(),
        sim.time(),
        elapsed.as_secs_f64() * 1e3
    );
    print_summary(&record);

    if let Some(path) = output {
        write_record(path, &record)?;
        println!(
            "  Wrote {} snapshots to {}",
            record.snapshots.len(),
            path.display()
        );
    }
    info!(ticks = sim.tick(), warnings = record.warnings.len(), "run finished");
    Ok(())
}

fn print_summary(record: &SimRecord) {
    let Some(last) = record.snapshots.last() else {
        return;
    };
    println!("  Recorded frames: {}", record.snapshots.len());
    println!("  Max displacement: {:.6e}", last.max_displacement());
    if !record.warnings.is_empty() {
        println!("  Instability warnings: {}", record.warnings.len());
        if let Some(first) = record.warnings.first() {
            println!("    first: {}", first);
        }
    }

    const SHOWN: usize = 10;
    println!("  {:>6}  {:>12}  {:>12}  {:>12}", "node", "ux", "uy", "uz");
    for view in last.nodes.iter().filter(|n| !n.fixed).take(SHOWN) {
        let u = view.displacement;
        println!(
            "  {:>6}  {:>12.5e}  {:>12.5e}  {:>12.5e}",
            view.id, u.x, u.y, u.z
        );
    }
    let free = last.nodes.iter().filter(|n| !n.fixed).count();
    if free > SHOWN {
        println!("  ... {} more free nodes", free - SHOWN);
    }
}

fn write_record(path: &Path, record: &SimRecord) -> ProjectResult<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, record)?;
    writer.flush()?;
    Ok(())
}
