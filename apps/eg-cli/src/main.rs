use clap::{Parser, Subcommand};
use eg_core::units::{kgps, pa};
use eg_engine::OperatingPoint;
use eg_project::{FluidBackendDef, Project, ProjectError, ProjectResult};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "eg-cli")]
#[command(about = "EngineGen CLI - liquid rocket engine sizing tool", long_about = None)]
struct Cli {
    /// Use the built-in liquid property model instead of CoolProp
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Size the engine and print the design report
    Design {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Print the temperature-adjusted propellant cards in CEA input format
    Cards {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Evaluate thrust at an off-design operating point
    Thrust {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Ambient pressure in Pa
        #[arg(long)]
        ambient_pa: Option<f64>,
        /// Total mass flow in kg/s
        #[arg(long)]
        mass_flow: Option<f64>,
        /// Oxidizer-to-fuel mass ratio
        #[arg(long)]
        mixture_ratio: Option<f64>,
        /// Chamber pressure in Pa (defaults to the throttled value)
        #[arg(long)]
        chamber_pressure_pa: Option<f64>,
    },
    /// Thrust and Isp over the project's ambient pressures
    Sweep {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Mass and CG history of the tank stack over the burn
    TankCg {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Number of time steps (defaults to the project's setting)
        #[arg(long)]
        steps: Option<usize>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ProjectResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let offline = cli.offline;

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Design { project_path } => cmd_design(&load(&project_path, offline)?),
        Commands::Cards { project_path } => cmd_cards(&load(&project_path, offline)?),
        Commands::Thrust {
            project_path,
            ambient_pa,
            mass_flow,
            mixture_ratio,
            chamber_pressure_pa,
        } => {
            let point = OperatingPoint {
                ambient_pressure: ambient_pa.map(pa),
                mass_flow: mass_flow.map(kgps),
                mixture_ratio,
                chamber_pressure: chamber_pressure_pa.map(pa),
            };
            cmd_thrust(&load(&project_path, offline)?, &point)
        }
        Commands::Sweep { project_path } => cmd_sweep(&load(&project_path, offline)?),
        Commands::TankCg {
            project_path,
            steps,
            output,
        } => cmd_tank_cg(&load(&project_path, offline)?, steps, output.as_deref()),
    }
}

fn load(project_path: &Path, offline: bool) -> ProjectResult<Project> {
    let mut project = eg_project::load_yaml(project_path)?;
    if offline {
        project.fluids = FluidBackendDef::Incompressible;
    }
    info!(project = %project.name, fluids = ?project.fluids, "loaded project");
    Ok(project)
}

fn cmd_validate(project_path: &Path) -> ProjectResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = eg_project::load_yaml(project_path)?;
    eg_project::validate_project(&project)?;
    println!("✓ Project is valid");
    Ok(())
}

fn cmd_design(project: &Project) -> ProjectResult<()> {
    let engine = project.design_engine()?;
    println!("{}", engine.summary());
    Ok(())
}

fn cmd_cards(project: &Project) -> ProjectResult<()> {
    let engine = project.design_engine()?;
    for side in [engine.fuel(), engine.oxidizer()] {
        println!(
            "# {} at {:.2} K (cp_avg {:.1} J/kg/K)",
            side.card.name,
            side.storage_temperature.value,
            side.cp_avg()
        );
        print!("{}", side.card.to_cea_input());
    }
    Ok(())
}

fn cmd_thrust(project: &Project, point: &OperatingPoint) -> ProjectResult<()> {
    let engine = project.design_engine()?;
    let t = engine.thrust(point)?;
    println!("Operating point:");
    println!("  Ambient pressure: {:.3} bar", t.ambient_pressure.value / 1e5);
    println!("  Chamber pressure: {:.3} bar", t.chamber_pressure.value / 1e5);
    println!("  Mass flow: {:.4} kg/s", t.mass_flow.value);
    println!("  Thrust: {:.1} N", t.thrust.value);
    println!("  Isp: {:.1} s", t.isp_seconds());
    println!("  Expansion: {}", t.performance.mode);
    Ok(())
}

fn cmd_sweep(project: &Project) -> ProjectResult<()> {
    let engine = project.design_engine()?;
    let points = engine.thrust_sweep(&project.sweep_pressures())?;
    println!("ambient_pa,thrust_n,isp_s,mode");
    for p in &points {
        println!(
            "{},{:.2},{:.2},{}",
            p.ambient_pressure.value,
            p.thrust.value,
            p.isp_seconds(),
            p.performance.mode
        );
    }
    Ok(())
}

fn cmd_tank_cg(project: &Project, steps: Option<usize>, output: Option<&Path>) -> ProjectResult<()> {
    let Some(tanks) = project.tank_system()? else {
        return Err(ProjectError::MissingSection { section: "tanks" });
    };
    let engine = project.design_engine()?;
    let fluids = project.fluid_model();
    let times = eg_tanks::sample_times(
        tanks.burn_time,
        steps.unwrap_or(project.analysis.cg_steps),
    );
    let history = tanks.evaluate(fluids.as_ref(), engine.mass_flow(), &times)?;

    eprintln!("Total length: {:.3} m", history.total_length.value);
    eprintln!("Loaded mass: {:.3} kg", history.loaded_mass.value);
    eprintln!("Dry mass: {:.3} kg", history.dry_mass.value);
    eprintln!(
        "Tank lengths: oxidizer {:.3} m, fuel {:.3} m",
        history.oxidizer_tank_length.value, history.fuel_tank_length.value
    );

    let mut csv = String::from("time_s,mass_kg,cg_from_top_m\n");
    for ((t, m), cg) in history.times.iter().zip(&history.mass).zip(&history.cg_from_top) {
        csv.push_str(&format!("{},{},{}\n", t.value, m.value, cg.value));
    }

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} samples to {}",
            history.times.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }
    Ok(())
}
