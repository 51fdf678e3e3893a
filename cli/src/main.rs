use clap::{Parser, Subcommand};
use sa_common::db::core::Circuit;
use sa_common::db::parser::netlist;
use sa_common::util::config::Config;
use sa_common::util::{check, generator, logger, visualization};
use sa_placer::anneal::{
    AnnealParams, AnnealingController, StepOutcome, StopPolicy, run_to_completion,
};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    /// Overrides `input.netlist_file`.
    #[arg(short, long, value_name = "FILE")]
    netlist: Option<String>,

    /// Overrides `annealing.seed`.
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Anneal until the move budget or temperature floor is reached.
    Place,
    /// Advance one event at a time from stdin.
    Interactive,
    Generate {
        #[arg(long, default_value_t = 100)]
        cells: usize,
        #[arg(long, default_value_t = 120)]
        nets: usize,
        #[arg(long, default_value_t = 3)]
        fanout: usize,
        #[arg(long, default_value_t = 0.70)]
        utilization: f64,
        #[arg(long, default_value = "inputs/random.txt")]
        output: String,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let mut config: Config = if args.config.exists() {
        log::info!("Loading configuration from {:?}", args.config);
        let config_str = std::fs::read_to_string(&args.config)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
        toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?
    } else {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            args.config
        );
        Config::default()
    };

    if let Some(netlist) = args.netlist {
        config.input.netlist_file = netlist;
    }
    if args.seed.is_some() {
        config.annealing.seed = args.seed;
    }

    let command = args.command.unwrap_or(Commands::Place);

    match command {
        Commands::Generate {
            cells,
            nets,
            fanout,
            utilization,
            output,
        } => {
            let safe_util = utilization.clamp(0.05, 1.0);
            if (safe_util - utilization).abs() > f64::EPSILON {
                log::warn!(
                    "Requested utilization {:.2} is out of range. Clamped to {:.2}",
                    utilization,
                    safe_util
                );
            }

            prepare_output_dir(&output)?;
            log::info!(
                "Generating random netlist (Cells: {}, Nets: {}, Fanout: {}, Util: {:.0}%)...",
                cells,
                nets,
                fanout,
                safe_util * 100.0
            );
            generator::generate_random_netlist(&output, cells, nets, fanout, safe_util)?;
            log::info!("Generated: {}", output);
        }
        Commands::Place => {
            validate_input_path(&config)?;

            if let Err(e) = run_placement(&config) {
                log::error!("Placement failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Interactive => {
            validate_input_path(&config)?;

            if let Err(e) = run_interactive(&config) {
                log::error!("Interactive session failed: {:#}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn validate_input_path(config: &Config) -> anyhow::Result<()> {
    if !Path::new(&config.input.netlist_file).exists() {
        return Err(anyhow::anyhow!(
            "Input netlist file missing: {}",
            config.input.netlist_file
        ));
    }
    Ok(())
}

fn prepare_output_dir(path_str: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(path_str).parent() {
        if !parent.exists() && !parent.as_os_str().is_empty() {
            log::info!("Creating output directory: {:?}", parent);
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn load_controller(config: &Config) -> anyhow::Result<AnnealingController> {
    let path = &config.input.netlist_file;
    let desc = netlist::parse(path)
        .map_err(|e| anyhow::anyhow!("Invalid netlist syntax in '{}': {:#}", path, e))?;
    let circuit = Circuit::new(&desc)
        .map_err(|e| anyhow::anyhow!("Rejected netlist '{}': {}", path, e))?;

    log::info!(
        "Design: {} cells, {} nets, {}x{} grid (Utilization: {:.2}%)",
        circuit.num_cells(),
        circuit.num_nets(),
        circuit.num_cols,
        circuit.num_rows,
        100.0 * circuit.num_cells() as f64 / circuit.num_sites() as f64
    );

    let params = AnnealParams::from_config(&config.annealing)?;
    Ok(AnnealingController::new(circuit, params)?)
}

fn render(controller: &AnnealingController, config: &Config) {
    let out = &config.output;
    if let Err(e) = visualization::draw_placement(
        controller.circuit(),
        controller.grid(),
        &out.placement_image,
        out.image_size,
        out.image_size,
    ) {
        log::warn!("Could not write {}: {}", out.placement_image, e);
    }
}

fn render_cost(history: &[u64], config: &Config) {
    let out = &config.output;
    if let Err(e) =
        visualization::draw_cost_history(history, &out.cost_plot, out.image_size, out.image_size)
    {
        log::warn!("Could not write {}: {}", out.cost_plot, e);
    }
}

fn run_placement(config: &Config) -> anyhow::Result<()> {
    let mut controller = load_controller(config)?;
    let policy = StopPolicy::from_config(&config.annealing);

    log::info!("Starting Annealing...");
    let summary = run_to_completion(&mut controller, &policy)?;

    log::info!(
        "Cost {} -> {} over {} steps ({:.1}% accepted), T {:.4} -> {:.4}",
        summary.initial_cost(),
        summary.final_cost(),
        summary.steps,
        summary.acceptance_rate() * 100.0,
        summary.initial_temperature,
        summary.final_temperature
    );

    check::run_placement_check(controller.circuit(), controller.grid())
        .map_err(|e| anyhow::anyhow!(e))?;

    prepare_output_dir(&config.output.placement_image)?;
    prepare_output_dir(&config.output.cost_plot)?;
    log::info!("Generating placement visualization...");
    render(&controller, config);
    render_cost(&summary.cost_history, config);

    Ok(())
}

fn run_interactive(config: &Config) -> anyhow::Result<()> {
    let mut controller = load_controller(config)?;
    prepare_output_dir(&config.output.placement_image)?;
    prepare_output_dir(&config.output.cost_plot)?;

    let mut history = Vec::new();
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    println!("[Enter] proceed   d: debug dump   q: quit");
    loop {
        print!("{} (T={:.4})> ", controller.phase(), controller.temperature());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            "" | "p" | "proceed" => {
                match controller.advance()? {
                    StepOutcome::Placed => println!("initial placement done"),
                    StepOutcome::Calibrated { temperature, cost } => {
                        println!("calibrated: T0={:.4} cost={}", temperature, cost);
                        history.push(cost);
                    }
                    StepOutcome::Annealed {
                        accepted,
                        delta,
                        cost,
                        temperature,
                    } => {
                        println!(
                            "step {}: delta {} {} cost={} T={:.4}",
                            controller.steps(),
                            delta,
                            if accepted { "accepted" } else { "rejected" },
                            cost,
                            temperature
                        );
                        history.push(cost);
                    }
                }
                render(&controller, config);
            }
            "d" | "dump" => print!("{}", controller.debug_dump()),
            "q" | "quit" => break,
            other => log::warn!("Unknown command '{}'", other),
        }
    }

    render_cost(&history, config);
    Ok(())
}
