use clap::{CommandFactory, Parser, Subcommand};

use barwon::misc::cli_helpers::describe_cli_api;
use barwon::simulation::Simulation;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "barwon")]
#[command(about = "A command line interface for the Barwon integrated catchment simulator")]
#[command(version = env!("BARWON_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    #[command(visible_alias = "sim")]
    Simulate {
        /// Input file name stem (expects <stem>.mesh, <stem>.att, <stem>.soil, ...)
        stem: String,
        /// Stem for the output files; defaults to the input stem
        #[arg(short, long)]
        output_stem: Option<String>,
        /// Report execution time profile
        #[arg(short = 'p', long)]
        profile: bool,
    },
    /// Return API spec as JSON on STDOUT
    GetApi,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { stem, output_stem, profile } => {
            let total_start = Instant::now();
            println!("Belt up!  Barwon {} is starting ...", env!("BARWON_VERSION"));

            let load_start = Instant::now();
            let mut sim = match Simulation::load(&stem) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            let load_time = load_start.elapsed();

            let out_stem = output_stem.unwrap_or_else(|| stem.clone());
            let sim_start = Instant::now();
            if let Err(e) = sim.run(&out_stem) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            let sim_time = sim_start.elapsed();
            let total_time = total_start.elapsed();

            println!("Done!");

            if profile {
                let misc_time = total_time.saturating_sub(load_time + sim_time);
                println!("\n=== Execution Profile ===");
                println!("  Loading time:    {:>10.3} ms", load_time.as_secs_f64() * 1000.0);
                println!("  Simulation time: {:>10.3} ms", sim_time.as_secs_f64() * 1000.0);
                println!("  Misc:            {:>10.3} ms", misc_time.as_secs_f64() * 1000.0);
                println!("  ─────────────────────────────");
                println!("  Total time:      {:>10.3} ms", total_time.as_secs_f64() * 1000.0);
            }
        }
        Commands::GetApi => {
            let command = Cli::command();
            let api_description = describe_cli_api(&command);
            println!("{}", serde_json::to_string_pretty(&api_description).unwrap());
        }
    }
}
