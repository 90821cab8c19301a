//! Pipeline simulator CLI.
//!
//! This binary provides a single entry point for batch simulation. It
//! performs:
//! 1. **Assemble and run:** Translate a source file and step the pipeline to
//!    halt (bounded by `--max-cycles`).
//! 2. **Reporting:** Register/memory dump plus a statistics summary, or the
//!    full serialized machine state as JSON.

use std::{fs, process};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pipevis_core::Session;

#[derive(Parser, Debug)]
#[command(
    name = "pipevis",
    author,
    version,
    about = "Cycle-accurate 16-bit pipeline simulator",
    long_about = "Assemble a source file and execute it one clock cycle at a time on a \
                  five-stage pipeline, reporting hazards, forwards, flushes, and \
                  performance counters.\n\nExamples:\n  pipevis run program.asm\n  \
                  pipevis run program.asm --json\n  pipevis run program.asm --trace"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble a source file and run it to halt.
    Run {
        /// Assembly source file.
        file: String,

        /// Cycle budget; execution stops here even without a halt.
        #[arg(long, default_value_t = 10_000)]
        max_cycles: u64,

        /// Print the final machine state as JSON instead of the text report.
        #[arg(long)]
        json: bool,

        /// Enable per-cycle engine tracing on stderr.
        #[arg(long)]
        trace: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            file,
            max_cycles,
            json,
            trace,
        } => cmd_run(&file, max_cycles, json, trace),
    }
}

fn cmd_run(file: &str, max_cycles: u64, json: bool, trace: bool) {
    if trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let source = match fs::read_to_string(file) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: cannot read {file}: {err}");
            process::exit(2);
        }
    };

    let mut session = Session::new();
    if let Err(err) = session.assemble(&source) {
        eprintln!("assembly error: {err}");
        process::exit(1);
    }

    let executed = match session.run_to_halt(max_cycles) {
        Ok(executed) => executed,
        Err(err) => {
            eprintln!("simulation error: {err}");
            process::exit(1);
        }
    };

    if !session.is_halted() {
        eprintln!("warning: cycle budget of {max_cycles} exhausted before halt");
    }

    if json {
        let state = session.cpu_state();
        match serde_json::to_string_pretty(&state) {
            Ok(text) => println!("{text}"),
            Err(err) => {
                eprintln!("error: cannot serialize state: {err}");
                process::exit(1);
            }
        }
        return;
    }

    print_report(&session, executed);
}

fn print_report(session: &Session, executed: u64) {
    let state = session.cpu_state();

    println!("PC = {}", state.pc);
    for (idx, pair) in state.registers.chunks(2).enumerate() {
        println!(
            "$r{:<2} = {:<8} $r{:<2} = {}",
            idx * 2,
            pair[0],
            idx * 2 + 1,
            pair[1]
        );
    }

    if !state.data_memory.is_empty() {
        println!("\nDATA MEMORY");
        for (addr, value) in &state.data_memory {
            println!("  [{addr:>3}] = {value}");
        }
    }

    let perf = &state.performance;
    println!("\n==========================================================");
    println!("PIPELINE SIMULATION STATISTICS");
    println!("==========================================================");
    println!("sim_cycles               {}", perf.cycles);
    println!("sim_insts                {}", perf.instructions);
    match perf.cpi {
        Some(cpi) => println!("sim_cpi                  {cpi:.4}"),
        None => println!("sim_cpi                  n/a"),
    }
    println!("stall_rate               {:.4}", perf.stall_rate);
    println!("forward_rate             {:.4}", perf.forward_rate);
    println!("flush_count              {}", perf.flush_count);
    println!("cycles_run               {executed}");
    println!("==========================================================");
}
