//! Synchronous Storage Simulation CLI.
//!
//! Runs the demonstration model on the reference kernel: loads the
//! configuration, installs the signal hook, simulates the requested number
//! of cycles and reports change logs and statistics.

use clap::Parser;
use std::io::{self, Write};
use std::process;

extern crate syncreg;

use syncreg::config::Config;
use syncreg::sched::Kernel;
use syncreg::sim::{logger, signals, Model};

/// Command-line arguments for the simulation driver.
#[derive(Parser, Debug)]
#[command(author, version, about = "Synchronous Register Simulation Driver")]
struct Args {
    #[arg(short, long)]
    config: Option<String>,

    #[arg(long)]
    cycles: Option<u64>,

    #[arg(long)]
    trace: bool,
}

/// Main entry point for the simulation driver.
///
/// # Behavior
///
/// 1. **Configuration**: Parses arguments and loads the TOML configuration
///    (defaults when no file is given).
/// 2. **Initialization**: Installs the logger and signal hook, builds the
///    kernel and the model.
/// 3. **Simulation Loop**: Evaluates and ticks cycle by cycle, polling for
///    signals between cycles.
/// 4. **Teardown**: Dumps and saves change logs as configured and prints
///    statistics.
fn main() {
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::load(path).unwrap_or_else(|e| {
            eprintln!("\n[!] FATAL: Could not load config '{}': {}", path, e);
            process::exit(1);
        }),
        None => Config::default(),
    };
    if let Some(cycles) = args.cycles {
        config.general.cycles = cycles;
    }

    logger::init(args.trace || config.general.trace);
    if let Err(e) = signals::install() {
        log::warn!("signal handlers not installed: {}", e);
    }

    println!("Global Configuration");
    println!("--------------------");
    println!("  Cycles:             {}", config.general.cycles);
    println!("  Period:             {}", config.kernel.period);
    println!("  Max Deltas:         {}", config.kernel.max_deltas);
    println!(
        "  Change Log:         {}",
        if config.log.enabled {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    if let Some(ref path) = config.log.save_path {
        println!("  Log File:           {}", path);
    }
    println!("  Stride:             {}", config.model.stride);
    println!("  Stall Every:        {}", config.model.stall_every);
    println!("--------------------");

    let mut kernel = Kernel::from_config(&config.kernel);
    let model = Model::new(&mut kernel, &config).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: Could not build model: {}", e);
        process::exit(1);
    });

    for _ in 0..config.general.cycles {
        model.eval(kernel.cycle());

        if let Err(e) = kernel.tick() {
            eprintln!("\n[!] FATAL: {}", e);
            kernel.stats.finish();
            kernel.stats.print();
            process::exit(1);
        }

        if let Some(action) = signals::take() {
            if !signals::handle(action, &mut kernel.stats) {
                process::exit(1);
            }
        }
    }

    log::info!(
        "finished: PC={} ACC={} STATUS={:#04x}",
        model.pc.borrow().read(),
        model.acc.borrow().read(),
        model.status.borrow().read()
    );

    if config.log.dump {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = model.change_dump(&mut out) {
            eprintln!("[!] Could not write change report: {}", e);
        }
        out.flush().ok();
    }

    if config.log.save_path.is_some() {
        if let Err(e) = model.change_save() {
            eprintln!("\n[!] FATAL: Could not save change log: {}", e);
            process::exit(1);
        }
    }

    kernel.stats.finish();
    kernel.stats.print();
    io::stdout().flush().ok();
}
