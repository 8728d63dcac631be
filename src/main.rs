use std::io::prelude::*;
use std::path::PathBuf;
use std::time::Instant;

use rand::SeedableRng;
use rand_pcg::Pcg64;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use modex::io::{read_network_file, write_network, write_report, Format, Output};
use modex::{optimize, Algorithm, Budget, ModexError, PopulationModel, Result};

#[derive(StructOpt, Debug)]
#[structopt(name = "modex", about = "Moderate the most extreme agents of a social network within an effort budget")]
enum Opt {
    /// Run one algorithm on a network file and print the report
    Solve {
        /// network file: number of agents, `opinion,receptivity` lines, budget
        #[structopt(parse(from_os_str))]
        input: PathBuf,
        /// brute-force, dynamic or greedy
        #[structopt(short, long, default_value = "dynamic")]
        algorithm: Algorithm,
        /// also export the report to this file
        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
        /// export as JSON instead of text
        #[structopt(long)]
        json: bool,
    },
    /// Run every algorithm on the same network and compare them
    Compare {
        #[structopt(parse(from_os_str))]
        input: PathBuf,
        /// do not run the exponential brute force
        #[structopt(long)]
        skip_brute_force: bool,
    },
    /// Write a random network file
    Generate {
        /// number of agents
        #[structopt(short = "n", long)]
        agents: usize,
        /// effort budget written into the file
        #[structopt(short, long)]
        budget: Budget,
        #[structopt(short, long, default_value = "13")]
        seed: u64,
        /// opinions are drawn from [-scale, scale] (uniform) or around +-scale (polarized)
        #[structopt(long, default_value = "1")]
        scale: f64,
        /// uniform or polarized
        #[structopt(short, long, default_value = "uniform")]
        population: PopulationModel,
        /// write to this file instead of stdout
        #[structopt(short, long, parse(from_os_str))]
        output: Option<PathBuf>,
    },
}

fn solve(input: PathBuf, algorithm: Algorithm, output: Option<PathBuf>, json: bool) -> Result<()> {
    let (network, budget) = read_network_file(&input)?;
    tracing::info!(file = %input.display(), agents = network.len(), budget, "loaded network");

    let start = Instant::now();
    let outcome = optimize(&network, budget, algorithm)?;
    let elapsed = start.elapsed();

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "File: {}", input.display())?;
    writeln!(handle, "Agents: {}", network.len())?;
    writeln!(handle, "Time: {:.9} s", elapsed.as_secs_f64())?;
    write_report(&mut handle, &outcome, Format::Text)?;

    if let Some(path) = output {
        let format = if json { Format::Json } else { Format::Text };
        let mut out = Output::new(&path)?;
        write_report(out.file(), &outcome, format)?;
        tracing::info!(file = %out.final_name().display(), "exported report");
        out.finalize()?;
    }

    Ok(())
}

fn compare(input: PathBuf, skip_brute_force: bool) -> Result<()> {
    let (network, budget) = read_network_file(&input)?;
    tracing::info!(file = %input.display(), agents = network.len(), budget, "loaded network");

    println!("# algorithm extremism effort time/s");
    for &algorithm in Algorithm::ALL.iter() {
        if skip_brute_force && algorithm == Algorithm::BruteForce {
            continue
        }
        let start = Instant::now();
        match optimize(&network, budget, algorithm) {
            Ok(outcome) => println!(
                "{} {:.6} {} {:.9}",
                algorithm,
                outcome.extremism,
                outcome.effort,
                start.elapsed().as_secs_f64()
            ),
            // a too large network for one algorithm should not stop the others
            Err(e @ ModexError::NetworkTooLarge { .. })
            | Err(e @ ModexError::TableTooLarge { .. }) => tracing::warn!(%algorithm, "{}", e),
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

fn generate(
    agents: usize,
    budget: Budget,
    seed: u64,
    population: PopulationModel,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut rng = Pcg64::seed_from_u64(seed);
    let network = population.gen_network(agents, &mut rng);
    tracing::info!(agents, seed, ?population, "generated network");

    match output {
        Some(path) => {
            let mut out = Output::new(&path)?;
            write_network(out.file(), &network, budget)?;
            out.finalize()?;
        }
        None => {
            let stdout = std::io::stdout();
            write_network(&mut stdout.lock(), &network, budget)?;
        }
    }

    Ok(())
}

fn run(opt: Opt) -> Result<()> {
    match opt {
        Opt::Solve { input, algorithm, output, json } => solve(input, algorithm, output, json),
        Opt::Compare { input, skip_brute_force } => compare(input, skip_brute_force),
        Opt::Generate { agents, budget, seed, scale, population, output } => {
            generate(agents, budget, seed, population.with_scale(scale), output)
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            // RUST_LOG wins, otherwise info
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opt = Opt::from_args();
    tracing::debug!(?opt, "parsed arguments");

    if let Err(e) = run(opt) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
