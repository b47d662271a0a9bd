use std::thread;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use parallel_randomization::lcg::{DEFAULT_INCREMENT, DEFAULT_MODULUS, DEFAULT_MULTIPLIER};
use parallel_randomization::{
    fill_serial, Averaging, Buffer, Engine, GeneratorParams, Lcg, Sorter, ValueRange,
};

#[derive(Parser)]
#[command(about = "Deterministic parallel LCG fill and parallel quicksort benchmarks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fill one buffer, serially or in parallel, and report the time
    Classic {
        #[command(flatten)]
        run: RunArgs,
        /// Use the single-threaded generator
        #[arg(long)]
        serial: bool,
    },
    /// Fill with 1..=threads workers and report the time for each
    Speed(RunArgs),
    /// Fill, then sort with 1..=threads workers and report the time for each
    Sort(RunArgs),
    /// Compare a serial fill against a parallel fill
    Verify(RunArgs),
}

#[derive(Args, Clone)]
struct RunArgs {
    #[arg(long, default_value_t = 10_000_000)]
    length: usize,
    #[arg(long, default_value_t = 228)]
    seed: u32,
    /// Ignore --seed and draw one at random
    #[arg(long)]
    random_seed: bool,
    #[arg(long, default_value_t = 0)]
    min: u32,
    #[arg(long, default_value_t = 100_000)]
    max: u32,
    /// Worker count; defaults to the available hardware parallelism
    #[arg(long)]
    threads: Option<usize>,
    #[arg(long, default_value_t = DEFAULT_MULTIPLIER)]
    multiplier: u64,
    #[arg(long, default_value_t = DEFAULT_INCREMENT)]
    increment: u64,
    #[arg(long, default_value_t = DEFAULT_MODULUS)]
    modulus: u64,
    /// Report the average generated value
    #[arg(long)]
    average: bool,
}

impl RunArgs {
    fn params(&self) -> Result<GeneratorParams> {
        Ok(GeneratorParams::new(self.multiplier, self.increment, self.modulus)?)
    }

    fn threads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        })
    }

    fn seed(&self) -> u32 {
        if self.random_seed {
            let seed = rand::random::<u32>();
            info!(seed, "using random seed");
            seed
        } else {
            self.seed
        }
    }
}

fn fill_timed(engine: &Engine, args: &RunArgs, seed: u32, buffer: &mut Buffer) -> Result<()> {
    let start = Instant::now();
    if args.average {
        let report = Averaging::new(engine).fill(seed, buffer.as_mut_slice(), args.min, args.max)?;
        println!("Average is {}", report.average.unwrap_or(0.0));
    } else {
        engine.fill(seed, buffer.as_mut_slice(), args.min, args.max)?;
    }
    println!(
        "Resulting time is {:.6} seconds for {} threads",
        start.elapsed().as_secs_f64(),
        engine.threads()
    );
    Ok(())
}

fn classic(args: &RunArgs, serial: bool) -> Result<()> {
    let params = args.params()?;
    let seed = args.seed();
    let mut buffer = Buffer::new(args.length);

    if serial {
        let start = Instant::now();
        fill_serial(&params, seed, buffer.as_mut_slice(), args.min, args.max)?;
        println!("Resulting time is: {:.6}", start.elapsed().as_secs_f64());
    } else {
        let engine = Engine::new(params, args.threads())?;
        fill_timed(&engine, args, seed, &mut buffer)?;
    }

    buffer.zero();
    Ok(())
}

fn speed(args: &RunArgs) -> Result<()> {
    let params = args.params()?;
    let seed = args.seed();
    let mut buffer = Buffer::new(args.length);

    for threads in 1..=args.threads() {
        let engine = Engine::new(params, threads)?;
        fill_timed(&engine, args, seed, &mut buffer)?;
        buffer.zero();
    }
    Ok(())
}

fn sort(args: &RunArgs) -> Result<()> {
    let params = args.params()?;
    let seed = args.seed();
    let max_threads = args.threads();
    let filler = Engine::new(params, max_threads)?;
    let mut buffer = Buffer::new(args.length);

    for threads in 1..=max_threads {
        filler.fill(seed, buffer.as_mut_slice(), args.min, args.max)?;

        let sorter = Sorter::new(threads)?;
        let start = Instant::now();
        sorter.sort_all(buffer.as_mut_slice());
        println!(
            "Resulting time is {:.6} seconds for {} threads",
            start.elapsed().as_secs_f64(),
            threads
        );

        if !buffer.as_slice().windows(2).all(|w| w[0] <= w[1]) {
            bail!("buffer is not sorted after sorting with {threads} threads");
        }
        buffer.zero();
    }
    Ok(())
}

fn verify(args: &RunArgs) -> Result<()> {
    let params = args.params()?;
    let seed = args.seed();
    let threads = args.threads();

    let mut expected = Buffer::new(args.length);
    fill_serial(&params, seed, expected.as_mut_slice(), args.min, args.max)?;

    let mut actual = Buffer::new(args.length);
    Engine::new(params, threads)?.fill(seed, actual.as_mut_slice(), args.min, args.max)?;

    if let Some(index) = expected
        .as_slice()
        .iter()
        .zip(actual.as_slice())
        .position(|(a, b)| a != b)
    {
        bail!("parallel fill with {threads} threads diverges from serial at index {index}");
    }

    // last slot again, this time jumping straight to it
    if let Some(&last) = actual.as_slice().last() {
        let range = ValueRange::new(args.min, args.max)?;
        let mut lcg = Lcg::new(params, seed);
        lcg.skip(args.length as u64);
        if range.fold(lcg.state()) != last {
            bail!("jump-ahead to index {} disagrees with the fill", args.length - 1);
        }
    }
    println!(
        "Parallel fill with {} threads matches serial fill for {} values",
        threads, args.length
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Classic { run, serial } => classic(run, *serial),
        Command::Speed(run) => speed(run),
        Command::Sort(run) => sort(run),
        Command::Verify(run) => verify(run),
    }
}
