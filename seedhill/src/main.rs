use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use seedhill::config::SearchDefaults;
use seedhill::runner::{run, Query, Report};
use seedhill::util::{parse_code, parse_seed, parse_seed_csv, CodeRules};
use sh3_rng_core::{Backend, ClockBaseQuery, ClockTarget, CodeScheme, HourMode, ScanBounds};

#[derive(Parser, Debug)]
#[command(name = "seedhill")]
#[command(about = "Silent Hill 3 RNG tool: predict and reverse puzzle codes from generator seeds")]
struct Cli {
    /// Which build's rand() to model
    #[arg(long, value_enum, default_value_t = CliBackend::Ps2, global = true)]
    backend: CliBackend,
    /// Print the report as JSON instead of key=value lines
    #[arg(long, global = true)]
    json: bool,
    /// Show per-draw RNG outputs
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Worker threads for the base-seed enumeration (defaults to all cores)
    #[arg(long, global = true)]
    jobs: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliBackend {
    Ps2,
    Pc,
}

impl From<CliBackend> for Backend {
    fn from(value: CliBackend) -> Self {
        match value {
            CliBackend::Ps2 => Backend::Ps2,
            CliBackend::Pc => Backend::Pc,
        }
    }
}

/// Seeds are hex with or without `0x`.
#[derive(Args, Debug)]
struct SeedWarmup {
    #[arg(long, default_value = "0")]
    seed: String,
    /// Logical rand() calls skipped after the seed
    #[arg(long, default_value_t = 0)]
    warmup: u32,
}

#[derive(Args, Debug)]
struct ReverseScan {
    /// Seed the advance count is measured from
    #[arg(long, default_value = "0")]
    seed: String,
    #[arg(long, default_value_t = 0)]
    min_advances: u32,
    #[arg(long)]
    max_advances: Option<u32>,
    #[arg(long)]
    max_results: Option<usize>,
}

impl ReverseScan {
    fn bounds(&self, default_max: u32, default_results: usize) -> Result<ScanBounds> {
        let max_advances = self.max_advances.unwrap_or(default_max).max(self.min_advances);
        let max_results = self.max_results.unwrap_or(default_results);
        if max_results == 0 {
            return Err(anyhow!("--max-results must be > 0"));
        }
        Ok(ScanBounds::new(self.min_advances, max_advances, max_results))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Shakespeare code from a seed and warmup count
    Shakespeare(SeedWarmup),
    /// Shakespeare code from the first observed rand() return (warmup found automatically)
    ShakespeareFirst {
        #[arg(long, default_value = "0")]
        seed: String,
        /// First rand() return of the puzzle, hex
        #[arg(long)]
        first_output: String,
        #[arg(long)]
        max_search: Option<u32>,
    },
    /// List advance counts that produce a Shakespeare code
    ShakespeareReverse {
        /// Four digits (0123) or packed hex (0x0123)
        #[arg(long)]
        code: String,
        #[command(flatten)]
        scan: ReverseScan,
    },
    /// 3F hospital keypad code from a seed and warmup count
    Hospital(SeedWarmup),
    /// List advance counts that produce a 3F hospital code
    HospitalReverse {
        #[arg(long)]
        code: String,
        #[command(flatten)]
        scan: ReverseScan,
    },
    /// Crematorium oven code from a seed and warmup count
    Crematorium(SeedWarmup),
    /// List advance counts that produce a crematorium oven code
    CrematoriumReverse {
        #[arg(long)]
        code: String,
        #[command(flatten)]
        scan: ReverseScan,
    },
    /// Clock puzzle HH:MM from a seed and warmup count
    Clock {
        #[command(flatten)]
        at: SeedWarmup,
        /// Take the 24-hour path (mode byte 2)
        #[arg(long)]
        h24: bool,
    },
    /// List advance counts whose clock matches an hour, a minute, or both
    ClockReverse {
        #[arg(long)]
        hour: Option<u32>,
        #[arg(long)]
        minute: Option<u32>,
        #[arg(long)]
        h24: bool,
        #[command(flatten)]
        scan: ReverseScan,
    },
    /// Recover base seeds (ps2 only) whose clock shows HH:MM after a fixed warmup
    ClockBaseSeeds {
        #[arg(long)]
        hour: u32,
        #[arg(long)]
        minute: u32,
        #[arg(long)]
        h24: bool,
        #[arg(long, default_value_t = 0)]
        warmup: u32,
        #[arg(long)]
        max_results: Option<usize>,
    },
    /// Advance counts between consecutive observed seeds
    Distance {
        #[arg(long, default_value = "0")]
        seed: String,
        /// Comma-separated target seeds, visited in order
        #[arg(long)]
        targets: String,
        #[arg(long)]
        max_steps: Option<u64>,
    },
    /// Step a ps2 seed backwards
    Rewind {
        #[arg(long)]
        seed: String,
        #[arg(long)]
        steps: u32,
    },
}

fn mode_from_flag(h24: bool) -> HourMode {
    if h24 {
        HourMode::TwentyFourHour
    } else {
        HourMode::TwelveHour
    }
}

fn build_query(command: Commands, defaults: &SearchDefaults) -> Result<Query> {
    let query = match command {
        Commands::Shakespeare(at) => Query::Code {
            scheme: CodeScheme::Shakespeare,
            seed: parse_seed(&at.seed)?,
            warmup: at.warmup,
        },
        Commands::ShakespeareFirst {
            seed,
            first_output,
            max_search,
        } => Query::CodeFromFirstOutput {
            seed: parse_seed(&seed)?,
            first_output: parse_seed(&first_output).context("invalid --first-output")?,
            max_search: max_search.unwrap_or(defaults.max_first_output_search),
        },
        Commands::ShakespeareReverse { code, scan } => Query::ReverseCode {
            scheme: CodeScheme::Shakespeare,
            target: parse_code(&code, CodeRules::Shakespeare)?,
            seed: parse_seed(&scan.seed)?,
            bounds: scan.bounds(defaults.max_code_advances, defaults.max_code_results)?,
        },
        Commands::Hospital(at) => Query::Code {
            scheme: CodeScheme::Hospital,
            seed: parse_seed(&at.seed)?,
            warmup: at.warmup,
        },
        Commands::HospitalReverse { code, scan } => Query::ReverseCode {
            scheme: CodeScheme::Hospital,
            target: parse_code(&code, CodeRules::Hospital)?,
            seed: parse_seed(&scan.seed)?,
            bounds: scan.bounds(defaults.max_code_advances, defaults.max_code_results)?,
        },
        Commands::Crematorium(at) => Query::Crematorium {
            seed: parse_seed(&at.seed)?,
            warmup: at.warmup,
        },
        Commands::CrematoriumReverse { code, scan } => Query::ReverseCrematorium {
            target: parse_code(&code, CodeRules::Crematorium)?,
            seed: parse_seed(&scan.seed)?,
            bounds: scan.bounds(defaults.max_code_advances, defaults.max_code_results)?,
        },
        Commands::Clock { at, h24 } => Query::Clock {
            seed: parse_seed(&at.seed)?,
            warmup: at.warmup,
            mode: mode_from_flag(h24),
        },
        Commands::ClockReverse {
            hour,
            minute,
            h24,
            scan,
        } => Query::ReverseClock {
            seed: parse_seed(&scan.seed)?,
            mode: mode_from_flag(h24),
            target: ClockTarget::from_parts(hour, minute)
                .ok_or_else(|| anyhow!("pass --hour, --minute, or both"))?,
            bounds: scan.bounds(defaults.max_clock_warmup, defaults.max_clock_results)?,
        },
        Commands::ClockBaseSeeds {
            hour,
            minute,
            h24,
            warmup,
            max_results,
        } => Query::ClockBaseSeeds(
            ClockBaseQuery::new(hour, minute, mode_from_flag(h24), warmup)
                .with_max_results(max_results.unwrap_or(defaults.max_base_seeds)),
        ),
        Commands::Distance {
            seed,
            targets,
            max_steps,
        } => Query::SeedPath {
            seed: parse_seed(&seed)?,
            targets: parse_seed_csv(&targets)?,
            max_steps: max_steps.unwrap_or(defaults.max_seed_distance),
        },
        Commands::Rewind { seed, steps } => Query::Rewind {
            seed: parse_seed(&seed)?,
            steps,
        },
    };
    Ok(query)
}

fn execute(backend: Backend, query: Query, jobs: Option<usize>) -> Result<Report> {
    match jobs {
        Some(0) => Err(anyhow!("--jobs must be >= 1 when provided")),
        Some(jobs) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .context("failed to build rayon threadpool")?;
            pool.install(|| run(backend, query))
        }
        None => run(backend, query),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Cli {
        backend,
        json,
        verbose,
        jobs,
        command,
    } = Cli::parse();

    let defaults = SearchDefaults::from_env();
    let query = build_query(command, &defaults)?;
    tracing::debug!(?query, "running query");

    let report = execute(backend.into(), query, jobs)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in report.lines(verbose) {
            println!("{line}");
        }
    }
    Ok(())
}
