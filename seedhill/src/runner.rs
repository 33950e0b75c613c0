//! Turns validated queries into core calls and serializable reports.

use anyhow::{anyhow, Result};
use serde::Serialize;
use sh3_rng_core::code::{Draw, ForcedSeven};
use sh3_rng_core::enumerate::find_clock_base_seeds;
use sh3_rng_core::search::{ClockMatch, CodeMatch, CrematoriumMatch, SeedPath};
use sh3_rng_core::{
    find_clock_warmups_flexible, find_code_seeds, find_crematorium_seeds_for_code,
    find_warmup_for_first, generate_clock, generate_code, generate_crematorium_code,
    trace_seed_path, Backend, BaseSeedCandidate, ClockBaseQuery, ClockReading, ClockTarget,
    CodeScheme, CrematoriumCode, DrawnCode, HourMode, PackedCode, Ps2Inverse, ScanBounds,
};

use crate::util::seed_to_hex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Query {
    Code {
        scheme: CodeScheme,
        seed: u32,
        warmup: u32,
    },
    CodeFromFirstOutput {
        seed: u32,
        first_output: u32,
        max_search: u32,
    },
    ReverseCode {
        scheme: CodeScheme,
        target: PackedCode,
        seed: u32,
        bounds: ScanBounds,
    },
    Crematorium {
        seed: u32,
        warmup: u32,
    },
    ReverseCrematorium {
        target: PackedCode,
        seed: u32,
        bounds: ScanBounds,
    },
    Clock {
        seed: u32,
        warmup: u32,
        mode: HourMode,
    },
    ReverseClock {
        seed: u32,
        mode: HourMode,
        target: ClockTarget,
        bounds: ScanBounds,
    },
    ClockBaseSeeds(ClockBaseQuery),
    SeedPath {
        seed: u32,
        targets: Vec<u32>,
        max_steps: u64,
    },
    Rewind {
        seed: u32,
        steps: u32,
    },
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    Code {
        backend: Backend,
        scheme: CodeScheme,
        seed: u32,
        warmup: u32,
        drawn: DrawnCode,
    },
    CodeFromFirstOutput {
        backend: Backend,
        seed: u32,
        first_output: u32,
        warmup: Option<u32>,
        drawn: Option<DrawnCode>,
    },
    CodeMatches {
        backend: Backend,
        scheme: CodeScheme,
        target: PackedCode,
        seed: u32,
        bounds: ScanBounds,
        matches: Vec<CodeMatch>,
    },
    Crematorium {
        backend: Backend,
        seed: u32,
        warmup: u32,
        code: CrematoriumCode,
    },
    CrematoriumMatches {
        backend: Backend,
        target: PackedCode,
        seed: u32,
        bounds: ScanBounds,
        matches: Vec<CrematoriumMatch>,
    },
    Clock {
        backend: Backend,
        seed: u32,
        warmup: u32,
        mode: HourMode,
        reading: ClockReading,
    },
    ClockMatches {
        backend: Backend,
        seed: u32,
        mode: HourMode,
        target: ClockTarget,
        bounds: ScanBounds,
        matches: Vec<ClockMatch>,
    },
    BaseSeeds {
        query: ClockBaseQuery,
        candidates: Vec<BaseSeedCandidate>,
    },
    SeedPath {
        backend: Backend,
        seed: u32,
        max_steps: u64,
        path: SeedPath,
    },
    Rewind {
        seed: u32,
        steps: u32,
        state: u32,
    },
}

pub fn run(backend: Backend, query: Query) -> Result<Report> {
    let report = match query {
        Query::Code {
            scheme,
            seed,
            warmup,
        } => Report::Code {
            backend,
            scheme,
            seed,
            warmup,
            drawn: generate_code(seed, warmup, backend, scheme),
        },
        Query::CodeFromFirstOutput {
            seed,
            first_output,
            max_search,
        } => {
            let warmup = find_warmup_for_first(seed, first_output, backend, max_search);
            Report::CodeFromFirstOutput {
                backend,
                seed,
                first_output,
                warmup,
                drawn: warmup
                    .map(|warmup| generate_code(seed, warmup, backend, CodeScheme::Shakespeare)),
            }
        }
        Query::ReverseCode {
            scheme,
            target,
            seed,
            bounds,
        } => Report::CodeMatches {
            backend,
            scheme,
            target,
            seed,
            bounds,
            matches: find_code_seeds(seed, target, scheme, backend, bounds),
        },
        Query::Crematorium { seed, warmup } => Report::Crematorium {
            backend,
            seed,
            warmup,
            code: generate_crematorium_code(seed, warmup, backend),
        },
        Query::ReverseCrematorium {
            target,
            seed,
            bounds,
        } => Report::CrematoriumMatches {
            backend,
            target,
            seed,
            bounds,
            matches: find_crematorium_seeds_for_code(seed, target, backend, bounds),
        },
        Query::Clock { seed, warmup, mode } => Report::Clock {
            backend,
            seed,
            warmup,
            mode,
            reading: generate_clock(seed, warmup, mode, backend),
        },
        Query::ReverseClock {
            seed,
            mode,
            target,
            bounds,
        } => Report::ClockMatches {
            backend,
            seed,
            mode,
            target,
            bounds,
            matches: find_clock_warmups_flexible(seed, mode, backend, target, bounds),
        },
        Query::ClockBaseSeeds(query) => {
            require_ps2(backend, "clock base seed enumeration")?;
            let inverse = Ps2Inverse::new()?;
            Report::BaseSeeds {
                candidates: find_clock_base_seeds(&query, &inverse)?,
                query,
            }
        }
        Query::SeedPath {
            seed,
            targets,
            max_steps,
        } => Report::SeedPath {
            backend,
            seed,
            max_steps,
            path: trace_seed_path(seed, &targets, backend, max_steps),
        },
        Query::Rewind { seed, steps } => {
            require_ps2(backend, "rewind")?;
            let inverse = Ps2Inverse::new()?;
            Report::Rewind {
                seed,
                steps,
                state: inverse.rewind(seed, steps),
            }
        }
    };
    Ok(report)
}

fn require_ps2(backend: Backend, what: &str) -> Result<()> {
    match backend {
        Backend::Ps2 => Ok(()),
        Backend::Pc => Err(anyhow!(
            "{what} needs the ps2 backend; the pc recurrence is not inverted"
        )),
    }
}

fn code_line(label: &str, code: PackedCode) -> String {
    format!("{label}={code} (packed=0x{code:04X})")
}

fn draw_lines(draws: &[Draw]) -> Vec<String> {
    draws
        .iter()
        .enumerate()
        .map(|(i, draw)| {
            format!(
                "draw{}: rand=0x{:X} size={} idx={} digit={}",
                i + 1,
                draw.output,
                draw.pool_size,
                draw.index,
                draw.digit
            )
        })
        .collect()
}

fn forced_line(forced: Option<ForcedSeven>) -> String {
    match forced {
        Some(forced) => format!(
            "forced7=yes rand=0x{:X} pos_lsb={} before=0x{:04X}",
            forced.output, forced.position, forced.before
        ),
        None => "forced7=no".to_string(),
    }
}

fn clock_text(hour: u32, minute: u32) -> String {
    format!("{hour}:{minute:02}")
}

impl Report {
    /// `key=value` lines; seeds as uppercase hex without prefix.
    pub fn lines(&self, verbose: bool) -> Vec<String> {
        let mut out = Vec::new();
        match self {
            Self::Code {
                backend,
                scheme,
                seed,
                warmup,
                drawn,
            } => {
                out.push(format!("backend={backend} puzzle={}", scheme.as_str()));
                out.push(format!("seed={} warmup={warmup}", seed_to_hex(*seed)));
                if verbose {
                    out.extend(draw_lines(&drawn.draws));
                }
                out.push(code_line("code", drawn.code));
            }
            Self::CodeFromFirstOutput {
                backend,
                seed,
                first_output,
                warmup,
                drawn,
            } => {
                out.push(format!(
                    "backend={backend} seed={} first_rand=0x{first_output:X}",
                    seed_to_hex(*seed)
                ));
                match (warmup, drawn) {
                    (Some(warmup), Some(drawn)) => {
                        out.push(format!("warmup={warmup}"));
                        if verbose {
                            out.extend(draw_lines(&drawn.draws));
                        }
                        out.push(code_line("code", drawn.code));
                    }
                    _ => out.push("warmup not found in search range".to_string()),
                }
            }
            Self::CodeMatches {
                backend,
                scheme,
                target,
                seed,
                bounds,
                matches,
            } => {
                out.push(format!(
                    "backend={backend} puzzle={} start_seed={}",
                    scheme.as_str(),
                    seed_to_hex(*seed)
                ));
                out.push(code_line("target", *target));
                if matches.is_empty() {
                    out.push(no_match_line(bounds));
                }
                for (i, m) in matches.iter().enumerate() {
                    out.push(format!(
                        "[{i}] advances={} seed@advance={} first_rand=0x{:X}",
                        m.advances,
                        seed_to_hex(m.state),
                        m.first_output
                    ));
                }
            }
            Self::Crematorium {
                backend,
                seed,
                warmup,
                code,
            } => {
                out.push(format!("backend={backend} puzzle=crematorium"));
                out.push(format!("seed={} warmup={warmup}", seed_to_hex(*seed)));
                if verbose {
                    out.extend(draw_lines(&code.draws));
                }
                out.push(forced_line(code.forced));
                out.push(code_line("code", code.code));
            }
            Self::CrematoriumMatches {
                backend,
                target,
                seed,
                bounds,
                matches,
            } => {
                out.push(format!(
                    "backend={backend} puzzle=crematorium start_seed={}",
                    seed_to_hex(*seed)
                ));
                out.push(code_line("target", *target));
                if matches.is_empty() {
                    out.push(no_match_line(bounds));
                }
                for (i, m) in matches.iter().enumerate() {
                    let forced = match m.forced_position {
                        Some(pos) => format!("yes pos_lsb={pos}"),
                        None => "no".to_string(),
                    };
                    out.push(format!(
                        "[{i}] advances={} seed@advance={} forced7={forced}",
                        m.advances,
                        seed_to_hex(m.state)
                    ));
                }
            }
            Self::Clock {
                backend,
                seed,
                warmup,
                mode,
                reading,
            } => {
                out.push(format!("backend={backend} mode={mode}"));
                out.push(format!("seed={} warmup={warmup}", seed_to_hex(*seed)));
                if verbose {
                    out.push(format!("hour_rand=0x{:X}", reading.hour_output));
                    out.push(format!("minute_rand=0x{:X}", reading.minute_output));
                }
                out.push(format!(
                    "time={} packed=0x{:04X}",
                    clock_text(reading.hour, reading.minute),
                    reading.packed()
                ));
            }
            Self::ClockMatches {
                backend,
                seed,
                mode,
                target,
                bounds,
                matches,
            } => {
                out.push(format!(
                    "backend={backend} mode={mode} base_seed={}",
                    seed_to_hex(*seed)
                ));
                out.push(format!("target={}", clock_target_text(*target)));
                if matches.is_empty() {
                    out.push(no_match_line(bounds));
                }
                for (i, m) in matches.iter().enumerate() {
                    let mut line = format!(
                        "[{i}] advances={} seed@advance={}",
                        m.advances,
                        seed_to_hex(m.state)
                    );
                    if let Some(output) = m.hour_output {
                        line.push_str(&format!(" hour_rand=0x{output:X}"));
                    }
                    if let Some(output) = m.minute_output {
                        line.push_str(&format!(" minute_rand=0x{output:X}"));
                    }
                    line.push_str(&format!(" packed=0x{:04X}", m.packed));
                    out.push(line);
                }
            }
            Self::BaseSeeds { query, candidates } => {
                out.push(format!(
                    "backend=ps2 mode={} target={} warmup={}",
                    query.mode,
                    clock_text(query.target_hour, query.target_minute),
                    query.warmup_after_reset
                ));
                if candidates.is_empty() {
                    out.push("no base seeds found".to_string());
                }
                for (i, c) in candidates.iter().enumerate() {
                    let mut line = format!("[{i}] base_seed={}", seed_to_hex(c.base_seed));
                    if verbose {
                        line.push_str(&format!(
                            " warmed={} hour_state={} minute_state={}",
                            seed_to_hex(c.warmed_state),
                            seed_to_hex(c.hour_state),
                            seed_to_hex(c.minute_state)
                        ));
                    }
                    out.push(line);
                }
            }
            Self::SeedPath {
                backend,
                seed,
                max_steps,
                path,
            } => {
                out.push(format!("backend={backend} base_seed={}", seed_to_hex(*seed)));
                for segment in &path.segments {
                    match segment.distance {
                        Some(distance) => out.push(format!(
                            "{} -> {} advances={distance}",
                            seed_to_hex(segment.from),
                            seed_to_hex(segment.to)
                        )),
                        None => out.push(format!(
                            "{} -> {} not found within {max_steps} advances",
                            seed_to_hex(segment.from),
                            seed_to_hex(segment.to)
                        )),
                    }
                }
                out.push(format!("total_advances={}", path.total_advances));
            }
            Self::Rewind { seed, steps, state } => {
                out.push(format!(
                    "seed={} rewound={steps} state={}",
                    seed_to_hex(*seed),
                    seed_to_hex(*state)
                ));
            }
        }
        out
    }
}

fn no_match_line(bounds: &ScanBounds) -> String {
    format!(
        "no matches in advances [{}..={}]",
        bounds.min_advances, bounds.max_advances
    )
}

fn clock_target_text(target: ClockTarget) -> String {
    match target {
        ClockTarget::Hour(hour) => format!("{hour}:--"),
        ClockTarget::Minute(minute) => format!("--:{minute:02}"),
        ClockTarget::Both { hour, minute } => clock_text(hour, minute),
    }
}
