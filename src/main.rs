use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rainstack::engine::levels_total;
use rainstack::{
    compute, parse_heights, render_trace, water_levels, HeightSequence, ParseConfig, Session,
    StepFrame,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rainstack", about = "Trapped rain water with a steppable stack trace")]
struct Cli {
    /// Separator between heights.
    #[arg(long, global = true, default_value_t = ',')]
    separator: char,
    /// Reject inputs with more bars than this.
    #[arg(long, global = true, default_value_t = ParseConfig::default().max_bars)]
    max_bars: usize,
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct HeightsInput {
    /// Heights, e.g. "4,2,0,3,2,5".
    heights: Option<String>,
    /// Read heights from a file instead.
    #[arg(long, conflicts_with = "heights")]
    file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the total trapped water and step counts.
    Solve {
        #[command(flatten)]
        input: HeightsInput,
    },
    /// Print every recorded step.
    Trace {
        #[command(flatten)]
        input: HeightsInput,
        /// Emit the trace as JSON (requires the `visualize` feature).
        #[arg(long)]
        json: bool,
    },
    /// Step through the trace interactively from stdin.
    Walk {
        #[command(flatten)]
        input: HeightsInput,
    },
    /// Print the water depth above each bar.
    Levels {
        #[command(flatten)]
        input: HeightsInput,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ParseConfig {
        separator: cli.separator,
        max_bars: cli.max_bars,
    };

    match cli.command {
        Commands::Solve { input } => run_solve(read_heights(&input, &config)?),
        Commands::Trace { input, json } => run_trace(read_heights(&input, &config)?, json)?,
        Commands::Walk { input } => {
            run_walk(read_heights(&input, &config)?, io::stdin().lock(), io::stdout())?
        }
        Commands::Levels { input } => run_levels(read_heights(&input, &config)?),
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn read_heights(input: &HeightsInput, config: &ParseConfig) -> Result<HeightSequence> {
    let text = match (&input.heights, &input.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read heights from {}", path.display()))?,
        (None, None) => bail!("no heights given; pass them inline or with --file"),
    };
    let text = join_lines(&text, config.separator);
    parse_heights(&text, config).context("invalid height list")
}

/// Fold a multi-line height list into one line.
///
/// Each line may end with its own separator, so "4,2,\n0" and "4,2\n0" read
/// the same. Blank lines are skipped.
fn join_lines(text: &str, separator: char) -> String {
    if separator.is_whitespace() {
        return text.to_owned();
    }
    text.lines()
        .map(|line| {
            let line = line.trim();
            line.strip_suffix(separator).map_or(line, str::trim_end)
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(&separator.to_string())
}

fn run_solve(heights: HeightSequence) {
    let run = compute(heights);
    let counts = run.trace.counts();
    println!(
        "bars={}\ttotal_water={}\tsteps={}\tpushes={}\tpops={}\taccretions={}",
        run.heights.len(),
        run.total_water,
        counts.total(),
        counts.pushes,
        counts.pops,
        counts.accretions
    );
}

fn run_trace(heights: HeightSequence, json: bool) -> Result<()> {
    let run = compute(heights);

    if json {
        return print_trace_json(&run.trace);
    }

    print!("{}", render_trace(&run.trace));
    println!("Total trapped water: {} units", run.total_water);
    Ok(())
}

#[cfg(feature = "visualize")]
fn print_trace_json(trace: &rainstack::Trace) -> Result<()> {
    let stdout = io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), trace).context("failed to write trace JSON")?;
    println!();
    Ok(())
}

#[cfg(not(feature = "visualize"))]
fn print_trace_json(_trace: &rainstack::Trace) -> Result<()> {
    bail!("JSON output requires building with the `visualize` feature")
}

/// One line of input to `rainstack walk`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkCommand {
    Next,
    Prev,
    Reset,
    End,
    /// One-based step number
    Goto(usize),
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
enum WalkCommandError {
    #[error("usage: g <step number>")]
    GotoUsage,
    #[error("unknown command {0:?}")]
    Unknown(String),
}

/// Parse a walk command; blank lines yield `None`.
fn parse_walk_command(line: &str) -> Result<Option<WalkCommand>, WalkCommandError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let command = match word {
        "n" | "next" => WalkCommand::Next,
        "p" | "prev" => WalkCommand::Prev,
        "r" | "reset" => WalkCommand::Reset,
        "e" | "end" => WalkCommand::End,
        "g" | "goto" => words
            .next()
            .and_then(|word| word.parse::<usize>().ok())
            .filter(|&step| step > 0)
            .map(WalkCommand::Goto)
            .ok_or(WalkCommandError::GotoUsage)?,
        "q" | "quit" => WalkCommand::Quit,
        other => return Err(WalkCommandError::Unknown(other.to_owned())),
    };
    Ok(Some(command))
}

fn run_walk(heights: HeightSequence, input: impl BufRead, mut out: impl Write) -> Result<()> {
    let mut session = Session::with_heights(heights);
    if session.trace().is_empty() {
        writeln!(out, "No bars, nothing to step through.")?;
        return Ok(());
    }

    writeln!(out, "Commands: n(ext), p(rev), r(eset), e(nd), g <step>, q(uit)")?;
    print_frame(&mut out, session.frame())?;

    for line in input.lines() {
        let line = line.context("failed to read command")?;
        let command = match parse_walk_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };
        match command {
            WalkCommand::Next => {
                session.step_forward();
            }
            WalkCommand::Prev => {
                session.step_backward();
            }
            WalkCommand::Reset => session.reset(),
            WalkCommand::End => {
                session.seek(usize::MAX);
            }
            WalkCommand::Goto(step) => {
                session.seek(step - 1);
            }
            WalkCommand::Quit => break,
        }
        print_frame(&mut out, session.frame())?;
        out.flush()?;
    }

    Ok(())
}

fn print_frame(out: &mut impl Write, frame: Option<StepFrame>) -> io::Result<()> {
    let Some(frame) = frame else {
        return Ok(());
    };
    writeln!(out, "{}", frame.describe())?;
    writeln!(
        out,
        "  stack heights {:?}{}{}",
        frame.stack_heights,
        if frame.has_previous { "" } else { "  [first]" },
        if frame.has_next { "" } else { "  [last]" }
    )
}

fn run_levels(heights: HeightSequence) {
    let run = compute(heights.clone());
    let levels = water_levels(heights.as_slice());

    for (index, (&height, &level)) in heights.as_slice().iter().zip(&levels).enumerate() {
        println!("{index}\theight={height}\twater={level}");
    }

    let levels_sum = levels_total(&levels);
    if levels_sum != run.total_water {
        tracing::warn!(
            stack_total = run.total_water,
            levels_total = levels_sum,
            "per-bar levels disagree with the stack total"
        );
    }
    println!("Total trapped water: {} units", run.total_water);
}
