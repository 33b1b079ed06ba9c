use std::path::PathBuf;
use std::process;

use autostage::{compile_chart_file, Command, CommandOrder, CompileOptions, CompiledChart, Header, StageError};
use clap::{Parser, ValueEnum};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "autostage",
    version,
    about = "Compile a rhythm-game chart into timed two-hand actuator commands"
)]
struct Cli {
    /// Chart file to compile
    chart: PathBuf,

    /// Tempo in BPM (defaults to the chart's BPM header)
    #[arg(long)]
    bpm: Option<f64>,

    /// Global offset in milliseconds (defaults to the chart's Offset header)
    #[arg(long, allow_hyphen_values = true)]
    offset: Option<i64>,

    /// Command ordering: generation or timestamp
    #[arg(long)]
    order: Option<CommandOrder>,

    /// YAML options file; command-line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Which hand's commands to print
    #[arg(long, value_enum, default_value_t = HandSelection::Both)]
    hand: HandSelection,

    /// Output format: wire messages or a YAML document
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum HandSelection {
    Left,
    Right,
    Both,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One wire message per line
    Text,
    /// Header, timing and per-hand commands as YAML
    Yaml,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct Output<'a> {
    header: &'a Header,
    bpm: f64,
    offset_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    left: Option<&'a [Command]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    right: Option<&'a [Command]>,
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), StageError> {
    let mut options = match &cli.config {
        Some(path) => CompileOptions::load(path)?,
        None => CompileOptions::default(),
    };
    if cli.bpm.is_some() {
        options.bpm = cli.bpm;
    }
    if cli.offset.is_some() {
        options.offset_ms = cli.offset;
    }
    if let Some(order) = cli.order {
        options.order = order;
    }

    let compiled = compile_chart_file(&cli.chart, &options)?;
    let (left, right) = select(&compiled, cli.hand);

    match cli.format {
        OutputFormat::Text => {
            for command in left.into_iter().chain(right).flatten() {
                println!("{}", command);
            }
        }
        OutputFormat::Yaml => {
            let output = Output {
                header: &compiled.header,
                bpm: compiled.bpm,
                offset_ms: compiled.offset_ms,
                left,
                right,
            };
            let yaml = serde_yaml::to_string(&output)
                .map_err(|e| StageError::Config(format!("Failed to write YAML: {}", e)))?;
            print!("{}", yaml);
        }
    }

    Ok(())
}

fn select(compiled: &CompiledChart, hand: HandSelection) -> (Option<&[Command]>, Option<&[Command]>) {
    let left = Some(compiled.left.as_slice());
    let right = Some(compiled.right.as_slice());
    match hand {
        HandSelection::Left => (left, None),
        HandSelection::Right => (None, right),
        HandSelection::Both => (left, right),
    }
}
