use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::mpsc;

use algotrace::playback::PlaybackUpdate;
use algotrace::trace::tape;
use algotrace::util::DataPaths;
use algotrace::{AnyTrace, Config, Step, Trace, TraceRequest, Visualization};

#[derive(Parser)]
#[command(
    name = "algotrace",
    version,
    about = "Record and replay step-by-step traces of classic algorithms."
)]
struct Cli {
    /// Data directory for config, logs and tapes (default: ~/.algotrace).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a JSON request and print its trace.
    Run {
        /// Request file, or `-` for stdin.
        request: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        /// Save the trace as a JSONL tape. Without a path, the tape goes to
        /// the data directory's `tapes/` folder.
        #[arg(long, value_name = "TAPE", num_args = 0..=1)]
        save: Option<Option<PathBuf>>,
    },
    /// Print or play back a saved tape.
    Replay {
        tape: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the config file path and effective values.
    Config,
}

#[derive(clap::Args)]
struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Narrate the trace one step at a time instead of printing it at once.
    #[arg(long)]
    play: bool,

    /// Delay between steps while playing, in milliseconds.
    #[arg(long, value_name = "MS")]
    speed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Jsonl,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = DataPaths::resolve(cli.data_dir.clone());

    // Initialize logging to file (<data dir>/logs/algotrace.log)
    let log_path = paths.log_file();
    if let Some(logs_dir) = log_path.parent() {
        fs::create_dir_all(logs_dir).context("failed to create logs directory")?;
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .init();

    let config = Config::load(&paths);

    match cli.command {
        Command::Run {
            request,
            output,
            save,
        } => run(&paths, &config, &request, &output, save).await,
        Command::Replay { tape, output } => replay(&config, &tape, &output).await,
        Command::Config => show_config(&paths, &config),
    }
}

async fn run(
    paths: &DataPaths,
    config: &Config,
    request_path: &Path,
    output: &OutputArgs,
    save: Option<Option<PathBuf>>,
) -> Result<()> {
    let request = read_request(request_path)?;
    let run = request
        .run(config)
        .with_context(|| format!("failed to run {} request", request.family()))?;

    if let Some(target) = save {
        let path = match target {
            Some(path) => path,
            None => {
                fs::create_dir_all(paths.tapes_dir()).context("failed to create tapes directory")?;
                paths.tape_for(run.trace.family(), run.algorithm, tape::now_ms())
            }
        };
        run.trace
            .write_tape_to_path(run.algorithm, &path)
            .with_context(|| format!("failed to write tape {}", path.display()))?;
        eprintln!("Saved tape to {}", path.display());
    }

    emit(config, &run.trace, run.algorithm, output).await?;

    if output.format == OutputFormat::Text {
        if let Some(value) = run.return_value {
            println!("Returned {value}");
        }
    }
    Ok(())
}

async fn replay(config: &Config, path: &Path, output: &OutputArgs) -> Result<()> {
    let (header, trace) = AnyTrace::read_tape(path)
        .with_context(|| format!("failed to read tape {}", path.display()))?;
    tracing::debug!(
        family = %header.family,
        algorithm = %header.algorithm,
        steps = trace.len(),
        "Replaying tape"
    );
    emit(config, &trace, &header.algorithm, output).await
}

fn read_request(path: &Path) -> Result<TraceRequest> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read request from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read request {}", path.display()))?
    };
    serde_json::from_str(&contents).context("invalid request")
}

async fn emit(config: &Config, trace: &AnyTrace, algorithm: &str, output: &OutputArgs) -> Result<()> {
    let play = output.play || config.playback.autoplay;
    match output.format {
        OutputFormat::Text if play => {
            let speed = output
                .speed
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.playback.speed());
            play_any(trace, speed).await
        }
        OutputFormat::Text => {
            let mut out = io::stdout().lock();
            for (index, step) in trace.steps().into_iter().enumerate() {
                print_step(&mut out, index, step)?;
            }
            Ok(())
        }
        _ if output.play => bail!("--play only applies to text output"),
        OutputFormat::Json => {
            let doc = serde_json::json!({
                "family": trace.family(),
                "algorithm": algorithm,
                "steps": trace.to_json()?,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
            Ok(())
        }
        OutputFormat::Jsonl => {
            trace.write_tape(algorithm, io::stdout().lock())?;
            Ok(())
        }
    }
}

fn print_step(out: &mut impl Write, index: usize, step: &dyn Step) -> io::Result<()> {
    writeln!(out, "{index:>4}  {:<12} {}", step.kind(), step.message())
}

async fn play_any(trace: &AnyTrace, speed: Duration) -> Result<()> {
    match trace {
        AnyTrace::Graph(t) => play(t.clone(), speed).await,
        AnyTrace::Heap(t) => play(t.clone(), speed).await,
        AnyTrace::Tree(t) => play(t.clone(), speed).await,
        AnyTrace::Matrix(t) => play(t.clone(), speed).await,
        AnyTrace::Search(t) => play(t.clone(), speed).await,
        AnyTrace::List(t) => play(t.clone(), speed).await,
        AnyTrace::LinkedList(t) => play(t.clone(), speed).await,
    }
}

/// Print each step as the playback timer reaches it.
async fn play<S: Step>(trace: Trace<S>, speed: Duration) -> Result<()> {
    let mut vis = Visualization::new(trace, speed);
    let mut out = io::stdout();
    let mut printed = 0;
    if let Some(step) = vis.current() {
        print_step(&mut out, 0, step)?;
    }
    if vis.trace().len() <= 1 {
        return Ok(());
    }

    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let handle = vis.spawn_driver(update_tx);
    handle.play();

    while let Some(update) = update_rx.recv().await {
        if !vis.observe(update) {
            continue;
        }
        let position = vis.position();
        if position != printed {
            if let Some(step) = vis.current() {
                print_step(&mut out, position, step)?;
            }
            out.flush()?;
            printed = position;
        }
        if matches!(update, PlaybackUpdate::Finished { .. }) {
            break;
        }
    }

    handle.shutdown();
    Ok(())
}

fn show_config(paths: &DataPaths, config: &Config) -> Result<()> {
    println!("Config file: {}", paths.config_file().display());
    println!();
    println!("[playback]");
    println!("speed_ms = {}", config.playback.speed_ms);
    println!("autoplay = {}", config.playback.autoplay);
    println!();
    println!("[heap]");
    println!("kind = \"{}\"", config.heap.kind.as_str());
    println!();
    println!("[list]");
    println!("capacity = {}", config.list.capacity);
    Ok(())
}
