use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

mod diagnostics;
mod error;
mod event;
mod layout;
mod model;
mod record;
mod render;
mod template;

use crate::layout::{FieldLayout, parse_delimiter};
use crate::model::Bracketing;
use crate::template::OutputTemplate;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "event-transitions")]
#[command(about = "Transition matrices and diagrams from event logs", long_about = None)]
struct Cli {
    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a transition table into a Mermaid diagram.
    Diag {
        /// Table produced by `matrix`.
        #[arg(long = "in", value_name = "FILE")]
        input: PathBuf,

        /// Keep only transitions counted more than this many times.
        #[arg(long, default_value_t = 0)]
        min: u64,

        /// Field delimiter of the table.
        #[arg(long, default_value = ",")]
        delimiter: String,

        /// Write the diagram here instead of stdout.
        #[arg(short = 'o', long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Build one transition table per category from an event export.
    Matrix {
        /// Event export (one header line, one event per line).
        #[arg(long = "in", value_name = "FILE")]
        input: PathBuf,

        /// Output path template; `{kind}` is replaced by the category id, `-` is stdout.
        #[arg(short = 'o', long, default_value = template::DEFAULT_TEMPLATE)]
        out: String,

        /// Name of the synthetic event entering every run.
        #[arg(long, requires = "stop")]
        start: Option<String>,

        /// Name of the synthetic event leaving every run.
        #[arg(long, requires = "start")]
        stop: Option<String>,

        /// Field delimiter of the event export (overrides the layout file).
        #[arg(long)]
        delimiter: Option<String>,

        /// Field delimiter of the written tables.
        #[arg(long, default_value = ",")]
        table_delimiter: String,

        /// JSON file mapping columns to event fields.
        #[arg(long, value_name = "FILE")]
        layout: Option<PathBuf>,

        /// Also write a Mermaid diagram per category to this template.
        #[arg(long, value_name = "TEMPLATE")]
        diagram: Option<String>,

        /// Minimum-weight filter for `--diagram`.
        #[arg(long, default_value_t = 0)]
        min: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    run(cli.cmd)
}

fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Diag {
            input,
            min,
            delimiter,
            out,
        } => {
            let delimiter = parse_delimiter("--delimiter", &delimiter)?;
            let table = render::read_table_file(&input, delimiter)?;
            log::info!(
                "read {} rows x {} columns from {}",
                table.rows.len(),
                table.columns.len(),
                input.display()
            );

            let diagram = render::render_diagram(&table, min);
            match out {
                Some(path) => {
                    fs::write(&path, diagram)
                        .with_context(|| format!("write diagram {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                None => {
                    std::io::stdout()
                        .write_all(diagram.as_bytes())
                        .context("write diagram to stdout")?;
                }
            }
        }

        Commands::Matrix {
            input,
            out,
            start,
            stop,
            delimiter,
            table_delimiter,
            layout: layout_file,
            diagram,
            min,
        } => {
            // 1) Validate everything that can be validated before reading input.
            let mut field_layout = match &layout_file {
                Some(path) => layout::load_layout_file(path)?,
                None => FieldLayout::default(),
            };
            if let Some(d) = delimiter {
                field_layout.delimiter = parse_delimiter("--delimiter", &d)?;
                field_layout.validate()?;
            }
            let table_delimiter = parse_delimiter("--table-delimiter", &table_delimiter)?;
            let tables_to = OutputTemplate::parse(&out)?;
            let diagrams_to = diagram.as_deref().map(OutputTemplate::parse).transpose()?;

            let bracketing = match (start, stop) {
                (Some(start), Some(stop)) => Bracketing::bracketed(start, stop),
                _ => Bracketing::Bare,
            };

            // 2) Load.
            let loaded = event::load_events_file(&input, &field_layout)?;
            loaded.diagnostics.emit(&input.display().to_string());
            log::info!(
                "loaded {} events in {} categories from {}",
                loaded.event_count(),
                loaded.by_category.len(),
                input.display()
            );
            if !loaded.diagnostics.is_empty() {
                log::info!(
                    "skipped {} records ({} malformed)",
                    loaded.diagnostics.skipped.len(),
                    loaded.diagnostics.warning_count()
                );
            }

            for t in std::iter::once(&tables_to).chain(diagrams_to.as_ref()) {
                if !t.is_per_category() && loaded.by_category.len() > 1 {
                    bail!(
                        "output template has no {{kind}} placeholder but {} holds {} categories",
                        input.display(),
                        loaded.by_category.len()
                    );
                }
            }

            // 3) Build + render every category before touching the filesystem.
            let mut artifacts: Vec<(i64, String, Option<String>)> = Vec::new();
            for (kind, events) in &loaded.by_category {
                let matrix = model::build_transition_matrix(events, &bracketing);
                log::debug!(
                    "kind {}: {} events, {} names, {} transitions",
                    kind,
                    events.len(),
                    matrix.names().len(),
                    matrix.total()
                );
                if matrix.is_empty() {
                    log::info!("kind {}: no transitions", kind);
                }
                let table = render::render_table(&matrix, table_delimiter)?;
                let diagram = diagrams_to
                    .as_ref()
                    .map(|_| render::render_matrix_diagram(&matrix, min));
                artifacts.push((*kind, table, diagram));
            }

            // 4) Write.
            let mut stdout = std::io::stdout();
            for (kind, table, diagram) in artifacts {
                emit(&mut stdout, &tables_to, "matrix", kind, &table)?;
                if let (Some(to), Some(diagram)) = (&diagrams_to, diagram) {
                    emit(&mut stdout, to, "diagram", kind, &diagram)?;
                }
            }
        }
    }

    Ok(())
}

/// Write one artifact to its expanded path, or to stdout under a caption.
fn emit<W: Write>(
    stdout: &mut W,
    to: &OutputTemplate,
    what: &str,
    kind: i64,
    body: &str,
) -> Result<()> {
    match to.expand(kind) {
        Some(path) => {
            fs::write(&path, body).with_context(|| format!("write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => {
            writeln!(stdout, "Transition {} for kind_id {}:", what, kind)?;
            stdout.write_all(body.as_bytes())?;
        }
    }
    Ok(())
}

/// Initialize logging based on verbosity level; `RUST_LOG` wins when set.
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
