use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;

use venueviz::csv_reader;
use venueviz::data::Dataset;
use venueviz::parser;
use venueviz::runtime;

#[derive(Parser, Debug)]
#[command(name = "venueviz")]
#[command(about = "Generate SVG charts from CSV data using the ChartPipe DSL", long_about = None)]
struct Args {
    /// ChartPipe DSL string (e.g., 'group(by: file) | count(as: events) | bars(metric: events)')
    dsl: String,

    /// Read CSV from this file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Write SVG to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let csv_data = match &args.input {
        Some(path) => csv_reader::read_csv_from_path(path)
            .with_context(|| format!("Failed to read CSV from {}", path.display()))?,
        None => csv_reader::read_csv_from_stdin().context("Failed to read CSV from stdin")?,
    };
    let dataset = Dataset::from_csv(csv_data);

    // Parse the DSL string
    let chart_spec = match parser::parse_chart_spec(&args.dsl) {
        Ok((remaining, chart_spec)) => {
            if !remaining.trim().is_empty() {
                eprintln!("Warning: unparsed input: '{}'", remaining);
            }
            chart_spec
        }
        Err(e) => {
            eprintln!("Parse error: {:?}", e);
            std::process::exit(1);
        }
    };

    let svg = runtime::render_chart(&chart_spec, &dataset).context("Failed to render chart")?;

    match &args.output {
        Some(path) => std::fs::write(path, svg)
            .with_context(|| format!("Failed to write SVG to {}", path.display()))?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(svg.as_bytes())
                .context("Failed to write SVG to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
