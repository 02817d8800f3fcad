use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use kursdata::{
    annotate_csv, annotate_dir, build_dataset, get_value, get_value_nearest, DuplicatePolicy,
    Source,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutArg {
    /// One unpartitioned file.
    Raw,
    /// Directory of per-year files.
    ByYear,
    /// Directory of per-ISO-week files.
    ByWeek,
}

impl LayoutArg {
    fn into_source(self, path: PathBuf) -> Source {
        match self {
            LayoutArg::Raw => Source::raw(path),
            LayoutArg::ByYear => Source::by_year(path),
            LayoutArg::ByWeek => Source::by_week(path),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "kursdata", about = "Date-partitioned rate-series toolkit", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the derived dataset: X/Y split, year and week partitions,
    /// and JSON annotations.
    Build {
        /// Source series file.
        input: PathBuf,
        /// Destination directory.
        #[arg(long, short)]
        out: PathBuf,
    },
    /// Write a JSON annotation of a series file or partition directory.
    Annotate {
        /// Series file or directory of partition files.
        input: PathBuf,
        /// Destination JSON file.
        #[arg(long, short)]
        out: PathBuf,
    },
    /// Look up the value recorded for a date.
    Query {
        /// Raw file (for `raw`) or partition directory root.
        path: PathBuf,
        /// Date to query, YYYY-MM-DD.
        #[arg(long)]
        date: NaiveDate,
        /// Physical layout of the source.
        #[arg(long, value_enum, default_value = "raw")]
        layout: LayoutArg,
        /// Fall back to the nearest preceding date instead of exact match.
        #[arg(long)]
        nearest: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Build { input, out } => {
            let report = build_dataset(&input, &out)?;
            println!("X: {}", report.x.display());
            println!("Y: {}", report.y.display());
            println!("by_year: {} file(s)", report.year_files.len());
            println!("by_week: {} file(s)", report.week_files.len());
            for path in &report.annotations {
                println!("annotation: {}", path.display());
            }
        }
        Command::Annotate { input, out } => {
            let annotation = if input.is_dir() {
                annotate_dir(&input, &out)?
            } else {
                annotate_csv(&input, &out)?
            };
            println!(
                "{}: {} rows -> {}",
                annotation.path,
                annotation.row_count,
                out.display()
            );
        }
        Command::Query {
            path,
            date,
            layout,
            nearest,
        } => {
            let source = layout.into_source(path);
            let result = if nearest {
                get_value_nearest(date, &source, DuplicatePolicy::default())?
            } else {
                get_value(date, &source)?
            };
            match result {
                Some((matched, value)) => println!("{matched}: {value}"),
                None => println!("no data"),
            }
        }
    }
    Ok(())
}
