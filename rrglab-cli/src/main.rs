//! RRGLab CLI: headless access to RRG snapshots.
//!
//! Commands:
//! - `info`: snapshot counts, as-of date, digest, skipped points
//! - `rank`: the visible set for a kind and selection mode, optionally as CSV
//! - `quadrants`: how many entities sit in each quadrant

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rrglab_core::data::snapshot::Dataset;
use rrglab_core::selection::{self, Selection};
use rrglab_core::{
    EntityId, EntityKind, FileSource, Quadrant, Repository, SelectionMode, Timeframe, classify,
};

#[derive(Parser)]
#[command(name = "rrglab", about = "RRGLab CLI: relative-rotation snapshots from the terminal")]
struct Cli {
    /// Directory holding rrg_1D.json / rrg_1W.json.
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// Snapshot timeframe: 1D or 1W.
    #[arg(long, short, global = true, default_value = "1D")]
    timeframe: Timeframe,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a snapshot: counts, as-of date, digest.
    Info,
    /// Print the visible set for a kind and selection mode.
    Rank {
        #[arg(long, value_enum, default_value_t = KindArg::Industry)]
        kind: KindArg,

        #[arg(long, value_enum, default_value_t = ModeArg::TopRatio)]
        mode: ModeArg,

        /// N for top/bottom modes.
        #[arg(long, default_value_t = 10)]
        count: usize,

        /// Industry ids for `--mode membership` (repeatable).
        #[arg(long = "industry")]
        industries: Vec<String>,

        /// Write rows to this CSV file instead of printing a table.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Count entities per quadrant at their latest point.
    Quadrants {
        #[arg(long, value_enum, default_value_t = KindArg::Industry)]
        kind: KindArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Industry,
    Group,
    Symbol,
}

impl From<KindArg> for EntityKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Industry => EntityKind::Industry,
            KindArg::Group => EntityKind::Group,
            KindArg::Symbol => EntityKind::Symbol,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Membership,
    TopRatio,
    BottomRatio,
    TopMomentum,
    BottomMomentum,
}

impl ModeArg {
    fn into_mode(self, count: usize, industries: &[String]) -> SelectionMode {
        match self {
            ModeArg::Membership => {
                SelectionMode::ByMembership(industries.iter().map(|s| EntityId::new(s.as_str())).collect())
            }
            ModeArg::TopRatio => SelectionMode::TopNByRatio(count),
            ModeArg::BottomRatio => SelectionMode::BottomNByRatio(count),
            ModeArg::TopMomentum => SelectionMode::TopNByMomentum(count),
            ModeArg::BottomMomentum => SelectionMode::BottomNByMomentum(count),
        }
    }
}

/// One CSV/table row of the visible set.
#[derive(Debug, Serialize)]
struct RankRow {
    rank: usize,
    id: String,
    name: String,
    industry: String,
    rs_ratio: f64,
    rs_momentum: f64,
    quadrant: &'static str,
    date: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut repo = Repository::new(FileSource::new(cli.data_dir.clone()));
    let dataset = repo
        .load(cli.timeframe)
        .with_context(|| format!("failed to load {} snapshot from {}", cli.timeframe, cli.data_dir.display()))?;

    match cli.command {
        Commands::Info => run_info(&dataset),
        Commands::Rank {
            kind,
            mode,
            count,
            industries,
            csv,
        } => {
            let mode = mode.into_mode(count, &industries);
            let selection = selection::select(&dataset, kind.into(), &mode)
                .with_context(|| format!("invalid selection mode: {mode}"))?;
            let rows = rank_rows(&dataset, &selection);
            match csv {
                Some(path) => export_csv(&path, &rows),
                None => {
                    print_rows(&selection, &rows);
                    Ok(())
                }
            }
        }
        Commands::Quadrants { kind } => {
            print_quadrants(&dataset, kind.into());
            Ok(())
        }
    }
}

fn run_info(dataset: &Dataset) -> Result<()> {
    println!("Timeframe:     {}", dataset.timeframe);
    println!(
        "As of:         {}",
        dataset.rrg_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
    );
    if let Some(n) = dataset.tail_length {
        println!("Tail length:   {n}");
    }
    println!("Industries:    {}", dataset.industries.len());
    println!("Groups:        {}", dataset.groups.len());
    println!("Symbols:       {}", dataset.symbols.len());
    println!("Points:        {}", dataset.point_count());
    if dataset.dropped_points > 0 {
        println!("Skipped:       {} invalid points", dataset.dropped_points);
    }
    println!("Digest:        {}", dataset.digest);
    Ok(())
}

fn rank_rows(dataset: &Dataset, selection: &Selection<'_>) -> Vec<RankRow> {
    selection
        .series
        .iter()
        .enumerate()
        .filter_map(|(i, s)| {
            let latest = s.latest()?;
            let industry = match selection.kind {
                EntityKind::Symbol => dataset.industry_of(s.id()).map(|e| e.name).unwrap_or_default(),
                _ => String::new(),
            };
            Some(RankRow {
                rank: i + 1,
                id: s.id().to_string(),
                name: s.name().to_string(),
                industry,
                rs_ratio: latest.x,
                rs_momentum: latest.y,
                quadrant: classify(latest).map(|q| q.label()).unwrap_or("-"),
                date: latest.date.to_string(),
            })
        })
        .collect()
}

fn print_rows(selection: &Selection<'_>, rows: &[RankRow]) {
    println!("{} | {} | {} shown", selection.kind.label(), selection.mode, rows.len());
    println!(
        "{:>4}  {:<10} {:<28} {:>9} {:>9}  {:<10} {}",
        "#", "ID", "NAME", "RS-RATIO", "RS-MOM", "QUADRANT", "INDUSTRY"
    );
    for r in rows {
        println!(
            "{:>4}  {:<10} {:<28} {:>9.2} {:>9.2}  {:<10} {}",
            r.rank, r.id, r.name, r.rs_ratio, r.rs_momentum, r.quadrant, r.industry
        );
    }
    if selection.was_truncated() {
        println!("({} more not shown, limit {})", selection.dropped, rrglab_core::MAX_VISIBLE);
    }
}

fn export_csv(path: &Path, rows: &[RankRow]) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_csv(file, rows)?;
    info!(rows = rows.len(), path = %path.display(), "wrote csv");
    println!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn write_csv<W: Write>(writer: W, rows: &[RankRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Per-quadrant counts for the latest point of every renderable series.
fn quadrant_counts(dataset: &Dataset, kind: EntityKind) -> [(Quadrant, Vec<&EntityId>); 4] {
    let mut buckets = Quadrant::ALL.map(|q| (q, Vec::new()));
    for s in dataset.series(kind) {
        let Some(q) = s.latest().and_then(|p| classify(p).ok()) else {
            continue;
        };
        if let Some((_, ids)) = buckets.iter_mut().find(|(bq, _)| *bq == q) {
            ids.push(s.id());
        }
    }
    buckets
}

fn print_quadrants(dataset: &Dataset, kind: EntityKind) {
    println!("{} ({})", kind.label(), dataset.timeframe);
    for (q, ids) in quadrant_counts(dataset, kind) {
        let names: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        println!("  {:<10} {:>3}  {}", q.label(), ids.len(), names.join(", "));
    }
}
