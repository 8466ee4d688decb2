mod display;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use sourcemark_core::{ReviewEvent, Scope, Snapshot, audit};
use sourcemark_review::{
    CorrectionWorkflow, PanelAction, PanelFilter, PanelState, ReviewConfig, ReviewError, SortKey,
    cards, render, summary,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "sourcemark", version, about = "Review extracted parameters against their source text")]
struct Cli {
    /// JSON review config (context window, validation limits).
    #[arg(long, global = true, env = "SOURCEMARK_CONFIG")]
    config: Option<PathBuf>,

    /// Characters of context shown around each card's highlight.
    #[arg(long, global = true, env = "SOURCEMARK_CONTEXT_CHARS")]
    context_chars: Option<usize>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the text with highlighted parameters and a legend.
    Render {
        /// Extraction snapshot (JSON).
        snapshot: PathBuf,
    },
    /// Print parameter cards with context previews.
    Panel {
        snapshot: PathBuf,
        #[arg(long, value_enum, default_value = "all")]
        filter: FilterArg,
        #[arg(long, value_enum, default_value = "name")]
        sort: SortArg,
        /// Only cards whose name or value contains this text.
        #[arg(long)]
        query: Option<String>,
    },
    /// List data-quality issues in a snapshot.
    Audit { snapshot: PathBuf },
    /// Correct one parameter's value and emit the correction event.
    Correct {
        snapshot: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        value: String,
        #[arg(long)]
        reason: Option<String>,
        /// Write the updated snapshot here.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Mark one parameter as reviewed.
    Confirm {
        snapshot: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Remove one parameter from the active set.
    Delete {
        snapshot: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    All,
    Stream,
    Job,
    High,
    Review,
    Confirmed,
}

impl From<FilterArg> for PanelFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => PanelFilter::All,
            FilterArg::Stream => PanelFilter::Scope(Scope::Stream),
            FilterArg::Job => PanelFilter::Scope(Scope::Job),
            FilterArg::High => PanelFilter::HighConfidence,
            FilterArg::Review => PanelFilter::NeedsReview,
            FilterArg::Confirmed => PanelFilter::Confirmed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    Confidence,
    Extracted,
    Scope,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortKey::Name,
            SortArg::Confidence => SortKey::ConfidenceDesc,
            SortArg::Extracted => SortKey::ExtractedAtDesc,
            SortArg::Scope => SortKey::Scope,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    info!("sourcemark v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_deref(), cli.context_chars)?;

    match cli.command {
        Command::Render { snapshot } => {
            let snapshot = load_snapshot(&snapshot)?;
            let segments = render(&snapshot.full_text, &snapshot.parameters);
            display::print_highlighted(&segments);
        }
        Command::Panel {
            snapshot,
            filter,
            sort,
            query,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let mut state = PanelState::default();
            state.apply(PanelAction::SetFilter(filter.into()));
            state.apply(PanelAction::SetSort(sort.into()));
            state.apply(PanelAction::SetQuery(query));
            let visible = cards(
                &state,
                &snapshot.full_text,
                &snapshot.parameters,
                config.context_chars,
            );
            display::print_cards(&visible);
            display::print_summary(&summary(&snapshot.parameters), snapshot.completion());
        }
        Command::Audit { snapshot } => {
            let snapshot = load_snapshot(&snapshot)?;
            let issues = audit(&snapshot.full_text, &snapshot.parameters);
            display::print_issues(&issues);
        }
        Command::Correct {
            snapshot,
            name,
            value,
            reason,
            out,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let target = snapshot
                .get(&name)
                .ok_or_else(|| ReviewError::UnknownParameter(name.clone()))?;
            let mut workflow = CorrectionWorkflow::new(config.validation);
            workflow.open(Some(target));
            let report = workflow.set_value(value)?;
            display::print_validation(report);
            workflow.set_reason(reason)?;
            let event = ReviewEvent::from(workflow.save()?);
            emit(&snapshot, &event, out.as_deref())?;
        }
        Command::Confirm {
            snapshot,
            name,
            out,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            ensure_known(&snapshot, &name)?;
            emit(&snapshot, &ReviewEvent::confirm(name), out.as_deref())?;
        }
        Command::Delete {
            snapshot,
            name,
            out,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            ensure_known(&snapshot, &name)?;
            emit(&snapshot, &ReviewEvent::delete(name), out.as_deref())?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>, context_chars: Option<usize>) -> anyhow::Result<ReviewConfig> {
    let mut config = match path {
        Some(p) => ReviewConfig::from_json_file(p)?,
        None => ReviewConfig::default(),
    };
    if let Some(k) = context_chars {
        config.context_chars = k;
    }
    Ok(config)
}

fn load_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&raw)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    info!(
        parameters = snapshot.parameters.len(),
        chars = snapshot.text_len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

fn ensure_known(snapshot: &Snapshot, name: &str) -> Result<(), ReviewError> {
    match snapshot.get(name) {
        Some(_) => Ok(()),
        None => Err(ReviewError::UnknownParameter(name.to_string())),
    }
}

/// Print the event as JSON on stdout and optionally write the next snapshot.
fn emit(snapshot: &Snapshot, event: &ReviewEvent, out: Option<&Path>) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(event)?);
    if let Some(out) = out {
        let next = snapshot.apply(event);
        let json = serde_json::to_string_pretty(&next)?;
        std::fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;
        info!(path = %out.display(), completion = next.completion(), "wrote updated snapshot");
    }
    Ok(())
}
