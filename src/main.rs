// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, info, warn};

use markerlane::app_config::{Config, LogLevel};
use markerlane::grouping::{ExplicitLaneOrder, MarkerGrouper};
use markerlane::marker::{self, Marker};
use markerlane::navigation::{LaneJumpMode, NavigationAction, NavigationEngine};
use markerlane::status::StatusClassifier;
use markerlane::summary::calculate_summary;
use markerlane::time_utils::format_seconds;
use markerlane::validation::MarkerValidator;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for NavigationAction to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliNavigationAction {
    Next,
    Previous,
    NextInLane,
    PreviousInLane,
    LaneUp,
    LaneDown,
    NextUnprocessed,
    PreviousUnprocessed,
    NextUnprocessedGlobal,
    PreviousUnprocessedGlobal,
}

impl CliNavigationAction {
    fn into_action(self, mode: LaneJumpMode) -> NavigationAction {
        match self {
            CliNavigationAction::Next => NavigationAction::NextChronological,
            CliNavigationAction::Previous => NavigationAction::PreviousChronological,
            CliNavigationAction::NextInLane => NavigationAction::NextInLane,
            CliNavigationAction::PreviousInLane => NavigationAction::PreviousInLane,
            CliNavigationAction::LaneUp => NavigationAction::LaneUp(mode),
            CliNavigationAction::LaneDown => NavigationAction::LaneDown(mode),
            CliNavigationAction::NextUnprocessed => NavigationAction::NextUnprocessedInLane,
            CliNavigationAction::PreviousUnprocessed => NavigationAction::PreviousUnprocessedInLane,
            CliNavigationAction::NextUnprocessedGlobal => NavigationAction::NextUnprocessedGlobal,
            CliNavigationAction::PreviousUnprocessedGlobal => {
                NavigationAction::PreviousUnprocessedGlobal
            }
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "markerlane", version, about = "Inspect marker lanes, tracks and navigation")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (defaults to the per-user config file)
    #[arg(short, long, global = true)]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct MarkerFileArgs {
    /// JSON file containing an array of markers
    #[arg(value_name = "MARKERS_JSON")]
    markers_path: PathBuf,

    /// JSON file containing all tags, used for explicit lane ordering
    #[arg(short, long)]
    tags_path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print lanes with their markers and tracks
    Lanes(MarkerFileArgs),

    /// Print confirmed / rejected / unknown counts
    Summary(MarkerFileArgs),

    /// Report data-quality issues in a marker file
    Validate(MarkerFileArgs),

    /// Compute the marker a navigation key would select
    Navigate {
        #[command(flatten)]
        files: MarkerFileArgs,

        /// Navigation action to run
        #[arg(short, long, value_enum)]
        action: CliNavigationAction,

        /// Currently selected marker id
        #[arg(short, long)]
        selected: Option<String>,

        /// Jump to the first marker of the target lane instead of the nearest one
        #[arg(long)]
        first_marker: bool,
    },

    /// Generate shell completions for markerlane
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[0m",
            Level::Debug => "\x1B[36m",
            Level::Trace => "\x1B[2m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Trace here; the effective level is lowered via set_max_level once config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let options = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &options.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "markerlane", &mut std::io::stdout());
        return Ok(());
    }

    let config = resolve_config(options.config_path.as_deref())?;
    let log_level = options
        .log_level
        .clone()
        .map(LogLevel::from)
        .unwrap_or(config.log_level);
    log::set_max_level(log_level.to_level_filter());

    config
        .validate()
        .context("Reserved tag ids must be configured before markers can be classified")?;

    match options.command {
        Commands::Lanes(files) => run_lanes(&config, &files),
        Commands::Summary(files) => run_summary(&config, &files),
        Commands::Validate(files) => run_validate(&config, &files),
        Commands::Navigate {
            files,
            action,
            selected,
            first_marker,
        } => {
            let mode = if first_marker {
                LaneJumpMode::FirstMarker
            } else {
                config.navigation.default_lane_jump
            };
            run_navigate(&config, &files, action.into_action(mode), selected.as_deref())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

// @resolves: Explicit path, then per-user config file, then defaults
fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::load(path);
    }

    match Config::default_path() {
        Some(path) if path.is_file() => {
            debug!("Using config file {}", path.display());
            Config::load(&path)
        }
        _ => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn load_markers(path: &Path) -> Result<Vec<Marker>> {
    let markers = marker::load_markers(path)
        .with_context(|| format!("Failed to load marker file: {}", path.display()))?;
    info!("Loaded {} markers from {}", markers.len(), path.display());
    Ok(markers)
}

fn load_lane_order(config: &Config, files: &MarkerFileArgs) -> Result<Option<ExplicitLaneOrder>> {
    let Some(parent_id) = config.lane_ordering.marker_group_parent_id.as_ref() else {
        if files.tags_path.is_some() {
            warn!("Tag file given but no marker_group_parent_id configured; using alphabetical lanes");
        }
        return Ok(None);
    };

    let Some(tags_path) = files.tags_path.as_ref() else {
        return Err(anyhow!(
            "marker_group_parent_id is configured, pass --tags-path to resolve its children"
        ));
    };

    let tags = marker::load_tags(tags_path)
        .with_context(|| format!("Failed to load tag file: {}", tags_path.display()))?;
    Ok(Some(ExplicitLaneOrder::from_tags(parent_id.clone(), &tags)))
}

fn run_lanes(config: &Config, files: &MarkerFileArgs) -> Result<()> {
    let markers = load_markers(&files.markers_path)?;
    let order = load_lane_order(config, files)?;
    let classifier = StatusClassifier::new(config.reserved_tags.clone());
    let grouper = MarkerGrouper::new(config.reserved_tags.clone());

    for group in grouper.group_markers_by_tags(&markers, order.as_ref()) {
        println!(
            "[{}] {} ({} markers, {} tracks)",
            group.order,
            group.name,
            group.markers.len(),
            group.track_count
        );
        for tracked in &group.markers {
            let end = tracked
                .marker
                .end_time
                .map(|e| format_seconds(e, true))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "    track {}  {} - {}  {}  {}",
                tracked.track,
                format_seconds(tracked.marker.start_time, true),
                end,
                tracked.marker.id,
                classifier.classify(&tracked.marker)
            );
        }
    }
    Ok(())
}

fn run_summary(config: &Config, files: &MarkerFileArgs) -> Result<()> {
    let markers = load_markers(&files.markers_path)?;
    let classifier = StatusClassifier::new(config.reserved_tags.clone());
    let actions = classifier.filter_action_markers(&markers);
    let summary = calculate_summary(&classifier, &actions);

    println!("confirmed: {}", summary.confirmed);
    println!("rejected:  {}", summary.rejected);
    println!("unknown:   {}", summary.unknown);
    println!("total:     {}", summary.total());
    Ok(())
}

fn run_validate(config: &Config, files: &MarkerFileArgs) -> Result<()> {
    let markers = load_markers(&files.markers_path)?;
    let classifier = StatusClassifier::new(config.reserved_tags.clone());
    let result = MarkerValidator::new(&classifier).validate_collection(&markers);

    for entry in result.failed_entries() {
        for issue in &entry.issues {
            println!("{}: {}", entry.marker_id, issue);
        }
    }

    if result.passed {
        println!("{} markers, no issues", markers.len());
    } else {
        println!("{} issues found", result.total_issues);
    }
    Ok(())
}

fn run_navigate(
    config: &Config,
    files: &MarkerFileArgs,
    action: NavigationAction,
    selected: Option<&str>,
) -> Result<()> {
    let markers = load_markers(&files.markers_path)?;
    let order = load_lane_order(config, files)?;
    let classifier = StatusClassifier::new(config.reserved_tags.clone());
    let layout = MarkerGrouper::new(config.reserved_tags.clone()).layout(&markers, order.as_ref());
    let engine = NavigationEngine::new(&markers, Some(&layout), &classifier);

    match engine.navigate(action, selected) {
        Some(id) => println!("{}", id),
        None => println!("(no selection)"),
    }
    Ok(())
}
