//! Logging bootstrap.
//!
//! Each key of [`LoggingConfig`] names a subsystem (a tracing target prefix such
//! as `employees` or `sea_orm`); the `default` key covers every target that no
//! explicit section claims. A section drives two sinks: a human-readable console
//! layer and an optional JSON file written through a size-rotated writer.

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};
use parking_lot::Mutex;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::filter::{FilterFn, Targets};
use tracing_subscriber::layer::{Filter, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Registry};

use crate::config::{LoggingConfig, Section};

const DEFAULT_KEY: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

fn parse_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// `target == prefix` or `target` starts with `prefix::`.
fn target_matches(target: &str, prefix: &str) -> bool {
    target
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

// -------- rotating file sink --------

type SharedRotate = Arc<Mutex<FileRotate<AppendCount>>>;

#[derive(Clone)]
struct FileSink(SharedRotate);

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

/// Writer that drops everything when no file is routed for a target.
struct MaybeFile(Option<FileSink>);

impl Write for MaybeFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(w) => w.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

/// Picks the file for a record by its target; falls back to the default file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<SharedRotate>,
    by_prefix: Vec<(String, SharedRotate)>,
}

impl FileRouter {
    fn route(&self, target: &str) -> Option<FileSink> {
        self.by_prefix
            .iter()
            .find(|(prefix, _)| target_matches(target, prefix))
            .map(|(_, w)| w)
            .or(self.default.as_ref())
            .map(|w| FileSink(w.clone()))
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = MaybeFile;

    fn make_writer(&'a self) -> Self::Writer {
        MaybeFile(self.default.as_ref().map(|w| FileSink(w.clone())))
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        MaybeFile(self.route(meta.target()))
    }
}

/// Resolve a log file path against `base_dir` (home_dir).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating(log_path: &Path, section: &Section) -> std::io::Result<SharedRotate> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let rot = FileRotate::new(
        log_path,
        AppendCount::new(section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS)),
        ContentLimit::BytesSurpassed(usize::try_from(max_bytes).unwrap_or(usize::MAX)),
        Compression::None,
        #[cfg(unix)]
        None,
    );

    Ok(Arc::new(Mutex::new(rot)))
}

fn file_for(name: &str, section: &Section, base_dir: &Path) -> Option<SharedRotate> {
    if section.file.trim().is_empty() {
        return None;
    }
    let log_path = resolve_log_path(&section.file, base_dir);
    match open_rotating(&log_path, section) {
        Ok(w) => Some(w),
        Err(e) => {
            // The subscriber is not installed yet, so stderr is the only channel.
            eprintln!(
                "Failed to open log file for '{}': {} ({})",
                name,
                log_path.display(),
                e
            );
            None
        }
    }
}

// -------- filters --------

/// Per-subsystem filter for explicit sections; everything else is OFF.
fn explicit_targets(sections: &[(&String, &Section)], pick: fn(&Section) -> &str) -> Targets {
    sections
        .iter()
        .filter_map(|(name, s)| {
            parse_level(pick(s)).map(|lvl| ((*name).clone(), LevelFilter::from_level(lvl)))
        })
        .fold(Targets::new().with_default(LevelFilter::OFF), |t, (n, l)| {
            t.with_target(n, l)
        })
}

type DefaultFilter = FilterFn<Box<dyn Fn(&tracing::Metadata<'_>) -> bool + Send + Sync>>;

/// Filter for the `default` section: targets not claimed by explicit sections.
fn unclaimed_targets(claimed: Vec<String>, max: Level) -> DefaultFilter {
    FilterFn::new(Box::new(move |meta: &tracing::Metadata<'_>| {
        !claimed.iter().any(|c| target_matches(meta.target(), c)) && *meta.level() <= max
    }))
}

// -------- layers --------

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn console_layer<F>(ansi: bool, filter: F) -> BoxedLayer
where
    F: Filter<Registry> + Send + Sync + 'static,
{
    fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(filter)
        .boxed()
}

fn json_file_layer<F>(router: FileRouter, filter: F) -> BoxedLayer
where
    F: Filter<Registry> + Send + Sync + 'static,
{
    fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(router)
        .with_filter(filter)
        .boxed()
}

// -------- public init --------

/// Initialize the global subscriber from configuration.
///
/// `base_dir` resolves relative log file paths (normally `server.home_dir`).
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` records (sqlx, sea-orm) before installing the subscriber.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let default_section = cfg.get(DEFAULT_KEY);
    let mut explicit: Vec<(&String, &Section)> =
        cfg.iter().filter(|(k, _)| k.as_str() != DEFAULT_KEY).collect();
    // Longest prefix first so nested subsystems win over their parents.
    explicit.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    let claimed: Vec<String> = explicit.iter().map(|(k, _)| (*k).clone()).collect();

    let router = FileRouter {
        default: default_section.and_then(|s| file_for(DEFAULT_KEY, s, base_dir)),
        by_prefix: explicit
            .iter()
            .filter_map(|(name, s)| file_for(name, s, base_dir).map(|w| ((*name).clone(), w)))
            .collect(),
    };

    let ansi = std::io::stdout().is_terminal();
    let mut layers: Vec<BoxedLayer> = vec![console_layer(
        ansi,
        explicit_targets(&explicit, |s| s.console_level.as_str()),
    )];

    if !router.is_empty() {
        let with_files: Vec<(&String, &Section)> = explicit
            .iter()
            .copied()
            .filter(|(_, s)| !s.file.trim().is_empty())
            .collect();
        layers.push(json_file_layer(
            router.clone(),
            explicit_targets(&with_files, |s| s.file_level.as_str()),
        ));
    }

    if let Some(section) = default_section {
        if let Some(level) = parse_level(&section.console_level) {
            layers.push(console_layer(ansi, unclaimed_targets(claimed.clone(), level)));
        }
        if router.default.is_some() {
            if let Some(level) = parse_level(&section.file_level) {
                layers.push(json_file_layer(router, unclaimed_targets(claimed, level)));
            }
        }
    }

    let _ = Registry::default().with(layers).try_init();
}
