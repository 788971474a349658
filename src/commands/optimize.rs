use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::args::Cli;
use crate::coordinator::{JobOutcome, ResultSink};
use crate::core::{AppState, BulkEvent, BulkFile, BulkReport, ResultUpdate, Settings, SvgFile};
use crate::utils::{extract_filename, read_text, unique_output_names, validate_svg_text, write_text};
use crate::worker::SvgEngine;

/// Sink that logs results to the terminal and keeps the latest one.
#[derive(Default)]
pub struct TerminalSink {
    latest: Mutex<Option<SvgFile>>,
}

impl TerminalSink {
    pub fn latest(&self) -> Option<SvgFile> {
        self.latest.lock().clone()
    }
}

impl ResultSink for TerminalSink {
    fn show_result(&self, file: &SvgFile, update: &ResultUpdate) {
        match update.comparison_size {
            Some(before) => info!(
                "{} -> {} bytes ({:.1}%)",
                before,
                update.size,
                percent_of(update.size, before)
            ),
            None => info!("{} bytes (original)", update.size),
        }
        *self.latest.lock() = Some(file.clone());
    }

    fn show_error(&self, message: &str) {
        error!("{}", message);
    }
}

fn percent_of(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 100.0;
    }
    part as f64 * 100.0 / whole as f64
}

/// Runs the command line.
///
/// One input without `--out-dir` prints the result to stdout; anything else
/// writes into the output directory.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = cli.resolve_settings().await?;
    debug!("Settings fingerprint: {}", settings.fingerprint);

    let sink = Arc::new(TerminalSink::default());
    let state = AppState::new(sink.clone())?;

    match (cli.files.as_slice(), cli.out_dir.as_deref()) {
        ([path], out_dir) => {
            let text = optimize_file(&state, &sink, path, &settings).await?;
            match out_dir {
                Some(dir) => {
                    let target = dir.join(extract_filename(&path.to_string_lossy()));
                    write_text(&target, &text).await?;
                    info!("Wrote {}", target.display());
                }
                None => println!("{text}"),
            }
        }
        (_, None) => bail!("--out-dir is required when optimizing more than one file"),
        (paths, Some(dir)) => {
            let abort = state.bulk().abort_handle();
            let ctrl_c = tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, stopping after the current file");
                    abort.abort();
                }
            });

            let report = optimize_files(&state, paths, &settings).await;
            ctrl_c.abort();

            let written = write_report(&report, dir).await?;
            for line in report.summary() {
                info!("{}", line);
            }
            debug!("{} files written to {}", written, dir.display());

            if report.results.is_empty() && !report.errors.is_empty() {
                bail!("No file could be optimized");
            }
        }
    }

    Ok(())
}

/// Optimizes a single document through the coordinator.
///
/// # Arguments
/// * `state` - Session whose coordinator handles the request
/// * `sink` - The sink `state` was built with
/// * `path` - SVG file to read
/// * `settings` - Optimization settings
///
/// # Returns
/// The optimized text (or the original one when `settings.original` is set)
pub async fn optimize_file<E: SvgEngine>(
    state: &AppState<E>,
    sink: &TerminalSink,
    path: &Path,
    settings: &Settings,
) -> anyhow::Result<String> {
    let text = read_text(path).await?;
    validate_svg_text(&text).with_context(|| path.display().to_string())?;

    let filename = extract_filename(&path.to_string_lossy()).to_string();
    match state.coordinator().open(text, &filename, settings).await? {
        JobOutcome::Applied(_) => {}
        outcome => bail!("No result for {}: {:?}", filename, outcome),
    }

    let latest = sink.latest().context("Result was not delivered")?;
    Ok(latest.text)
}

/// Optimizes `paths` in order through the bulk processor.
///
/// Progress is logged at debug level; the report holds every outcome.
pub async fn optimize_files<E: SvgEngine>(
    state: &AppState<E>,
    paths: &[PathBuf],
    settings: &Settings,
) -> BulkReport {
    let files = paths.iter().map(BulkFile::from_path).collect();

    state
        .bulk()
        .process_files(files, settings, |event| match event {
            BulkEvent::Progress(progress) => {
                debug!("Progress: {}/{} ({:.0}%)", progress.current, progress.total, progress.percent * 100.0)
            }
            BulkEvent::Complete(report) => {
                debug!("Run complete: {} ok, {} failed", report.results.len(), report.errors.len())
            }
        })
        .await
}

/// Writes each successful result into `dir` under a unique name.
async fn write_report(report: &BulkReport, dir: &Path) -> anyhow::Result<usize> {
    let names = unique_output_names(report.results.iter().map(|r| r.filename.as_str()));

    for (result, name) in report.results.iter().zip(&names) {
        let target = dir.join(name);
        write_text(&target, &result.data)
            .await
            .with_context(|| format!("Writing {}", target.display()))?;
    }

    for failure in &report.errors {
        warn!("{}: {}", failure.filename, failure.error);
    }

    Ok(names.len())
}
