use crate::convert::convert_to_jpeg;
use crate::exiftool::MetadataWriter;
use crate::extractor::{DateCandidate, FilenameDateExtractor};
use crate::media::{is_png, MediaKind};
use crate::placement::{destination_dir, move_file, should_move_file};
use crate::report::{RunStats, UnrecognizedLog};
use crate::scan::{collect_files, Exclusion};
use crate::timestamp::set_file_times;
use anyhow::{bail, Result};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub root: PathBuf,
    pub exclude: Option<PathBuf>,
    pub organize: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Excluded,
    Unsupported,
    Unrecognized,
    /// `path` is where the file ended up: the JPEG copy after a PNG fallback,
    /// the new location after a move, or the original path.
    Dated { date: DateCandidate, path: PathBuf },
}

/// Everything a single file needs while it is processed. Counters and the
/// unrecognized list are owned here rather than shared globally.
pub struct RunContext<'a> {
    options: RunOptions,
    exclusion: Option<Exclusion>,
    extractor: &'a FilenameDateExtractor,
    writer: &'a dyn MetadataWriter,
    unrecognized: &'a UnrecognizedLog,
    stats: RunStats,
}

impl<'a> RunContext<'a> {
    pub fn new(
        options: RunOptions,
        extractor: &'a FilenameDateExtractor,
        writer: &'a dyn MetadataWriter,
        unrecognized: &'a UnrecognizedLog,
    ) -> Self {
        let exclusion = options.exclude.clone().map(Exclusion::new);
        Self {
            options,
            exclusion,
            extractor,
            writer,
            unrecognized,
            stats: RunStats::default(),
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn into_stats(self) -> RunStats {
        self.stats
    }

    pub fn process_file(&mut self, path: &Path) -> FileOutcome {
        let name = display_name(path);

        if self
            .exclusion
            .as_ref()
            .map(|exclusion| exclusion.matches(path))
            .unwrap_or(false)
        {
            self.stats.excluded += 1;
            debug!("   → Excluded: {}", path.display());
            return FileOutcome::Excluded;
        }

        let Some(kind) = MediaKind::from_path(path) else {
            self.stats.skipped_unsupported += 1;
            info!("   → Ignored (unsupported extension): {name}");
            return FileOutcome::Unsupported;
        };

        let Some(date) = self.extractor.extract_from_path(path) else {
            self.stats.unrecognized += 1;
            info!("No recognizable date: {name}");
            if let Err(err) = self.unrecognized.record(path) {
                warn!(
                    "   Could not append to {}: {err}",
                    self.unrecognized.path().display()
                );
            }
            return FileOutcome::Unrecognized;
        };

        self.stats.recognized += 1;
        self.stats.record_hit(date.pattern_name);
        info!("File: {name}");
        info!("   → Date detected: {} ({})", date.pretty(), date.pattern_name);

        let mut current = path.to_path_buf();
        if kind == MediaKind::Photo {
            current = self.write_photo_metadata(path, &date);
        }

        match date.naive_datetime() {
            Some(naive) => self.write_mtime(&current, &naive),
            None => {
                self.stats.invalid_datetime += 1;
                warn!(
                    "   {} is not a calendar date, mtime left unchanged",
                    date.pretty()
                );
            }
        }

        if self.options.organize {
            // A PNG replaced by its JPEG copy travels with the copy.
            if current != path {
                self.place(path.to_path_buf(), &date);
            }
            current = self.place(current, &date);
        }

        FileOutcome::Dated {
            date,
            path: current,
        }
    }

    /// Returns the file later steps should act on.
    fn write_photo_metadata(&mut self, path: &Path, date: &DateCandidate) -> PathBuf {
        let stamp = date.exif_datetime();
        if self.options.dry_run {
            info!("   [Dry-run] {}", self.writer.describe(path, &stamp));
            return path.to_path_buf();
        }

        let err = match self.writer.write_dates(path, &stamp) {
            Ok(()) => {
                self.stats.metadata_written += 1;
                info!("   EXIF updated: {}", path.display());
                return path.to_path_buf();
            }
            Err(err) => err,
        };
        warn!("   exiftool failed on {}: {err}", path.display());

        if !is_png(path) {
            self.stats.metadata_failed += 1;
            return path.to_path_buf();
        }

        let jpg = match convert_to_jpeg(path) {
            Ok(jpg) => jpg,
            Err(err) => {
                self.stats.metadata_failed += 1;
                warn!("   {err}");
                return path.to_path_buf();
            }
        };
        self.stats.converted += 1;
        info!("   → Converted to JPEG: {}", display_name(&jpg));

        match self.writer.write_dates(&jpg, &stamp) {
            Ok(()) => {
                self.stats.metadata_written += 1;
                info!("   EXIF updated: {}", jpg.display());
                jpg
            }
            Err(err) => {
                self.stats.metadata_failed += 1;
                warn!("   exiftool also failed on {}: {err}", jpg.display());
                path.to_path_buf()
            }
        }
    }

    fn write_mtime(&mut self, path: &Path, naive: &NaiveDateTime) {
        if self.options.dry_run {
            info!("   [Dry-run] set mtime of '{}' to {naive}", path.display());
            return;
        }

        match set_file_times(path, naive) {
            Ok(()) => {
                self.stats.mtime_updated += 1;
                info!("   mtime updated: {}", path.display());
            }
            Err(err) => warn!("   Could not set mtime on {}: {err}", path.display()),
        }
    }

    fn place(&mut self, path: PathBuf, date: &DateCandidate) -> PathBuf {
        let year = date.year_dir();
        let month = date.month_dir();
        if !should_move_file(&path, &year, &month) {
            self.stats.already_in_place += 1;
            info!("   [Skipped] Already in {year}/{month}, not moving");
            return path;
        }

        let dest = destination_dir(&self.options.root, date);
        if self.options.dry_run {
            info!("   [Dry-run] mv '{}' '{}/'", path.display(), dest.display());
            return path;
        }

        match move_file(&path, &dest) {
            Ok(moved) => {
                self.stats.moved += 1;
                info!("   → Moved to {}", dest.display());
                moved
            }
            Err(err) => {
                self.stats.move_failed += 1;
                warn!("   Failed to move {}: {err}", path.display());
                path
            }
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Processes every file under `options.root`, one at a time.
pub fn run(
    options: RunOptions,
    extractor: &FilenameDateExtractor,
    writer: &dyn MetadataWriter,
    unrecognized: &UnrecognizedLog,
) -> Result<RunStats> {
    if !options.root.is_dir() {
        bail!("{} is not a valid directory", options.root.display());
    }

    info!("{}", "-".repeat(60));
    info!("Organizing files by date extracted from filename");
    info!("Source folder: {}", options.root.display());
    if let Some(exclude) = &options.exclude {
        info!("Excluding folder: {}", exclude.display());
    }
    if options.dry_run {
        info!("DRY-RUN MODE: no files will be moved or modified");
    }
    info!("{}", "-".repeat(60));

    let files = collect_files(&options.root);
    let total = files.len();
    let mut ctx = RunContext::new(options, extractor, writer, unrecognized);
    ctx.stats.total_files = total;

    for (index, path) in files.iter().enumerate() {
        info!("[{}/{}] Processing: {}", index + 1, total, display_name(path));
        ctx.process_file(path);
    }

    let stats = ctx.into_stats();
    log_summary(&stats, unrecognized);
    Ok(stats)
}

fn log_summary(stats: &RunStats, unrecognized: &UnrecognizedLog) {
    info!("{}", "-".repeat(60));
    info!("Pattern summary:");
    for (pattern, count) in &stats.pattern_hits {
        info!("   {pattern}: {count} file(s)");
    }
    info!("Recognized: {}", stats.recognized);
    info!("Unrecognized: {}", stats.unrecognized);
    info!("Unrecognized files listed at: {}", unrecognized.path().display());
    info!("{}", "-".repeat(60));
}
