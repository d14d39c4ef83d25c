mod config;
mod convert;
mod exiftool;
mod extractor;
mod media;
mod organize;
mod placement;
mod report;
mod scan;
mod session;
mod timestamp;

pub use config::{app_paths, load_config, load_config_from, AppConfig, AppPaths, YearPolicy};
pub use convert::{convert_to_jpeg, jpeg_copy_path, ConvertError};
pub use exiftool::{ExifTool, MetadataError, MetadataWriter};
pub use extractor::{
    normalize_basename, DateCandidate, FilenameDateExtractor, PatternRule, YearRange,
    PATTERN_RULES,
};
pub use media::{is_png, MediaKind};
pub use organize::{run, FileOutcome, RunContext, RunOptions};
pub use placement::{destination_dir, move_file, should_move_file, MoveError};
pub use report::{RunStats, UnrecognizedLog};
pub use scan::{collect_files, Exclusion};
pub use session::{
    apply_session, parse_base_datetime, plan_session, SessionError, SessionRename, SessionResult,
    BASE_DATETIME_FORMAT,
};
pub use timestamp::{local_timestamp, set_file_times};
