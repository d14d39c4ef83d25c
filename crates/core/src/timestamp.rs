use chrono::{Local, LocalResult, NaiveDateTime, TimeZone};
use filetime::FileTime;
use std::io;
use std::path::Path;

/// Seconds since the epoch for a wall-clock time in the local zone.
/// Ambiguous times take the earlier instant; times skipped by a DST jump are
/// read as UTC.
pub fn local_timestamp(naive: &NaiveDateTime) -> i64 {
    match Local.from_local_datetime(naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.timestamp(),
        LocalResult::None => naive.and_utc().timestamp(),
    }
}

/// Sets both access and modification time, like `touch -d`.
pub fn set_file_times(path: &Path, naive: &NaiveDateTime) -> io::Result<()> {
    let time = FileTime::from_unix_time(local_timestamp(naive), 0);
    filetime::set_file_times(path, time, time)
}

#[cfg(test)]
mod tests {
    use super::{local_timestamp, set_file_times};
    use chrono::NaiveDate;
    use filetime::FileTime;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn sets_mtime_to_local_wall_clock() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("VID_20200101_120000.mp4");
        fs::write(&path, b"x").expect("fixture");

        let naive = NaiveDate::from_ymd_opt(2020, 1, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid");
        set_file_times(&path, &naive).expect("set times");

        let meta = fs::metadata(&path).expect("metadata");
        let mtime = FileTime::from_last_modification_time(&meta);
        assert_eq!(mtime.unix_seconds(), local_timestamp(&naive));
    }
}
