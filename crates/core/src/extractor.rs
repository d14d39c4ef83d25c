use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;

const NOON: (&str, &str, &str) = ("12", "00", "00");

/// Inclusive range of years accepted as a plausible capture date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub const WIDE: YearRange = YearRange {
        min: 1980,
        max: 2050,
    };
    pub const STRICT: YearRange = YearRange {
        min: 2001,
        max: 2025,
    };

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::WIDE
    }
}

/// A date recovered from a file name, already range-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCandidate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// `HH:MM:SS`
    pub time: String,
    pub pattern_name: &'static str,
}

impl DateCandidate {
    pub fn year_dir(&self) -> String {
        format!("{:04}", self.year)
    }

    pub fn month_dir(&self) -> String {
        format!("{:02}", self.month)
    }

    /// `YYYY:MM:DD HH:MM:SS`, the layout exiftool expects.
    pub fn exif_datetime(&self) -> String {
        format!(
            "{:04}:{:02}:{:02} {}",
            self.year, self.month, self.day, self.time
        )
    }

    pub fn pretty(&self) -> String {
        format!(
            "{:04}-{:02}-{:02} {}",
            self.year, self.month, self.day, self.time
        )
    }

    /// Calendar-checked date and time. `None` for days such as Feb 30 or
    /// times such as 27:00:00 that pass the loose validation.
    pub fn naive_datetime(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day)?;
        let time = NaiveTime::parse_from_str(&self.time, "%H:%M:%S").ok()?;
        Some(date.and_time(time))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RawDate {
    year: i32,
    month: u32,
    day: u32,
    time: String,
}

#[derive(Debug)]
pub struct PatternRule {
    pub name: &'static str,
    regex: &'static LazyLock<Regex>,
    extract: fn(&Captures<'_>) -> Option<RawDate>,
}

static DUPLICATE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\([0-9]+\)|-EFFECTS.*)$").expect("static regex"));

static RE_GENERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:IMG|VID|PANO|AR_EFFECT|IMG_)?[_-]?([0-9]{4})[-_]?([0-9]{2})[-_]?([0-9]{2})(?:[-_]?([0-9]{2})([0-9]{2})([0-9]{2}))?",
    )
    .expect("static regex")
});
static RE_SCREENSHOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:Screenshot|Screenrecorder)[-_]?([0-9]{4})[-_]?([0-9]{2})[-_]?([0-9]{2})(?:[-_]?([0-9]{2})[-_]?([0-9]{2})[-_]?([0-9]{2}))?",
    )
    .expect("static regex")
});
static RE_WHATSAPP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:IMG|VID|null)-([0-9]{4})([0-9]{2})([0-9]{2})-WA").expect("static regex")
});
static RE_PV_FULL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[PV]([0-9]{8})[-_]?([0-9]{6})(?:[-_].*)?$").expect("static regex")
});
static RE_PV_DECADE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[PV]([0-9])([0-9]{2})([0-9]{2})[-_]?([0-9]{2})([0-9]{2})([0-9]{2})(?:[-_].*)?$",
    )
    .expect("static regex")
});
static RE_FLEXIBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(20[01][0-9]|202[0-5])[-_. ]?([0-1][0-9])[-_. ]?([0-3][0-9])(?:[_ .-]?([0-2][0-9])[-_.:]?([0-5][0-9])[-_.:]?([0-5][0-9]))?",
    )
    .expect("static regex")
});

/// Evaluated top-down; the first rule whose match also validates wins.
pub static PATTERN_RULES: &[PatternRule] = &[
    PatternRule {
        name: "GENERIC_YYYYMMDD[_HHMMSS]",
        regex: &RE_GENERIC,
        extract: date_with_optional_time,
    },
    PatternRule {
        name: "Screenshot/Screenrecorder_YYYYMMDD[_HHMMSS]",
        regex: &RE_SCREENSHOT,
        extract: date_with_optional_time,
    },
    PatternRule {
        name: "IMG/VID/null-YYYYMMDD-WA",
        regex: &RE_WHATSAPP,
        extract: whatsapp_date,
    },
    PatternRule {
        name: "P/VYYYYMMDD-HHMMSS",
        regex: &RE_PV_FULL,
        extract: packed_date_time,
    },
    PatternRule {
        name: "P/V8MMDD-HHMMSS",
        regex: &RE_PV_DECADE,
        extract: decade_offset_date_time,
    },
    PatternRule {
        name: "YYYY[sep]MM[sep]DD[HHMMSS]",
        regex: &RE_FLEXIBLE,
        extract: date_with_optional_time,
    },
];

fn number<T: std::str::FromStr>(caps: &Captures<'_>, index: usize) -> Option<T> {
    caps.get(index)?.as_str().parse().ok()
}

fn optional_time(caps: &Captures<'_>, first: usize) -> String {
    let part = |index: usize, default: &'static str| {
        caps.get(index).map(|m| m.as_str()).unwrap_or(default)
    };
    format!(
        "{}:{}:{}",
        part(first, NOON.0),
        part(first + 1, NOON.1),
        part(first + 2, NOON.2)
    )
}

fn date_with_optional_time(caps: &Captures<'_>) -> Option<RawDate> {
    Some(RawDate {
        year: number(caps, 1)?,
        month: number(caps, 2)?,
        day: number(caps, 3)?,
        time: optional_time(caps, 4),
    })
}

fn whatsapp_date(caps: &Captures<'_>) -> Option<RawDate> {
    Some(RawDate {
        year: number(caps, 1)?,
        month: number(caps, 2)?,
        day: number(caps, 3)?,
        time: "12:00:00".to_string(),
    })
}

fn packed_date_time(caps: &Captures<'_>) -> Option<RawDate> {
    let date = caps.get(1)?.as_str();
    let time = caps.get(2)?.as_str();
    Some(RawDate {
        year: date.get(..4)?.parse().ok()?,
        month: date.get(4..6)?.parse().ok()?,
        day: date.get(6..8)?.parse().ok()?,
        time: format!("{}:{}:{}", time.get(..2)?, time.get(2..4)?, time.get(4..6)?),
    })
}

fn decade_offset_date_time(caps: &Captures<'_>) -> Option<RawDate> {
    let offset: i32 = number(caps, 1)?;
    Some(RawDate {
        year: 2010 + offset,
        month: number(caps, 2)?,
        day: number(caps, 3)?,
        time: format!(
            "{}:{}:{}",
            caps.get(4)?.as_str(),
            caps.get(5)?.as_str(),
            caps.get(6)?.as_str()
        ),
    })
}

/// Strips a trailing `(n)` duplicate counter or `-EFFECTS...` suffix.
pub fn normalize_basename(base: &str) -> String {
    DUPLICATE_SUFFIX.replace(base, "").into_owned()
}

#[derive(Debug, Clone)]
pub struct FilenameDateExtractor {
    years: YearRange,
    rules: &'static [PatternRule],
}

impl Default for FilenameDateExtractor {
    fn default() -> Self {
        Self::new(YearRange::default())
    }
}

impl FilenameDateExtractor {
    pub fn new(years: YearRange) -> Self {
        Self {
            years,
            rules: PATTERN_RULES,
        }
    }

    /// Extracts a date from a base name (no extension). The duplicate and
    /// effects suffixes are stripped here, so callers may pass the raw stem.
    pub fn extract(&self, basename: &str) -> Option<DateCandidate> {
        let clean = normalize_basename(basename);

        for rule in self.rules {
            let Some(caps) = rule.regex.captures(&clean) else {
                continue;
            };
            let Some(raw) = (rule.extract)(&caps) else {
                continue;
            };
            if !self.is_valid(&raw) {
                continue;
            }
            return Some(DateCandidate {
                year: raw.year,
                month: raw.month,
                day: raw.day,
                time: raw.time,
                pattern_name: rule.name,
            });
        }

        None
    }

    pub fn extract_from_path(&self, path: &Path) -> Option<DateCandidate> {
        let stem = path.file_stem()?.to_string_lossy();
        self.extract(&stem)
    }

    fn is_valid(&self, raw: &RawDate) -> bool {
        self.years.contains(raw.year)
            && (1..=12).contains(&raw.month)
            && (1..=31).contains(&raw.day)
    }
}
