//! Worker-id file naming scheme
//!
//! Every worker writes its timer to a file whose name ends in the worker id
//! followed by `.json`, e.g. `rank_3.json` or `w12.json`. The id is the run of
//! one to six decimal digits immediately before the extension.

use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, TimingError};

/// Extension of persisted timer files.
pub const RECORD_EXTENSION: &str = "json";

static WORKER_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,6})\.json$").expect("worker id pattern is valid"));

/// Identity of one worker in a parallel run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkerId(pub u32);

impl WorkerId {
    /// Largest id expressible with six digits.
    pub const MAX: WorkerId = WorkerId(999_999);
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for WorkerId {
    fn from(id: u32) -> Self {
        WorkerId(id)
    }
}

/// Extract the worker id from the final component of `path`.
pub fn parse_worker_id(path: impl AsRef<Path>) -> Result<WorkerId> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let id = WORKER_ID_PATTERN
        .captures(&file_name)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse::<u32>().ok());

    id.map(WorkerId)
        .ok_or(TimingError::FilenamePattern { file_name })
}

/// File name under which worker `id` should persist its timer.
pub fn worker_file_name(prefix: &str, id: WorkerId) -> Result<String> {
    let file_name = format!("{prefix}{id}.{RECORD_EXTENSION}");
    if id > WorkerId::MAX || prefix.ends_with(|c: char| c.is_ascii_digit()) {
        return Err(TimingError::FilenamePattern { file_name });
    }
    Ok(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_digits_before_extension() {
        assert_eq!(parse_worker_id("w0.json").unwrap(), WorkerId(0));
        assert_eq!(parse_worker_id("timer_cpu_17.json").unwrap(), WorkerId(17));
        assert_eq!(parse_worker_id("/runs/4cpus/rank000123.json").unwrap(), WorkerId(123));
    }

    #[test]
    fn only_the_last_six_digits_count() {
        assert_eq!(parse_worker_id("w1234567.json").unwrap(), WorkerId(234567));
    }

    #[test]
    fn only_ascii_digits_form_an_id() {
        // Arabic-Indic digits are Unicode decimals but never part of an id
        let name = "w\u{663}\u{663}\u{663}\u{663}\u{663}7.json";
        assert_eq!(parse_worker_id(name).unwrap(), WorkerId(7));
        assert!(parse_worker_id("w\u{663}.json").is_err());
    }

    #[test]
    fn directory_digits_are_ignored() {
        let err = parse_worker_id("/runs/8/summary.json").unwrap_err();
        assert!(matches!(
            err,
            TimingError::FilenamePattern { ref file_name } if file_name == "summary.json"
        ));
    }

    #[test]
    fn missing_id_or_wrong_extension_fails() {
        assert!(parse_worker_id("summary.json").is_err());
        assert!(parse_worker_id("w3.json.bak").is_err());
        assert!(parse_worker_id("w3.txt").is_err());
        assert!(parse_worker_id("").is_err());
    }

    #[test]
    fn file_names_round_trip() {
        let name = worker_file_name("rank_", WorkerId(42)).unwrap();
        assert_eq!(name, "rank_42.json");
        assert_eq!(parse_worker_id(&name).unwrap(), WorkerId(42));
    }

    #[test]
    fn ambiguous_file_names_are_refused() {
        assert!(worker_file_name("run2", WorkerId(3)).is_err());
        assert!(worker_file_name("w", WorkerId(1_000_000)).is_err());
    }
}
