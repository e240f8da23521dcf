//! Caller identity from a door32.sys drop file
//!
//! door32.sys is line-positional:
//!
//! ```text
//!  1  comm type (0 local, 1 serial, 2 telnet)
//!  2  comm or socket handle
//!  3  baud rate
//!  4  BBS software name
//!  5  user record number
//!  6  real name
//!  7  alias
//!  8  security level
//!  9  minutes left
//! 10  emulation (0 ascii, 1 ansi, 2 avatar, 3 rip, 4 max graphics)
//! 11  node number
//! ```
//!
//! Some hosts append screen rows and columns on lines 12 and 13.

use log::{debug, info};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::DoorError;

const DEFAULT_ROWS: u16 = 25;
const DEFAULT_COLS: u16 = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub alias: String,
    pub time_left: Duration,
    pub emulation: u8,
    pub node: u32,
    pub rows: u16,
    pub cols: u16,
}

impl User {
    /// Identity for local play without a BBS
    pub fn local() -> Self {
        User {
            alias: "SysOp".to_string(),
            time_left: Duration::from_secs(120 * 60),
            emulation: 1,
            node: 1,
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

fn field<'a>(lines: &[&'a str], number: usize, name: &str) -> Result<&'a str, String> {
    lines
        .get(number - 1)
        .map(|l| l.trim())
        .ok_or_else(|| format!("line {} ({}) is missing", number, name))
}

fn numeric<T: std::str::FromStr>(lines: &[&str], number: usize, name: &str) -> Result<T, String> {
    let raw = field(lines, number, name)?;
    raw.parse::<T>()
        .map_err(|_| format!("line {} ({}) is not a number: '{}'", number, name, raw))
}

/// Parse door32.sys text
pub fn parse_door32(text: &str) -> Result<User, String> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 11 {
        return Err(format!("expected at least 11 lines, found {}", lines.len()));
    }

    let alias = field(&lines, 7, "alias")?;
    if alias.is_empty() {
        return Err("line 7 (alias) is empty".to_string());
    }
    let minutes: u64 = numeric(&lines, 9, "minutes left")?;
    let emulation: u8 = numeric(&lines, 10, "emulation")?;
    let node: u32 = numeric(&lines, 11, "node number")?;
    let seconds = minutes
        .checked_mul(60)
        .ok_or_else(|| format!("line 9 (minutes left) is out of range: {}", minutes))?;

    let rows = match lines.get(11).map(|l| l.trim()).filter(|l| !l.is_empty()) {
        Some(_) => numeric(&lines, 12, "rows")?,
        None => DEFAULT_ROWS,
    };
    let cols = match lines.get(12).map(|l| l.trim()).filter(|l| !l.is_empty()) {
        Some(_) => numeric(&lines, 13, "columns")?,
        None => DEFAULT_COLS,
    };

    Ok(User {
        alias: alias.to_string(),
        time_left: Duration::from_secs(seconds),
        emulation,
        node,
        rows,
        cols,
    })
}

/// Read and parse a drop file
pub fn load(path: &Path) -> Result<User, DoorError> {
    debug!("Reading drop file {}", path.display());
    let text = fs::read_to_string(path).map_err(|e| DoorError::DropFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let user = parse_door32(&text).map_err(|reason| DoorError::DropFile {
        path: path.to_path_buf(),
        reason,
    })?;
    info!(
        "Caller {} on node {} ({} min left, {}x{})",
        user.alias,
        user.node,
        user.time_left.as_secs() / 60,
        user.cols,
        user.rows
    );
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "2\n5\n38400\nMystic BBS 1.12\n1\nJane Doe\nJaneD\n20\n45\n1\n3\n";

    #[test]
    fn parses_standard_fields() {
        let user = parse_door32(SAMPLE).unwrap();
        assert_eq!(user.alias, "JaneD");
        assert_eq!(user.time_left, Duration::from_secs(45 * 60));
        assert_eq!(user.emulation, 1);
        assert_eq!(user.node, 3);
        assert_eq!((user.rows, user.cols), (25, 80));
    }

    #[test]
    fn parses_optional_geometry_and_crlf() {
        let text = SAMPLE.replace('\n', "\r\n") + "50\r\n132\r\n";
        let user = parse_door32(&text).unwrap();
        assert_eq!((user.rows, user.cols), (50, 132));
    }

    #[test]
    fn short_file_is_rejected() {
        let err = parse_door32("2\n5\n38400\n").unwrap_err();
        assert!(err.contains("at least 11 lines"));
    }

    #[test]
    fn bad_number_is_rejected() {
        let text = SAMPLE.replace("\n45\n", "\nlots\n");
        let err = parse_door32(&text).unwrap_err();
        assert!(err.contains("minutes left"), "{}", err);
    }

    #[test]
    fn huge_minutes_are_rejected() {
        let text = SAMPLE.replace("\n45\n", "\n18446744073709551615\n");
        let err = parse_door32(&text).unwrap_err();
        assert!(err.contains("out of range"), "{}", err);
    }

    #[test]
    fn load_reports_path_on_error() {
        let err = load(Path::new("/definitely/not/here/door32.sys")).unwrap_err();
        assert!(matches!(err, DoorError::DropFile { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let user = load(file.path()).unwrap();
        assert_eq!(user.alias, "JaneD");
    }

    #[test]
    fn local_identity_defaults() {
        let user = User::local();
        assert_eq!(user.alias, "SysOp");
        assert_eq!(user.time_left, Duration::from_secs(7200));
        assert_eq!((user.rows, user.cols), (25, 80));
    }
}
