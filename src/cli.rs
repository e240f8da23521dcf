//! Command line flags

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::error::DoorError;

#[derive(Debug, Parser)]
#[command(name = "doorpanic", version, about = "A race-against-the-clock BBS door game")]
pub struct Args {
    /// Play locally with a default identity instead of reading a drop file
    #[arg(long)]
    pub local: bool,

    /// Path to the door32.sys drop file (required unless --local)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Optional TOML settings file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Drop file to read, `None` for local play
    pub fn drop_path(&self) -> Result<Option<&Path>, DoorError> {
        if self.local {
            return Ok(None);
        }
        match &self.path {
            Some(path) => Ok(Some(path.as_path())),
            None => Err(DoorError::MissingDropPath),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_needs_no_path() {
        let args = Args::try_parse_from(["doorpanic", "--local"]).unwrap();
        assert!(args.drop_path().unwrap().is_none());
    }

    #[test]
    fn path_is_used_when_not_local() {
        let args = Args::try_parse_from(["doorpanic", "--path", "/bbs/node3/door32.sys"]).unwrap();
        assert_eq!(
            args.drop_path().unwrap(),
            Some(Path::new("/bbs/node3/door32.sys"))
        );
    }

    #[test]
    fn missing_path_is_exit_two() {
        let args = Args::try_parse_from(["doorpanic"]).unwrap();
        let err = args.drop_path().unwrap_err();
        assert!(matches!(err, DoorError::MissingDropPath));
        assert_eq!(err.exit_code(), 2);
    }
}
