use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use super::ConfigError;

/// Ordered list of SMTP hosts to probe, one per line of the input file.
///
/// Lines keep their file order and are not deduplicated. Trailing whitespace
/// is stripped and lines left empty are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetList {
    hosts: Vec<String>,
}

impl TargetList {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| ConfigError::targets_unreadable(path, err))?;
        Self::from_reader(file).map_err(|err| ConfigError::targets_unreadable(path, err))
    }

    pub fn from_reader<R: Read>(reader: R) -> std::io::Result<Self> {
        let mut hosts = Vec::new();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            let host = line.trim_end();
            if host.is_empty() {
                continue;
            }
            hosts.push(host.to_string());
        }
        Ok(Self { hosts })
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
