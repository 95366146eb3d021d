use std::path::PathBuf;

use thiserror::Error;

/// Errors detected while assembling a scan configuration. All of them are
/// raised before any network activity takes place.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sender address '{address}' has no domain part")]
    MissingDomain { address: String },
    #[error("{field} address is empty")]
    EmptyAddress { field: &'static str },
    #[error("cannot read target list {}: {source}", path.display())]
    TargetsUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn missing_domain(address: impl Into<String>) -> Self {
        Self::MissingDomain {
            address: address.into(),
        }
    }

    pub(crate) fn targets_unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::TargetsUnreadable {
            path: path.into(),
            source,
        }
    }
}
