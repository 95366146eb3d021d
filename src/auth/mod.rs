//! SPF/DMARC posture of the sending domain.
//!
//! The entry point is [`check_domain_posture`]. Classification is a plain
//! substring match on the TXT values, not a structured SPF or DMARC parse;
//! records carrying several qualifiers are classified by the first match.

mod dmarc;
mod error;
mod resolver;
mod spf;
mod types;

pub use error::AuthError;
pub use types::{Classification, PostureReport, PostureTier, RecordCheck, RecordKind};

use resolver::{LookupTxt, fqdn, normalize_domain};
use tracing::{debug, warn};
use trust_dns_resolver::Resolver;

/// Resolves and classifies the SPF record of `domain` and the DMARC record of
/// `_dmarc.<domain>` using the system resolver.
///
/// Nothing here is fatal: an unusable domain, a resolver that cannot be set
/// up and failed lookups all yield [`RecordCheck::Absent`].
pub fn check_domain_posture(domain: &str) -> PostureReport {
    let ascii = match normalize_domain(domain) {
        Ok(ascii) => ascii,
        Err(err) => return unavailable(domain.trim(), &err),
    };
    match Resolver::from_system_conf() {
        Ok(resolver) => check_with_resolver(&resolver, &ascii),
        Err(source) => unavailable(&ascii, &AuthError::resolver_init(source)),
    }
}

/// Report with both records absent for the same reason.
fn unavailable(domain: &str, err: &AuthError) -> PostureReport {
    warn!(domain, error = %err, "SPF/DMARC check unavailable");
    let absent = RecordCheck::Absent {
        reason: err.to_string(),
    };
    PostureReport::new(domain.to_string(), absent.clone(), absent)
}

pub(crate) fn check_with_resolver<R>(resolver: &R, ascii_domain: &str) -> PostureReport
where
    R: LookupTxt,
{
    let spf = lookup_and_classify(resolver, ascii_domain, RecordKind::Spf, spf::evaluate);

    let dmarc_name = fqdn("_dmarc", ascii_domain);
    let dmarc = lookup_and_classify(resolver, &dmarc_name, RecordKind::Dmarc, dmarc::evaluate);

    PostureReport::new(ascii_domain.to_string(), spf, dmarc)
}

fn lookup_and_classify<R, F>(resolver: &R, name: &str, kind: RecordKind, evaluate: F) -> RecordCheck
where
    R: LookupTxt,
    F: Fn(&[String]) -> Vec<Classification>,
{
    match resolver.lookup_txt(name) {
        Ok(records) if records.is_empty() => {
            warn!(%kind, name, "no TXT records");
            RecordCheck::Absent {
                reason: format!("no TXT records for {name}"),
            }
        }
        Ok(records) => {
            let classified = evaluate(&records);
            if classified.is_empty() {
                debug!(%kind, name, count = records.len(), "no record matched a qualifier");
            }
            RecordCheck::Classified(classified)
        }
        Err(err) => {
            warn!(%kind, name, error = %err, "TXT lookup failed");
            RecordCheck::Absent {
                reason: err.to_string(),
            }
        }
    }
}
