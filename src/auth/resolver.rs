use trust_dns_resolver::{Resolver, lookup::TxtLookup};

use super::AuthError;

pub(crate) fn normalize_domain(domain: &str) -> Result<String, AuthError> {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(AuthError::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(AuthError::idna)
}

pub(crate) fn fqdn(label: &str, domain: &str) -> String {
    format!("{}.{}", label.to_ascii_lowercase(), domain)
}

pub(crate) trait LookupTxt {
    fn lookup_txt(&self, name: &str) -> Result<Vec<String>, AuthError>;
}

impl LookupTxt for Resolver {
    fn lookup_txt(&self, name: &str) -> Result<Vec<String>, AuthError> {
        let lookup =
            Resolver::txt_lookup(self, name).map_err(|err| AuthError::txt_lookup(name, err))?;
        Ok(collect_txt_records(&lookup))
    }
}

// A TXT record may be split into several character-strings; they form one value.
fn collect_txt_records(lookup: &TxtLookup) -> Vec<String> {
    lookup
        .iter()
        .map(|txt| {
            txt.txt_data()
                .iter()
                .map(|piece| String::from_utf8_lossy(piece))
                .collect::<String>()
        })
        .collect()
}
