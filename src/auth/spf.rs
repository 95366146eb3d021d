use super::types::{Classification, PostureTier};

const MARKER: &str = "spf1";

const QUALIFIERS: [(&str, PostureTier); 3] = [
    ("-all", PostureTier::StrictPass),
    ("~all", PostureTier::ModeratePass),
    ("+all", PostureTier::LaxFail),
];

/// Classifies every record containing `spf1` by the first `all` qualifier
/// found, in strict → moderate → lax order. Records without the marker, or
/// without a recognised qualifier, are skipped.
pub(crate) fn evaluate(records: &[String]) -> Vec<Classification> {
    records
        .iter()
        .filter(|record| record.contains(MARKER))
        .filter_map(|record| classify(record))
        .collect()
}

fn classify(record: &str) -> Option<Classification> {
    QUALIFIERS
        .iter()
        .find(|(needle, _)| record.contains(needle))
        .map(|(_, tier)| Classification {
            record: record.to_string(),
            tier: *tier,
        })
}
