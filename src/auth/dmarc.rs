use super::types::{Classification, PostureTier};

const MARKER: &str = "DMARC1";

const POLICIES: [(&str, PostureTier); 3] = [
    ("p=reject", PostureTier::StrictPass),
    ("p=quarantine", PostureTier::ModeratePass),
    ("p=none", PostureTier::LaxFail),
];

// Substring search on the raw record: `sp=none` also satisfies `p=none`.
pub(crate) fn evaluate(records: &[String]) -> Vec<Classification> {
    records
        .iter()
        .filter(|record| record.contains(MARKER))
        .filter_map(|record| {
            POLICIES
                .iter()
                .find(|(needle, _)| record.contains(needle))
                .map(|(_, tier)| Classification {
                    record: record.clone(),
                    tier: *tier,
                })
        })
        .collect()
}
