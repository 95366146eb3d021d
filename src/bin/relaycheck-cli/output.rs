use colored::*;

use relaycheck_lib::{
    PostureReport, PostureTier, ProbeOutcome, ProbeResult, RecordCheck, RecordKind,
};

pub fn print_posture(report: &PostureReport) {
    println!("Checking SPF/DMARC records of {}", report.domain.bold());
    for kind in [RecordKind::Spf, RecordKind::Dmarc] {
        for line in posture_lines(kind, report.check(kind)) {
            println!("{line}");
        }
    }
}

fn posture_lines(kind: RecordKind, check: &RecordCheck) -> Vec<String> {
    match check {
        RecordCheck::Absent { reason } => vec![format!(
            "{} {kind} record not found ({reason})",
            tier_marker(PostureTier::Absent)
        )],
        RecordCheck::Classified(items) => items
            .iter()
            .map(|item| {
                format!(
                    "{} {kind} {}: {}",
                    tier_marker(item.tier),
                    tier_label(kind, item.tier),
                    item.record
                )
            })
            .collect(),
    }
}

fn tier_marker(tier: PostureTier) -> ColoredString {
    match tier {
        PostureTier::StrictPass => "[+]".green().bold(),
        PostureTier::ModeratePass => "[~]".yellow().bold(),
        PostureTier::LaxFail | PostureTier::Absent => "[-]".red().bold(),
    }
}

fn tier_label(kind: RecordKind, tier: PostureTier) -> &'static str {
    match (kind, tier) {
        (RecordKind::Spf, PostureTier::StrictPass) => "hard fail (-all), spoofing blocked",
        (RecordKind::Spf, PostureTier::ModeratePass) => "soft fail (~all), spoofing flagged",
        (RecordKind::Spf, PostureTier::LaxFail) => "pass all (+all), anyone may send",
        (RecordKind::Dmarc, PostureTier::StrictPass) => "policy reject",
        (RecordKind::Dmarc, PostureTier::ModeratePass) => "policy quarantine",
        (RecordKind::Dmarc, PostureTier::LaxFail) => "policy none, monitoring only",
        (_, PostureTier::Absent) => "absent",
    }
}

pub fn print_probe_header(host: &str) {
    println!("Testing Open Mail Relay on: {}", host.bold());
}

pub fn print_result(result: &ProbeResult) {
    for line in result_lines(result) {
        println!("{line}");
    }
}

fn result_lines(result: &ProbeResult) -> Vec<String> {
    match &result.outcome {
        ProbeOutcome::Relayed => vec![format!(
            "{} {}: email relayed, open mail relay",
            "[+]".green().bold(),
            result.host
        )],
        ProbeOutcome::Failed { stage, reason } => vec![
            format!(
                "{} {}: relay failed at {stage}",
                "[-]".red().bold(),
                result.host
            ),
            format!("    {reason}"),
        ],
    }
}

pub fn print_summary(results: &[ProbeResult]) {
    let relayed = results.iter().filter(|r| r.is_open_relay()).count();
    let summary = format!("{relayed}/{} hosts relayed the message", results.len());
    if relayed > 0 {
        println!("{}", summary.red().bold());
    } else {
        println!("{}", summary.green());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaycheck_lib::{Classification, SmtpStage};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn success_is_one_line_failure_is_two() {
        plain();
        let ok = ProbeResult {
            host: "mail.example.com".into(),
            outcome: ProbeOutcome::Relayed,
            transcript: Vec::new(),
        };
        let failed = ProbeResult {
            host: "smtp.test.org".into(),
            outcome: ProbeOutcome::Failed {
                stage: SmtpStage::RcptTo,
                reason: "RCPT TO rejected: 550 5.7.1 Relaying denied".into(),
            },
            transcript: Vec::new(),
        };

        assert_eq!(
            result_lines(&ok),
            ["[+] mail.example.com: email relayed, open mail relay"]
        );
        assert_eq!(
            result_lines(&failed),
            [
                "[-] smtp.test.org: relay failed at RCPT TO",
                "    RCPT TO rejected: 550 5.7.1 Relaying denied",
            ]
        );
    }

    #[test]
    fn posture_lines_cover_every_classification() {
        plain();
        let check = RecordCheck::Classified(vec![Classification {
            record: "v=spf1 mx ~all".into(),
            tier: PostureTier::ModeratePass,
        }]);
        assert_eq!(
            posture_lines(RecordKind::Spf, &check),
            ["[~] SPF soft fail (~all), spoofing flagged: v=spf1 mx ~all"]
        );

        let absent = RecordCheck::Absent {
            reason: "NXDOMAIN".into(),
        };
        assert_eq!(
            posture_lines(RecordKind::Dmarc, &absent),
            ["[-] DMARC record not found (NXDOMAIN)"]
        );
    }
}
