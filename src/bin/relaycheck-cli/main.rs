mod args;
mod logging;
mod output;

use anyhow::{Context, Result};
use relaycheck_lib::{Envelope, RelayProber, TargetList, check_domain_posture};
use tracing::info;

use crate::args::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    // configuration errors abort before any network activity
    let envelope = Envelope::new(&cli.sender, &cli.receiver, &cli.contact)
        .context("invalid addresses")?;
    let targets = TargetList::from_path(&cli.targets)?;
    let prober = RelayProber::new(cli.probe_options()).context("TLS initialisation")?;

    if cli.skip_dns {
        info!("SPF/DMARC check skipped");
    } else {
        let report = check_domain_posture(envelope.sender_domain());
        output::print_posture(&report);
    }

    info!(count = targets.len(), "probing targets");
    let mut results = Vec::with_capacity(targets.len());
    for host in targets.hosts() {
        output::print_probe_header(host);
        let result = prober.probe(host, &envelope);
        output::print_result(&result);
        results.push(result);
    }
    output::print_summary(&results);

    // codes de sortie : 0 aucun relais, 2 relais ouvert confirmé, 1 fatal
    if results.iter().any(|r| r.is_open_relay()) {
        std::process::exit(2);
    }
    Ok(())
}
