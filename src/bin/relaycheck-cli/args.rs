use std::path::PathBuf;

use clap::{ArgAction, Parser};
use relaycheck_lib::{ProbeOptions, TlsVerification};

#[derive(Parser, Debug)]
#[command(name = "relaycheck-cli", about = "Open Relay tester")]
pub struct Cli {
    /// expéditeur du mail (enveloppe + en-tête From)
    #[arg(long = "sender")]
    pub sender: String,

    /// destinataire du mail
    #[arg(long = "receiver")]
    pub receiver: String,

    /// fichier des serveurs SMTP à tester (un par ligne)
    #[arg(long = "targets")]
    pub targets: PathBuf,

    /// adresse à laquelle faire suivre le mail (citée dans le corps)
    #[arg(long = "contact")]
    pub contact: String,

    /// port SMTP
    #[arg(long, default_value_t = 25)]
    pub port: u16,

    /// force STARTTLS (certificat non vérifié, sauf --verify-tls)
    #[arg(long)]
    pub ssl: bool,

    /// vérifie le certificat présenté après STARTTLS
    #[arg(long = "verify-tls", requires = "ssl")]
    pub verify_tls: bool,

    /// timeout connexion/commande (ms), 0 = aucun
    #[arg(long = "timeout", default_value_t = 30_000)]
    pub timeout_ms: u64,

    /// nom utilisé pour EHLO/HELO (par défaut le domaine de l'expéditeur)
    #[arg(long)]
    pub helo: Option<String>,

    /// saute la vérification SPF/DMARC du domaine expéditeur
    #[arg(long = "skip-dns")]
    pub skip_dns: bool,

    /// verbosité des logs (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions {
            port: self.port,
            starttls: self.ssl,
            tls_verification: if self.verify_tls {
                TlsVerification::Enabled
            } else {
                TlsVerification::Disabled
            },
            timeout_ms: self.timeout_ms,
            helo_domain: self.helo.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Result<Cli, clap::Error> {
        let mut argv = vec![
            "relaycheck-cli",
            "--sender",
            "attacker@evil.com",
            "--receiver",
            "victim@target.com",
            "--targets",
            "targets.txt",
            "--contact",
            "abuse@target.com",
        ];
        argv.extend_from_slice(extra);
        <Cli as Parser>::try_parse_from(argv)
    }

    #[test]
    fn defaults_match_plain_port_25() {
        let cli = parse(&[]).unwrap();
        let options = cli.probe_options();
        assert_eq!(options.port, 25);
        assert!(!options.starttls);
        assert_eq!(options.timeout_ms, 30_000);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn ssl_disables_certificate_verification() {
        let cli = parse(&["--ssl", "--port", "587"]).unwrap();
        let options = cli.probe_options();
        assert!(options.starttls);
        assert_eq!(options.port, 587);
        assert_eq!(options.tls_verification, TlsVerification::Disabled);
    }

    #[test]
    fn verify_tls_requires_ssl() {
        assert!(parse(&["--verify-tls"]).is_err());
        let cli = parse(&["--ssl", "--verify-tls"]).unwrap();
        assert_eq!(cli.probe_options().tls_verification, TlsVerification::Enabled);
    }

    #[test]
    fn required_arguments_are_enforced() {
        let err = <Cli as Parser>::try_parse_from(["relaycheck-cli", "--sender", "a@b.c"])
            .expect_err("missing arguments");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn verbosity_counts_flags() {
        let cli = parse(&["-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
