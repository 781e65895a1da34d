use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::{LevelFilter, debug};
use qrwifi::{
    ParsedPayload, PayloadOutcome, ProvisionOptions, ProvisionReport, ScanSession,
    WifiCredentials, WifiProvisioner, normalize_url,
};
use std::process::Command as Process;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "qrwifi")]
#[command(about = "Provision Wi-Fi networks from scanned QR payloads")]
#[command(version)]
struct Cli {
    /// `ipv4.dns-priority` of new profiles
    #[arg(long, global = true, default_value_t = ProvisionOptions::default().dns_priority)]
    dns_priority: i32,

    /// Seconds to wait for the network to appear after provisioning (0 = no limit)
    #[arg(long, global = true, default_value_t = 30)]
    discovery_timeout: u64,

    /// Enable debug logging
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify decoded QR text without acting on it
    Classify { text: String },
    /// Act on decoded QR text: open URLs, provision Wi-Fi payloads
    Handle {
        text: String,
        /// Open URL payloads with xdg-open
        #[arg(long)]
        open: bool,
    },
    /// Provision a network from explicit credentials
    Provision {
        #[arg(long)]
        ssid: String,
        /// Pre-shared key; omit for an open network
        #[arg(long, default_value = "")]
        password: String,
        /// Authentication token as found in QR payloads (e.g. WPA, nopass)
        #[arg(long, default_value = "WPA")]
        auth: String,
    },
    /// Show the current signal level of a network
    Signal { ssid: String },
    /// List saved Wi-Fi profiles
    Profiles,
}

impl Cli {
    fn options(&self) -> ProvisionOptions {
        let timeout = match self.discovery_timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        ProvisionOptions::default()
            .with_dns_priority(self.dns_priority)
            .with_discovery_timeout(timeout)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(default)
        .parse_default_env()
        .init();
}

fn print_report(report: &ProvisionReport) {
    println!("Provisioned '{}'", report.ssid);
    println!("  profile:     {}", report.profile);
    println!("  deactivated: {}", report.deactivated);
    println!("  pruned:      {}", report.pruned);
    match report.strength {
        Some(s) => println!("  signal:      {}% ({})", s, report.level),
        None => println!("  signal:      {}", report.level),
    }
    println!("  icon:        {}", report.level.icon_name());
}

fn open_url(url: &str) -> Result<()> {
    let target = normalize_url(url);
    debug!("Opening {target}");
    Process::new("xdg-open")
        .arg(&target)
        .spawn()
        .with_context(|| format!("failed to open {target}"))?;
    Ok(())
}

async fn provisioner(cli: &Cli) -> Result<WifiProvisioner> {
    WifiProvisioner::with_options(cli.options())
        .await
        .context("failed to connect to the system bus")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Command::Classify { text } => match ParsedPayload::classify(text) {
            ParsedPayload::Url(url) => println!("url: {url}"),
            ParsedPayload::Wifi(creds) => println!(
                "wifi: ssid='{}' auth='{}' secured={}",
                creds.ssid,
                creds.auth_protocol,
                creds.is_secured()
            ),
            ParsedPayload::Invalid => println!("invalid"),
        },
        Command::Handle { text, open } => {
            let provisioner = provisioner(&cli).await?;
            let mut session = ScanSession::new();
            match provisioner
                .handle_payload(&mut session, text)
                .await
                .context("provisioning failed")?
            {
                PayloadOutcome::OpenUrl(url) if *open => open_url(&url)?,
                PayloadOutcome::OpenUrl(url) => println!("{}", normalize_url(&url)),
                PayloadOutcome::Provisioned(report) => print_report(&report),
                PayloadOutcome::Ignored => println!("No usable payload"),
            }
        }
        Command::Provision {
            ssid,
            password,
            auth,
        } => {
            let creds = WifiCredentials::new(ssid.as_str(), auth.as_str(), password.as_str());
            let report = provisioner(&cli)
                .await?
                .provision(&creds)
                .await
                .with_context(|| format!("failed to provision '{ssid}'"))?;
            print_report(&report);
        }
        Command::Signal { ssid } => {
            let provisioner = provisioner(&cli).await?;
            let strength = provisioner.signal_strength(ssid).await?;
            let level = provisioner.signal_level(ssid).await?;
            match strength {
                Some(s) => println!("{ssid}: {s}% ({level}, {})", level.icon_name()),
                None => println!("{ssid}: {level} ({})", level.icon_name()),
            }
        }
        Command::Profiles => {
            let profiles = provisioner(&cli)
                .await?
                .saved_wireless_profiles()
                .await
                .context("failed to list saved profiles")?;
            if profiles.is_empty() {
                println!("No saved Wi-Fi profiles");
            }
            for profile in profiles {
                println!(
                    "{}\t{}\t{}",
                    profile.id,
                    profile.ssid_lossy().unwrap_or_default(),
                    profile.handle
                );
            }
        }
    }

    Ok(())
}
