use qrwifi::{PayloadOutcome, ScanSession, WifiProvisioner};

#[tokio::main]
async fn main() -> qrwifi::Result<()> {
    let text = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "WIFI:S:MyNetwork;T:WPA;P:password123;;".into());

    let provisioner = WifiProvisioner::new().await?;
    let mut session = ScanSession::new();

    match provisioner.handle_payload(&mut session, &text).await? {
        PayloadOutcome::OpenUrl(url) => println!("URL: {url}"),
        PayloadOutcome::Provisioned(report) => {
            println!("Provisioned {} ({})", report.ssid, report.level);
        }
        PayloadOutcome::Ignored => println!("Nothing to do"),
    }

    Ok(())
}
