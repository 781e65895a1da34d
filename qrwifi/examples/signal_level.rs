use qrwifi::WifiProvisioner;

#[tokio::main]
async fn main() -> qrwifi::Result<()> {
    let ssid = std::env::args().nth(1).unwrap_or_else(|| "MyNetwork".into());

    let provisioner = WifiProvisioner::new().await?;

    let strength = provisioner.signal_strength(&ssid).await?;
    let level = provisioner.signal_level(&ssid).await?;

    match strength {
        Some(s) => println!("{ssid}: {s}% ({level})"),
        None => println!("{ssid}: {level}"),
    }
    println!("icon: {}", level.icon_name());

    Ok(())
}
