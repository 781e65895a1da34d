use qrwifi::WifiProvisioner;

#[tokio::main]
async fn main() -> qrwifi::Result<()> {
    let provisioner = WifiProvisioner::new().await?;

    let profiles = provisioner.saved_wireless_profiles().await?;
    for profile in profiles {
        println!(
            "{:30} {:30} {}",
            profile.id,
            profile.ssid_lossy().unwrap_or_default(),
            profile.handle
        );
    }

    Ok(())
}
