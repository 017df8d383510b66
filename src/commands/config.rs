use anyhow::Result;
use owo_colors::OwoColorize;
use recital_core::config::RecitalConfig;

pub fn run(config: &RecitalConfig) -> Result<()> {
    let config_path = RecitalConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Assets:     {}", config.asset_path().display());
    println!("  Data:       {}", config.data_path().display());

    println!();
    println!("{}", "Data source".bold());
    if config.use_mock_data {
        println!("  Mock data ({} ms latency)", config.mock_latency_ms);
    } else {
        println!("  {} ({}s timeout)", config.api_url, config.request_timeout_secs);
    }

    println!();
    println!("{}", "Effective settings".bold());
    for line in config.to_toml()?.lines() {
        println!("  {}", line.dimmed());
    }

    Ok(())
}
