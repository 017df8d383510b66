pub mod config;
pub mod schedule;
pub mod video;

use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use recital_core::ManagedCollection;
use recital_core::config::RecitalConfig;
use recital_core::remote::{Fixture, data_source};

use crate::render::{Render, pluralize};
use crate::utils::tui;

/// Load the collection for `R` from the configured data source.
pub async fn open<R: Fixture>(config: &RecitalConfig) -> Result<ManagedCollection<R>> {
    if config.use_mock_data {
        println!("{}", "Using mock data, changes are not kept".dimmed());
    }

    let result = tui::with_spinner(
        format!("Loading {}", R::KIND),
        ManagedCollection::init(data_source::<R>(config)),
    )
    .await;

    result.map_err(|e| anyhow::anyhow!("Could not load {}: {}", R::KIND, e))
}

/// Wait for every remote call, print what happened and tear the collection
/// down. Fails if any change could not be saved.
pub async fn save<R: Fixture>(mut collection: ManagedCollection<R>) -> Result<()> {
    let pending = collection.in_flight();
    let message = format!("Saving {} {}", pending, pluralize("change", pending));
    let reports = tui::with_spinner(message, collection.settle()).await;

    for report in &reports {
        println!("{}", report.render());
    }
    if let Some(status) = &collection.ui().status {
        println!("{}", status.render());
    }

    let failed = reports.iter().filter(|r| r.is_failure()).count();
    collection.dispose();

    if failed > 0 {
        anyhow::bail!("{} {} could not be saved", failed, pluralize("change", failed));
    }

    Ok(())
}

/// Ask before removing `what`, unless `force` is set.
pub fn confirm_removal(what: &str, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }

    let confirmed = Confirm::new()
        .with_prompt(format!("Remove {what}?"))
        .default(false)
        .interact()?;

    Ok(confirmed)
}
