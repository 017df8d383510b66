use anyhow::Result;
use owo_colors::OwoColorize;
use recital_core::VideoRecord;
use recital_core::config::RecitalConfig;

use crate::commands::{confirm_removal, open, save};
use crate::render::Render;

pub async fn list(config: &RecitalConfig) -> Result<()> {
    let videos = open::<VideoRecord>(config).await?;

    if videos.is_empty() {
        println!("{}", "No videos".dimmed());
    }
    for entry in videos.entries() {
        println!("{}", entry.render());
    }

    videos.dispose();
    Ok(())
}

pub async fn add(config: &RecitalConfig, title: String, url: String, order: Option<i64>) -> Result<()> {
    let mut videos = open::<VideoRecord>(config).await?;

    let mut draft = videos.open_create();
    draft.title = title;
    draft.url = url;
    if let Some(order) = order {
        draft.order = order;
    }

    let created = videos.submit(&draft)?;
    println!("{}", created.render());

    save(videos).await
}

pub async fn edit(
    config: &RecitalConfig,
    id: &str,
    title: Option<String>,
    url: Option<String>,
    order: Option<i64>,
) -> Result<()> {
    let mut videos = open::<VideoRecord>(config).await?;

    let mut draft = videos.open_edit(id)?;
    if let Some(title) = title {
        draft.title = title;
    }
    if let Some(url) = url {
        draft.url = url;
    }
    if let Some(order) = order {
        draft.order = order;
    }

    let updated = videos.submit(&draft)?;
    println!("{}", updated.render());

    save(videos).await
}

pub async fn rm(config: &RecitalConfig, id: &str, force: bool) -> Result<()> {
    let mut videos = open::<VideoRecord>(config).await?;

    let Some(entry) = videos.get(id) else {
        anyhow::bail!("No video with id '{}'", id);
    };
    println!("{}", entry.render());

    let what = format!("'{}'", entry.record.title);
    if !confirm_removal(&what, force)? {
        videos.dispose();
        return Ok(());
    }

    videos.delete(id)?;
    save(videos).await
}
