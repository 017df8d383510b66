use std::path::PathBuf;

use anyhow::Result;
use owo_colors::OwoColorize;
use recital_core::asset::{ImageUpload, asset_store};
use recital_core::config::RecitalConfig;
use recital_core::{EventDate, ManagedCollection, ScheduleDraft, ScheduleRecord};

use crate::commands::{confirm_removal, open, save};
use crate::render::Render;

/// Form fields given on the command line. `None` keeps the current value.
pub struct Fields {
    pub date: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub details: Option<String>,
    pub image: Option<PathBuf>,
}

impl Fields {
    fn apply(&self, draft: &mut ScheduleDraft) {
        if let Some(date) = &self.date {
            draft.date = date.clone();
        }
        if let Some(title) = &self.title {
            draft.title = title.clone();
        }
        if let Some(location) = &self.location {
            draft.location = location.clone();
        }
        if let Some(details) = &self.details {
            draft.details = details.clone();
        }
    }
}

pub async fn list(config: &RecitalConfig, upcoming_only: bool) -> Result<()> {
    let schedules = open::<ScheduleRecord>(config).await?;
    let partition = schedules.partition(&EventDate::today());
    schedules.dispose();

    println!("{}", "Upcoming".bold());
    if partition.upcoming.is_empty() {
        println!("   {}", "No upcoming events".dimmed());
    }
    for record in &partition.upcoming {
        println!("   {}", record.render());
    }

    if !upcoming_only && !partition.archive.is_empty() {
        println!();
        println!("{}", "Archive".bold());
        for record in &partition.archive {
            println!("   {}", record.render());
        }
    }

    Ok(())
}

pub async fn add(config: &RecitalConfig, fields: Fields) -> Result<()> {
    let mut schedules = open::<ScheduleRecord>(config).await?;

    let mut draft = schedules.open_create();
    fields.apply(&mut draft);
    let draft = attach_image(config, &mut schedules, draft, fields.image.as_deref()).await?;

    let created = schedules.submit(&draft)?;
    println!("{}", schedules.get(&created.id).map(|t| t.render()).unwrap_or_default());

    save(schedules).await
}

pub async fn edit(config: &RecitalConfig, id: &str, fields: Fields) -> Result<()> {
    let mut schedules = open::<ScheduleRecord>(config).await?;

    let mut draft = schedules.open_edit(id)?;
    fields.apply(&mut draft);
    let draft = attach_image(config, &mut schedules, draft, fields.image.as_deref()).await?;

    let updated = schedules.submit(&draft)?;
    println!("{}", schedules.get(&updated.id).map(|t| t.render()).unwrap_or_default());

    save(schedules).await
}

pub async fn rm(config: &RecitalConfig, id: &str, force: bool) -> Result<()> {
    let mut schedules = open::<ScheduleRecord>(config).await?;

    let Some(entry) = schedules.get(id) else {
        anyhow::bail!("No event with id '{}'", id);
    };
    println!("{}", entry.render());

    let what = format!("'{}'", entry.record.title);
    if !confirm_removal(&what, force)? {
        schedules.dispose();
        return Ok(());
    }

    schedules.delete(id)?;
    save(schedules).await
}

/// Upload `image` for the draft, if one was given. A failed upload is shown
/// as a warning and the event is saved without it.
async fn attach_image(
    config: &RecitalConfig,
    schedules: &mut ManagedCollection<ScheduleRecord>,
    draft: ScheduleDraft,
    image: Option<&std::path::Path>,
) -> Result<ScheduleDraft> {
    let Some(path) = image else {
        return Ok(draft);
    };

    let upload = ImageUpload::from_file(path)
        .await
        .map_err(|e| anyhow::anyhow!("Could not read {}: {}", path.display(), e))?;

    let store = asset_store(config);
    let attachment = draft.attach_image(store.as_ref(), upload).await?;

    if let Some(warning) = &attachment.warning {
        schedules.report_upload_warning(warning);
    }

    Ok(attachment.draft)
}
