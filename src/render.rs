//! TUI rendering traits for recital types.
//!
//! This module provides extension traits that add colored terminal rendering
//! to recital-core types using owo_colors.

use owo_colors::OwoColorize;
use recital_core::collection::{Status, StatusLevel, SyncOp, SyncReport, Tracked};
use recital_core::{ScheduleRecord, SyncState, VideoRecord};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for SyncState {
    fn render(&self) -> String {
        match self {
            SyncState::Pending => "(saving)".yellow().to_string(),
            SyncState::Confirmed => String::new(),
            SyncState::Failed(reason) => format!("(not saved: {reason})").red().to_string(),
        }
    }
}

impl Render for ScheduleRecord {
    fn render(&self) -> String {
        let mut line = format!("{}  {}", self.date.as_str().bold(), self.title);

        if let Some(location) = &self.location {
            line.push_str(&format!(" {}", format!("@ {location}").dimmed()));
        }
        if self.image_url.is_some() {
            line.push_str(" [image]");
        }

        format!("{} {}", line, format!("[{}]", self.id).dimmed())
    }
}

impl Render for VideoRecord {
    fn render(&self) -> String {
        format!(
            "{:>3}. {} {} {}",
            self.order,
            self.title,
            self.video_ref.share_url().dimmed(),
            format!("[{}]", self.id).dimmed()
        )
    }
}

impl<R: Render> Render for Tracked<R> {
    fn render(&self) -> String {
        let state = self.state.render();
        if state.is_empty() {
            self.record.render()
        } else {
            format!("{} {}", self.record.render(), state)
        }
    }
}

impl Render for SyncOp {
    fn render(&self) -> String {
        match self {
            SyncOp::Create => "+".green().to_string(),
            SyncOp::Update => "~".yellow().to_string(),
            SyncOp::Delete => "-".red().to_string(),
        }
    }
}

impl Render for SyncReport {
    fn render(&self) -> String {
        match self {
            SyncReport::Created { id, .. } => format!("{} Created {}", SyncOp::Create.render(), id),
            SyncReport::Updated { id } => format!("{} Updated {}", SyncOp::Update.render(), id),
            SyncReport::Deleted { id } => format!("{} Deleted {}", SyncOp::Delete.render(), id),
            SyncReport::Failed { id, op, error } => {
                format!("{} {} {} failed: {}", op.render(), op, id, error)
                    .red()
                    .to_string()
            }
        }
    }
}

impl Render for Status {
    fn render(&self) -> String {
        match self.level {
            StatusLevel::Warning => format!("warning: {}", self.message).yellow().to_string(),
            StatusLevel::Error => format!("error: {}", self.message).red().to_string(),
        }
    }
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmed_state_renders_nothing() {
        assert_eq!(SyncState::Confirmed.render(), "");
        assert!(SyncState::Failed("timeout".into()).render().contains("timeout"));
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("change", 1), "change");
        assert_eq!(pluralize("change", 3), "changes");
    }
}
