//! Terminal progress helpers.

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICKS: &[&str] = &["-", "\\", "|", "/"];

fn spinner(message: String) -> ProgressBar {
    let style = ProgressStyle::default_spinner()
        .tick_strings(TICKS)
        .template("{msg} {spinner}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());

    let spinner = ProgressBar::new_spinner().with_style(style).with_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Await `task` behind a spinner labelled `message`. The spinner is cleared
/// before the result is returned, so callers can print right away.
pub async fn with_spinner<T>(message: String, task: impl Future<Output = T>) -> T {
    let spinner = spinner(message);
    let output = task.await;
    spinner.finish_and_clear();
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_spinner_returns_task_output() {
        let output = with_spinner("Loading videos".to_string(), async { 42 }).await;
        assert_eq!(output, 42);
    }
}
