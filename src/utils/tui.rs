use std::future::Future;

use indicatif::{ProgressBar, ProgressStyle};

pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["-", "\\", "|", "/"])
        .template("{msg} {spinner}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Run `task` with a spinner showing. The spinner is cleared however the task ends.
pub async fn with_spinner<T>(message: impl Into<String>, task: impl Future<Output = T>) -> T {
    let spinner = create_spinner(message);
    let result = task.await;
    spinner.finish_and_clear();
    result
}
