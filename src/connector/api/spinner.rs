use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Show a terminal spinner while `future` runs. The spinner is cleared once
/// the future resolves; it carries no progress information.
pub async fn with_spinner<F: Future>(message: impl Into<String>, future: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(120));

    let output = future.await;
    spinner.finish_and_clear();
    output
}
