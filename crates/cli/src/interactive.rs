//! Interactive prompts and progress indicators

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Prompt for confirmation
pub fn confirm(prompt: &str) -> Result<bool> {
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(confirmed)
}

/// Prompt for selection from a list
pub fn select<T: ToString>(prompt: &str, items: &[T]) -> Result<usize> {
    let items_str: Vec<String> = items.iter().map(|i| i.to_string()).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items_str)
        .default(0)
        .interact()?;
    Ok(selection)
}

/// Create a progress bar
pub fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Create a spinner
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_creation() {
        let pb = progress_bar(6);
        assert_eq!(pb.length(), Some(6));
    }

    #[test]
    fn test_spinner_creation() {
        let sp = spinner("Uploading...");
        assert_eq!(sp.message(), "Uploading...");
        sp.finish_and_clear();
    }
}
