//! Terminal progress bar over the group list.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for `total` groups. Hidden when stderr is not a terminal
/// (cron, systemd), so logs stay clean.
pub fn group_progress(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} groups {msg}")
    {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_progress_length() {
        let pb = group_progress(17);
        assert_eq!(pb.length(), Some(17));
    }
}
