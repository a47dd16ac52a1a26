use indicatif::{ProgressBar, ProgressStyle};

/// Byte-denominated bar for streaming transfers. Falls back to a
/// spinner with a byte counter when the total size is unknown.
pub fn byte_bar(total: Option<u64>, label: &str) -> ProgressBar {
    let bar = match total {
        Some(total) => {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::with_template(
                    "{msg} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})",
                )
                .unwrap()
                .progress_chars("=> "),
            );
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{msg} {spinner} {bytes} ({bytes_per_sec})").unwrap(),
            );
            bar
        }
    };
    bar.set_message(label.to_string());
    bar
}

/// Percent bar driven by yt-dlp's `--progress-template` output.
pub fn percent_bar(label: &str) -> ProgressBar {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:30.cyan/blue}] {pos:>3}%")
            .unwrap()
            .progress_chars("=> "),
    );
    bar.set_message(label.to_string());
    bar
}
