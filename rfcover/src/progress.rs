use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

/// Returns a progress bar with `header` over `length` steps.
pub fn bar(header: String, length: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(length);
    pb.set_prefix(header);
    pb.set_style(
        ProgressStyle::with_template("{prefix}...\n[{wide_bar:.cyan/blue}] {pos}/{len}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Returns a sweep progress callback driving `pb`.
pub fn sweep_callback(pb: &ProgressBar) -> impl FnMut(usize, usize) + '_ {
    move |done, total| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
    }
}
