pub use indicatif::ProgressBar;
use indicatif::ProgressStyle;

/// Progress bar over a batch of samples, e.g. `with_prefix(n, "Predicting ")`.
pub fn with_prefix(size: usize, prefix: &str) -> ProgressBar {
    let template = format!(
        "{}{}",
        prefix, "{pos}/{len} {wide_bar} [{elapsed} elapsed; {eta} left]"
    );

    let progress = ProgressBar::new(size as u64);
    progress.set_draw_delta(usize::max(1, size / 100) as u64);
    progress.set_style(ProgressStyle::default_bar().template(&template));

    progress
}
