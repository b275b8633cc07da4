use indicatif::{ProgressBar, ProgressStyle};

pub mod command;
pub mod fftr;
pub mod frame;
pub mod mfcc;
pub mod wav2raw;

/// Builds a progress indicator for a subcommand: a known-size bar when the
/// input is a regular file, a spinner when it's a pipe, or `None` when the
/// caller didn't ask for one.
pub(crate) fn progress_bar(show: bool, len: Option<u64>) -> Option<ProgressBar> {
    if !show {
        return None;
    }
    let pb = match len {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::with_template("{bar:40.cyan/blue} {bytes}/{total_bytes} ({eta})")
                    .expect("static template is valid"),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner} {bytes} read")
                    .expect("static template is valid"),
            );
            pb
        }
    };
    Some(pb)
}
