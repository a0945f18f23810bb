// fastbin/src/ui/progress.rs
use std::sync::Mutex;
use std::time::Duration;

use fastbin_net::{ProgressControl, ProgressReporter};
use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{spinner:.blue.bold} {msg} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";
const SPINNER_TEMPLATE: &str = "{spinner:.blue.bold} {msg} {bytes} ({bytes_per_sec})";

/// Download progress on stderr: a byte bar when the length is known,
/// a spinner with a running byte count otherwise.
#[derive(Default)]
pub struct IndicatifProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl IndicatifProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                f(bar);
            }
        }
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.bar.lock().ok().and_then(|mut guard| guard.take())
    }
}

fn display_name(url: &str) -> &str {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(url)
}

impl ProgressReporter for IndicatifProgress {
    fn started(&self, url: &str, total: Option<u64>) {
        let bar = match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                bar.set_style(
                    ProgressStyle::with_template(BAR_TEMPLATE)
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("=> "),
                );
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::with_template(SPINNER_TEMPLATE)
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar
            }
        };
        bar.set_message(format!("Downloading {}", display_name(url)));
        bar.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn update(&self, read: u64, _total: Option<u64>) -> ProgressControl {
        self.with_bar(|bar| bar.set_position(read));
        ProgressControl::Continue
    }

    fn finished(&self, read: u64) {
        if let Some(bar) = self.take_bar() {
            bar.set_position(read);
            bar.finish_and_clear();
        }
    }

    fn cancelled(&self) {
        if let Some(bar) = self.take_bar() {
            bar.abandon_with_message("Download cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_last_segment() {
        assert_eq!(
            display_name("https://example.com/releases/tool.tar.gz"),
            "tool.tar.gz"
        );
        assert_eq!(display_name("file:///tmp/jq/"), "jq");
    }

    #[test]
    fn reporter_lifecycle_without_a_terminal() {
        let progress = IndicatifProgress::new();
        progress.started("https://example.com/tool", Some(10));
        assert_eq!(progress.update(5, Some(10)), ProgressControl::Continue);
        progress.finished(10);
        assert!(progress.take_bar().is_none());
        // Updates after completion are ignored.
        assert_eq!(progress.update(11, None), ProgressControl::Continue);
    }
}
