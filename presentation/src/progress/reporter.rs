//! Progress reporting for fan-out batches

use colored::Colorize;
use fleetlab_application::ports::progress::DispatchProgress;
use fleetlab_domain::Host;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Mutex, PoisonError};

/// Reports per-host progress with an indicatif bar.
///
/// One bar per batch; it is replaced when the next batch starts.
pub struct ProgressReporter {
    label: String,
    bar: Mutex<Option<ProgressBar>>,
    draw_target: fn() -> ProgressDrawTarget,
}

impl ProgressReporter {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            bar: Mutex::new(None),
            draw_target: ProgressDrawTarget::stderr,
        }
    }

    /// Reporter that renders nowhere; keeps the bar state for tests
    pub fn hidden(label: impl Into<String>) -> Self {
        Self {
            draw_target: ProgressDrawTarget::hidden,
            ..Self::new(label)
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn current(&self) -> Option<ProgressBar> {
        self.bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DispatchProgress for ProgressReporter {
    fn on_dispatch_start(&self, total_tasks: usize) {
        let pb = ProgressBar::with_draw_target(Some(total_tasks as u64), (self.draw_target)());
        pb.set_style(Self::style());
        pb.set_prefix(self.label.clone());
        pb.set_message("Starting...");

        *self.bar.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn on_host_complete(&self, host: &Host, success: bool) {
        if let Some(pb) = self.current() {
            let status = if success {
                format!("{} {}", "v".green(), host.name)
            } else {
                format!("{} {}", "x".red(), host.name)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_dispatch_complete(&self) {
        if let Some(pb) = self.bar.lock().unwrap_or_else(PoisonError::into_inner).take() {
            pb.finish_and_clear();
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress {
    label: String,
}

impl SimpleProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    fn start_line(&self, total_tasks: usize) -> String {
        let noun = if total_tasks == 1 { "host" } else { "hosts" };
        format!("{} {} {} {}", "->".cyan(), self.label, total_tasks, noun)
    }
}

impl DispatchProgress for SimpleProgress {
    fn on_dispatch_start(&self, total_tasks: usize) {
        eprintln!("{}", self.start_line(total_tasks));
    }

    fn on_host_complete(&self, host: &Host, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), host.name);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), host.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_tracks_hosts_and_clears() {
        let reporter = ProgressReporter::hidden("Searching");
        let host = Host::new("main", "https://main", "t");

        reporter.on_dispatch_start(3);
        reporter.on_host_complete(&host, true);
        reporter.on_host_complete(&host, false);

        let pb = reporter.current().unwrap();
        assert_eq!(pb.length(), Some(3));
        assert_eq!(pb.position(), 2);

        reporter.on_dispatch_complete();
        assert!(reporter.current().is_none());
        assert!(pb.is_finished());
    }

    #[test]
    fn test_simple_progress_names_its_phase() {
        colored::control::set_override(false);
        assert_eq!(
            SimpleProgress::new("Looking up").start_line(4),
            "-> Looking up 4 hosts"
        );
        assert_eq!(SimpleProgress::new("Blocking").start_line(1), "-> Blocking 1 host");
    }

    #[test]
    fn test_bar_prefix_is_the_label() {
        let reporter = ProgressReporter::hidden("Looking up");
        reporter.on_dispatch_start(2);
        assert_eq!(reporter.current().unwrap().prefix(), "Looking up");
    }

    #[test]
    fn test_completion_without_start_is_noop() {
        let reporter = ProgressReporter::hidden("Blocking");
        reporter.on_host_complete(&Host::new("a", "https://a", "t"), true);
        reporter.on_dispatch_complete();
        assert!(reporter.current().is_none());
    }
}
