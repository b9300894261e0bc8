//! Progress reporting module for manifest builds
//!
//! Emits one JSON object per line so a wrapping process can follow a long
//! scan while stdout stays reserved for the manifest itself. Every line is
//! an envelope `{"_t": <tag>, "seq": n, "ts": ms, ...event fields}`.

use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::io::Write;
use std::time::Instant;

use crate::config::GalleryConfig;
use crate::error::ScanError;
use crate::models::ScanStats;
use crate::scanner::ScanProgress;

/// Build phase carried by progress events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScanPhase {
    /// Walking directories and discovering files
    #[default]
    Scan,
    /// Grouping and sorting discovered files
    Build,
}

/// An event that can be written by the reporter
pub trait ProgressEvent: Serialize {
    /// Value of the `_t` field
    const TAG: &'static str;
}

#[derive(Serialize)]
struct Envelope<'a, E: Serialize> {
    #[serde(rename = "_t")]
    tag: &'static str,
    seq: u64,
    ts: u64,
    #[serde(flatten)]
    event: &'a E,
}

/// Sent once when a build begins
#[derive(Debug, Clone, Serialize)]
pub struct StartMessage {
    pub root: String,
    pub follow_links: bool,
}

impl ProgressEvent for StartMessage {
    const TAG: &'static str = "start";
}

impl StartMessage {
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            root: config.root.to_string_lossy().to_string(),
            follow_links: config.follow_links,
        }
    }
}

/// Counters at a point in the build
#[derive(Debug, Clone, Serialize)]
pub struct ProgressMessage {
    pub phase: ScanPhase,
    /// Files seen
    #[serde(rename = "f")]
    pub files: u64,
    /// Directories traversed
    #[serde(rename = "d")]
    pub dirs: u64,
    #[serde(rename = "v")]
    pub video_count: u64,
    #[serde(rename = "i")]
    pub image_count: u64,
    /// Directory being scanned
    pub dir: String,
    /// Elapsed time in milliseconds
    pub ms: u64,
}

impl ProgressEvent for ProgressMessage {
    const TAG: &'static str = "p";
}

impl ProgressMessage {
    pub fn from_progress(phase: ScanPhase, progress: &ScanProgress) -> Self {
        Self {
            phase,
            files: progress.scanned_files,
            dirs: progress.scanned_dirs,
            video_count: progress.video_count,
            image_count: progress.image_count,
            dir: progress.current_dir.clone(),
            ms: progress.elapsed_ms,
        }
    }
}

/// Sent when a build aborts
#[derive(Debug, Clone, Serialize)]
pub struct ErrorProgressMessage {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ProgressEvent for ErrorProgressMessage {
    const TAG: &'static str = "err";
}

impl ErrorProgressMessage {
    pub fn from_error(error: &ScanError) -> Self {
        Self {
            error_type: format!("{:?}", error.kind),
            message: error.message.clone(),
            path: error.path.as_ref().map(|p| p.to_string_lossy().to_string()),
        }
    }
}

/// Sent when a manifest is complete
#[derive(Debug, Clone, Serialize)]
pub struct DoneMessage {
    #[serde(rename = "tf")]
    pub total_files: u64,
    #[serde(rename = "td")]
    pub total_dirs: u64,
    /// Allow-listed media files
    #[serde(rename = "mf")]
    pub media_files: u64,
    #[serde(rename = "sc")]
    pub sections: u64,
    #[serde(rename = "ic")]
    pub items: u64,
    pub ms: u64,
}

impl ProgressEvent for DoneMessage {
    const TAG: &'static str = "done";
}

impl DoneMessage {
    pub fn from_stats(stats: &ScanStats) -> Self {
        Self {
            total_files: stats.total_files,
            total_dirs: stats.total_dirs,
            media_files: stats.media_files(),
            sections: stats.sections,
            items: stats.items,
            ms: stats.duration_ms,
        }
    }
}

/// Writes progress events as JSON lines.
///
/// A disabled reporter is a no-op: it never writes and never consumes a
/// sequence number. Scan progress is throttled to `interval_ms`; start,
/// phase changes, errors and completion are always written.
pub struct ProgressReporter {
    enabled: bool,
    interval_ms: u64,
    last_report: Cell<Instant>,
    seq: Cell<u64>,
    start_time: Instant,
    sink: RefCell<Box<dyn Write>>,
}

impl ProgressReporter {
    /// Create a reporter writing to stderr
    pub fn new(enabled: bool, interval_ms: u64) -> Self {
        Self::with_sink(enabled, interval_ms, Box::new(std::io::stderr()))
    }

    /// Create a reporter writing to an arbitrary sink
    pub fn with_sink(enabled: bool, interval_ms: u64, sink: Box<dyn Write>) -> Self {
        let now = Instant::now();
        Self {
            enabled,
            interval_ms,
            last_report: Cell::new(now),
            seq: Cell::new(0),
            start_time: now,
            sink: RefCell::new(sink),
        }
    }

    /// Create a reporter from the build configuration
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(config.show_progress, config.progress_interval_ms)
    }

    /// Whether a throttled progress event is due
    pub fn should_report(&self) -> bool {
        self.enabled && self.last_report.get().elapsed().as_millis() as u64 >= self.interval_ms
    }

    fn emit<E: ProgressEvent>(&self, event: &E) {
        if !self.enabled {
            return;
        }

        let seq = self.seq.get();
        self.seq.set(seq + 1);
        let envelope = Envelope {
            tag: E::TAG,
            seq,
            ts: self.start_time.elapsed().as_millis() as u64,
            event,
        };

        let mut sink = self.sink.borrow_mut();
        let written = serde_json::to_writer(&mut *sink, &envelope)
            .map_err(std::io::Error::from)
            .and_then(|_| writeln!(sink))
            .and_then(|_| sink.flush());
        if let Err(e) = written {
            log::debug!("Dropping {} progress event: {}", E::TAG, e);
        }
    }

    pub fn report_start(&self, config: &GalleryConfig) {
        self.emit(&StartMessage::from_config(config));
    }

    /// Report scan progress if the interval has elapsed.
    ///
    /// Returns true if an event was written.
    pub fn report_progress(&self, progress: &ScanProgress) -> bool {
        if !self.should_report() {
            return false;
        }
        self.emit(&ProgressMessage::from_progress(ScanPhase::Scan, progress));
        self.last_report.set(Instant::now());
        true
    }

    /// Report entering a new phase, regardless of the interval
    pub fn report_phase(&self, phase: ScanPhase, progress: &ScanProgress) {
        self.emit(&ProgressMessage::from_progress(phase, progress));
        self.last_report.set(Instant::now());
    }

    pub fn report_error(&self, error: &ScanError) {
        self.emit(&ErrorProgressMessage::from_error(error));
    }

    pub fn report_done(&self, stats: &ScanStats) {
        self.emit(&DoneMessage::from_stats(stats));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::rc::Rc;

    /// Write sink whose contents stay readable after the reporter owns it
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        pub(crate) fn lines(&self) -> Vec<serde_json::Value> {
            String::from_utf8(self.0.borrow().clone())
                .unwrap()
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    fn capturing(enabled: bool, interval_ms: u64) -> (ProgressReporter, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let reporter = ProgressReporter::with_sink(enabled, interval_ms, Box::new(buffer.clone()));
        (reporter, buffer)
    }

    fn progress() -> ScanProgress {
        ScanProgress {
            scanned_files: 100,
            scanned_dirs: 10,
            video_count: 7,
            image_count: 80,
            current_dir: "/srv/gallery/Events".to_string(),
            elapsed_ms: 1500,
        }
    }

    #[test]
    fn test_events_share_envelope_and_sequence() {
        let (reporter, buffer) = capturing(true, 0);
        reporter.report_start(&GalleryConfig::new("/srv/gallery"));
        reporter.report_phase(ScanPhase::Build, &progress());
        reporter.report_error(&ScanError::scan_failed(None, "boom"));

        let lines = buffer.lines();
        let tags: Vec<_> = lines.iter().map(|l| l["_t"].as_str().unwrap()).collect();
        assert_eq!(tags, ["start", "p", "err"]);
        let seqs: Vec<_> = lines.iter().map(|l| l["seq"].as_u64().unwrap()).collect();
        assert_eq!(seqs, [0, 1, 2]);

        assert_eq!(lines[0]["root"], "/srv/gallery");
        assert_eq!(lines[0]["follow_links"], true);
        assert_eq!(lines[1]["phase"], "build");
        assert_eq!(lines[1]["f"], 100);
        assert_eq!(lines[1]["v"], 7);
        assert_eq!(lines[1]["i"], 80);
        assert_eq!(lines[1]["dir"], "/srv/gallery/Events");
        assert_eq!(lines[2]["error_type"], "ScanFailed");
        assert!(lines[2].get("path").is_none());
    }

    #[test]
    fn test_done_message_fields() {
        let stats = ScanStats {
            total_dirs: 12,
            total_files: 300,
            image_count: 250,
            video_count: 20,
            skipped_root_files: 1,
            sections: 4,
            items: 269,
            duration_ms: 45,
        };
        let (reporter, buffer) = capturing(true, 0);
        reporter.report_done(&stats);

        let done = &buffer.lines()[0];
        assert_eq!(done["_t"], "done");
        assert_eq!(done["tf"], 300);
        assert_eq!(done["td"], 12);
        assert_eq!(done["mf"], 270);
        assert_eq!(done["sc"], 4);
        assert_eq!(done["ic"], 269);
        assert_eq!(done["ms"], 45);
    }

    #[test]
    fn test_scan_progress_is_throttled() {
        let (reporter, buffer) = capturing(true, 10);
        assert!(!reporter.report_progress(&progress()));

        std::thread::sleep(std::time::Duration::from_millis(20));
        assert!(reporter.report_progress(&progress()));
        assert!(!reporter.report_progress(&progress()));

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["phase"], "scan");
    }

    #[test]
    fn test_disabled_reporter_is_silent() {
        let (reporter, buffer) = capturing(false, 0);
        reporter.report_start(&GalleryConfig::default());
        reporter.report_phase(ScanPhase::Build, &progress());
        reporter.report_error(&ScanError::scan_failed(None, "boom"));
        reporter.report_done(&ScanStats::default());
        assert!(!reporter.report_progress(&progress()));
        assert!(!reporter.should_report());
        assert!(buffer.lines().is_empty());
    }
}
