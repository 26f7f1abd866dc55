//! Monitoring session: the background serial reader
//!
//! One worker thread per active session. The worker owns the port handle
//! and a private snapshot; every complete line is classified there and
//! handed to the foreground as an immutable (raw line, snapshot clone)
//! pair over the event channel. The foreground never touches the port and
//! the worker never touches widget state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::serial::{LineSource, SerialLineSource};
use crate::telemetry::{DeviceProfile, DeviceSnapshot};

/// Sleep between polls when no complete line is available.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// A running monitoring session.
///
/// `start` opens the port before spawning anything, so an open failure is
/// reported exactly once and leaves no session behind. `stop` is
/// cooperative: the worker checks the flag once per poll and exits within
/// about one idle interval, closing the port as it drops the source.
pub struct MonitorSession {
    running: Arc<AtomicBool>,
}

impl MonitorSession {
    pub fn start(
        port_name: &str,
        baud: u32,
        profile: DeviceProfile,
        tx: mpsc::Sender<AppEvent>,
    ) -> Result<Self> {
        let source = SerialLineSource::open(port_name, baud)?;

        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        // Detached on purpose; shutdown is flag-driven, not join-driven.
        let _reader = thread::Builder::new()
            .name("serial-reader".to_string())
            .spawn(move || read_loop(source, profile, flag, tx))?;

        info!("monitoring started on {} at {} baud", port_name, baud);
        Ok(Self { running })
    }

    /// Request the worker to stop. Not joined: the worker may still be
    /// mid-send, and the foreground keeps draining the channel, so it
    /// winds down on its own within one poll interval.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        info!("monitoring stop requested");
    }
}

impl Drop for MonitorSession {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

fn read_loop(
    mut source: impl LineSource,
    profile: DeviceProfile,
    running: Arc<AtomicBool>,
    tx: mpsc::Sender<AppEvent>,
) {
    let mut snapshot = DeviceSnapshot::new(profile);

    while running.load(Ordering::Relaxed) {
        match source.next_line() {
            Ok(Some(line)) => {
                // More lines may already be framed behind a blank one;
                // skip it without the idle wait.
                if line.is_empty() {
                    continue;
                }
                snapshot.classify(&line, Local::now());
                let event = AppEvent::Telemetry {
                    raw: line,
                    snapshot: snapshot.clone(),
                };
                if tx.blocking_send(event).is_err() {
                    debug!("telemetry receiver dropped, reader exiting");
                    return;
                }
            }
            Ok(None) => thread::sleep(IDLE_POLL),
            Err(e) => {
                warn!("serial read error: {:#}", e);
                let _ = tx.blocking_send(AppEvent::SessionEnded {
                    reason: Some(format!("{e:#}")),
                });
                return;
            }
        }
    }

    debug!("reader observed stop flag");
    let _ = tx.blocking_send(AppEvent::SessionEnded { reason: None });
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::collections::VecDeque;
    use std::time::Instant;

    struct ScriptedSource {
        lines: VecDeque<Option<String>>,
    }

    impl ScriptedSource {
        fn new(lines: &[Option<&str>]) -> Self {
            Self {
                lines: lines.iter().map(|l| l.map(str::to_string)).collect(),
            }
        }
    }

    impl LineSource for ScriptedSource {
        fn next_line(&mut self) -> anyhow::Result<Option<String>> {
            match self.lines.pop_front() {
                Some(line) => Ok(line),
                None => Err(anyhow!("stream closed")),
            }
        }
    }

    #[test]
    fn blank_lines_emit_nothing_and_skip_the_idle_wait() {
        let source = ScriptedSource::new(&[
            Some(""),
            Some(""),
            Some("Security -> Motion: YES | Door: OPEN | Gas: 450"),
        ]);
        let (tx, mut rx) = mpsc::channel(8);
        let running = Arc::new(AtomicBool::new(true));

        let started = Instant::now();
        read_loop(source, DeviceProfile::Home, running, tx);
        // Two blanks before the real line; had either one idle-slept,
        // the loop could not finish inside one poll interval.
        assert!(started.elapsed() < IDLE_POLL);

        match rx.try_recv().unwrap() {
            AppEvent::Telemetry { raw, snapshot } => {
                assert_eq!(raw, "Security -> Motion: YES | Door: OPEN | Gas: 450");
                assert_eq!(snapshot.profile(), DeviceProfile::Home);
            }
            other => panic!("expected telemetry first, got {:?}", other),
        }
        match rx.try_recv().unwrap() {
            AppEvent::SessionEnded { reason } => assert!(reason.is_some()),
            other => panic!("expected session end, got {:?}", other),
        }
    }

    #[test]
    fn read_error_reports_reason_and_stops() {
        let source = ScriptedSource::new(&[]);
        let (tx, mut rx) = mpsc::channel(8);
        let running = Arc::new(AtomicBool::new(true));

        read_loop(source, DeviceProfile::Feeder, running, tx);

        match rx.try_recv().unwrap() {
            AppEvent::SessionEnded { reason } => {
                assert!(reason.unwrap().contains("stream closed"));
            }
            other => panic!("expected session end, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }
}
