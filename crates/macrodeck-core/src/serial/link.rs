//! Serial transport with a background line reader.
//!
//! One reader thread per link, stopped cooperatively via an atomic flag and
//! joined before the connection handle is closed — no read ever happens on a
//! closed handle. The reader does not reconnect on its own; a mid-stream
//! connection error ends the loop and the link stays down until the caller
//! restarts it.

use crate::{CoreResult, PadError};

use std::{
    io::{BufRead, BufReader, ErrorKind},
    panic::Location,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread::JoinHandle,
    time::Duration,
};

use error_location::ErrorLocation;
use serialport::SerialPort;
use tracing::{debug, error, info, instrument, warn};

/// Callback invoked on the reader thread for every complete line received.
///
/// The line is UTF-8 decoded and trimmed of surrounding whitespace. The
/// callback must not block for longer than it takes to hand the line off;
/// anything slow (volume queries, key injection) belongs on another thread.
pub type LineCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Serial connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSettings {
    /// Port name, e.g. `COM20` or `/dev/ttyACM0`.
    pub port: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// Blocking-read timeout for the reader loop. Kept short so the thread
    /// observes a stop request promptly.
    pub read_timeout: Duration,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: default_port().to_string(),
            baud_rate: 115_200,
            read_timeout: Duration::from_millis(50),
        }
    }
}

fn default_port() -> &'static str {
    #[cfg(windows)]
    {
        "COM20"
    }
    #[cfg(not(windows))]
    {
        "/dev/ttyACM0"
    }
}

/// Owns a serial connection and its background reader thread.
///
/// `start`/`stop` are the only operations that touch the running flag, which
/// keeps the flag, the thread, and the connection handle consistent.
pub struct SerialLink {
    settings: SerialSettings,
    callback: LineCallback,
    writer: Arc<Mutex<Option<Box<dyn SerialPort>>>>,
    running: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl SerialLink {
    /// Create a link with the given settings. Does not open the port;
    /// call [`SerialLink::start`].
    pub fn new(settings: SerialSettings, callback: LineCallback) -> Self {
        Self {
            settings,
            callback,
            writer: Arc::new(Mutex::new(None)),
            running: Arc::new(AtomicBool::new(false)),
            reader: None,
        }
    }

    /// Whether a reader session has been started and not yet stopped.
    ///
    /// Stays `true` after a mid-stream connection error kills the reader
    /// loop; only [`SerialLink::stop`] clears it.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Open the configured port and spawn the reader thread.
    ///
    /// Idempotent: any existing session is stopped first, so at most one
    /// reader thread and one open handle exist at a time. On failure the
    /// link is left stopped and no thread is spawned.
    #[track_caller]
    #[instrument(skip(self), fields(port = %self.settings.port, baud = self.settings.baud_rate))]
    pub fn start(&mut self) -> CoreResult<()> {
        self.stop();

        let port = serialport::new(&self.settings.port, self.settings.baud_rate)
            .timeout(self.settings.read_timeout)
            .open()
            .map_err(|e| {
                error!(port = %self.settings.port, "Failed to open serial port: {e}");
                PadError::connection(format!(
                    "failed to open {}: {e}",
                    self.settings.port
                ))
            })?;

        let writer = port.try_clone().map_err(|e| {
            PadError::connection(format!("failed to clone serial handle: {e}"))
        })?;
        *lock_writer(&self.writer) = Some(writer);

        self.running.store(true, Ordering::Release);

        let running = Arc::clone(&self.running);
        let callback = Arc::clone(&self.callback);
        let reader = std::thread::Builder::new()
            .name("serial-reader".to_string())
            .spawn(move || read_loop(BufReader::new(port), running, callback))
            .map_err(|e| {
                self.running.store(false, Ordering::Release);
                *lock_writer(&self.writer) = None;
                PadError::connection(format!("failed to spawn reader thread: {e}"))
            })?;
        self.reader = Some(reader);

        info!(port = %self.settings.port, baud = self.settings.baud_rate, "Serial link started");

        Ok(())
    }

    /// Stop the reader thread and close the connection.
    ///
    /// Blocks until the reader has observed the stop flag and exited — the
    /// join is deliberately unbounded, trading liveness on a hung connection
    /// layer for the guarantee that no read outlives the handle. Safe no-op
    /// when not running.
    #[instrument(skip(self))]
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);

        if let Some(handle) = self.reader.take() {
            if handle.join().is_err() {
                error!("Serial reader thread panicked");
            }
            debug!("Serial reader joined");
        }

        *lock_writer(&self.writer) = None;
    }

    /// Swap port/baud configuration and restart under the new settings.
    ///
    /// Equivalent to `stop(); configure; start()` — never a live
    /// reconfiguration of an open handle.
    #[track_caller]
    pub fn update_settings(&mut self, port: impl Into<String>, baud_rate: u32) -> CoreResult<()> {
        self.stop();
        self.settings.port = port.into();
        self.settings.baud_rate = baud_rate;
        self.start()
    }

    /// Write raw bytes to the open connection.
    ///
    /// Fails with [`PadError::NotConnected`] when no handle is open. Never
    /// silently drops data — a lost reply would desynchronize the device
    /// display.
    #[track_caller]
    pub fn send(&self, data: &[u8]) -> CoreResult<()> {
        let mut guard = lock_writer(&self.writer);
        let Some(port) = guard.as_mut() else {
            return Err(PadError::NotConnected {
                location: ErrorLocation::from(Location::caller()),
            });
        };

        port.write_all(data)
            .and_then(|()| port.flush())
            .map_err(|e| PadError::connection(format!("serial write failed: {e}")))
    }
}

impl Drop for SerialLink {
    fn drop(&mut self) {
        self.stop();
    }
}

// Recover from lock poison rather than wedging the link. A poisoned mutex
// means a previous holder panicked, but the Option<handle> is still valid.
fn lock_writer(
    writer: &Mutex<Option<Box<dyn SerialPort>>>,
) -> std::sync::MutexGuard<'_, Option<Box<dyn SerialPort>>> {
    writer.lock().unwrap_or_else(|e| {
        error!("Serial writer lock poisoned, recovering");
        e.into_inner()
    })
}

/// Reader loop. Runs until the stop flag clears or the connection dies.
///
/// No error escapes this function: connection-level failures are logged and
/// end the loop, leaving the link for an explicit restart.
fn read_loop(
    mut reader: BufReader<Box<dyn SerialPort>>,
    running: Arc<AtomicBool>,
    callback: LineCallback,
) {
    let mut line = String::new();

    while running.load(Ordering::Acquire) {
        match reader.read_line(&mut line) {
            Ok(0) => {
                warn!("Serial port reached EOF, reader exiting");
                break;
            }
            Ok(_) => {
                let text = line.trim();
                if !text.is_empty() {
                    callback(text.to_string());
                }
                line.clear();
            }
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) =>
            {
                // Timeout with a partial line buffered: keep accumulating.
                continue;
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Received non-UTF-8 data, dropping line");
                line.clear();
            }
            Err(e) => {
                error!("Serial read failed, reader exiting: {e}");
                break;
            }
        }
    }

    debug!("Serial reader loop ended");
}
