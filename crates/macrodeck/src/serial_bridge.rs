//! Bridge from the serial reader thread into the async dispatcher.
//!
//! The reader thread hands each line to a callback; the callback forwards
//! into a bounded tokio channel with `blocking_send`, so the dispatcher
//! consumes lines from a plain `mpsc::Receiver` and backpressure lands on
//! the device's line buffer rather than on unbounded memory.

use macrodeck_core::LineCallback;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

/// Create the line callback / receiver pair wiring a `SerialLink` to the
/// dispatcher loop.
pub fn line_channel(capacity: usize) -> (LineCallback, mpsc::Receiver<String>) {
    let (tx, rx) = mpsc::channel(capacity);

    let callback: LineCallback = Arc::new(move |line: String| {
        // blocking_send: we are on the serial reader thread, not a runtime
        // worker. Fails only when the dispatcher is gone; drop the line.
        if tx.blocking_send(line).is_err() {
            debug!("Line channel closed, dropping serial data");
        }
    });

    (callback, rx)
}
