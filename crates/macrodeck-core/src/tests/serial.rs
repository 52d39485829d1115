use crate::{PadError, SerialLink, SerialSettings};

use std::sync::Arc;
use std::time::Duration;

fn unreachable_link() -> SerialLink {
    let settings = SerialSettings {
        port: "port-that-does-not-exist".to_string(),
        baud_rate: 115_200,
        read_timeout: Duration::from_millis(50),
    };
    SerialLink::new(settings, Arc::new(|_line| {}))
}

/// WHAT: start() on an unreachable port fails cleanly
/// WHY: A missing device must not crash the host or leave a half-open link
#[test]
fn given_unreachable_port_when_starting_then_connection_error_and_not_running() {
    // Given: A link configured for a port that cannot exist
    let mut link = unreachable_link();

    // When: Starting
    let result = link.start();

    // Then: Connection error, running stays false
    assert!(matches!(result, Err(PadError::Connection { .. })));
    assert!(!link.is_running());
}

/// WHAT: send() without an open connection fails with NotConnected
/// WHY: Dropped replies would desynchronize the device display; the caller
///      must see the failure
#[test]
fn given_stopped_link_when_sending_then_not_connected() {
    // Given: A link that was never started
    let link = unreachable_link();

    // When: Sending a reply frame
    let result = link.send(b"3:50\n");

    // Then: NotConnected
    assert!(matches!(result, Err(PadError::NotConnected { .. })));
}

/// WHAT: send() still fails after a failed start
/// WHY: A failed open must leave no stale handle behind
#[test]
fn given_failed_start_when_sending_then_not_connected() {
    // Given: A link whose start failed
    let mut link = unreachable_link();
    assert!(link.start().is_err());

    // When: Sending
    let result = link.send(b"3:50\n");

    // Then: NotConnected, not a write error on a dead handle
    assert!(matches!(result, Err(PadError::NotConnected { .. })));
}

/// WHAT: stop() is idempotent
/// WHY: Shutdown paths call stop defensively; the second call must no-op
#[test]
fn given_stopped_link_when_stopping_twice_then_noop() {
    // Given: A link that is not running
    let mut link = unreachable_link();

    // When: Stopping twice in a row
    link.stop();
    link.stop();

    // Then: Still not running, no panic, no thread to join
    assert!(!link.is_running());
}

/// WHAT: update_settings() on an unreachable port reports the open failure
/// WHY: A settings change to a bad port must surface, leaving the link down
#[test]
fn given_bad_new_port_when_updating_settings_then_connection_error() {
    // Given: A stopped link
    let mut link = unreachable_link();

    // When: Updating to another unreachable port
    let result = link.update_settings("another-missing-port", 9_600);

    // Then: The restart fails with a connection error, link stays down
    assert!(matches!(result, Err(PadError::Connection { .. })));
    assert!(!link.is_running());
}
