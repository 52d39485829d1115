mod serial;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique scratch path for registry round-trip tests.
pub(crate) fn temp_macro_file(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!("macrodeck-{tag}-{}-{nanos}.json", std::process::id()))
}
