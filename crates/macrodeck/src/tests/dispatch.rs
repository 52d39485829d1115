use crate::{
    App, EncoderMap, StatusSink,
    app::MAX_CONCURRENT_VOLUME_TASKS,
    config::EncoderConfig,
    device_command::EncoderCommand,
};

use std::sync::{Arc, Mutex as StdMutex};

use macrodeck_core::{
    Action, ActionKind, AudioSessionBackend, MacroExecutor, MacroRegistry, SerialLink,
    SerialSettings, VolumeController,
};
use tokio::sync::{Mutex, Semaphore, mpsc};

/// Single-session fake audio backend.
struct OneSession {
    app: String,
    level: StdMutex<f32>,
}

impl AudioSessionBackend for OneSession {
    fn active_process_names(&self) -> Vec<String> {
        vec![self.app.clone()]
    }

    fn session_volume(&self, process: &str) -> Option<f32> {
        (process == self.app)
            .then(|| self.level.lock().map(|l| *l).unwrap_or_default())
    }

    fn set_session_volume(&self, process: &str, level: f32) -> bool {
        if process != self.app {
            return false;
        }
        if let Ok(mut slot) = self.level.lock() {
            *slot = level;
        }
        true
    }
}

/// Build an app with a recording status sink, a disconnected serial link,
/// and the given registry/encoders/volume backend.
fn test_app(
    encoders: Vec<EncoderConfig>,
    registry: MacroRegistry,
    volume: VolumeController,
) -> (App, Arc<StdMutex<Vec<String>>>) {
    let recorded = Arc::new(StdMutex::new(Vec::new()));
    let sink_log = Arc::clone(&recorded);
    let status = StatusSink::new(move |message| {
        if let Ok(mut log) = sink_log.lock() {
            log.push(message);
        }
    });

    let settings = SerialSettings {
        port: "port-that-does-not-exist".to_string(),
        ..SerialSettings::default()
    };
    let serial = SerialLink::new(settings, Arc::new(|_line| {}));

    // Receiver kept open but unused; dispatch is driven directly.
    let (_line_tx, line_rx) = mpsc::channel(8);

    let app = App {
        serial: Arc::new(Mutex::new(serial)),
        registry: Arc::new(Mutex::new(registry)),
        volume: Arc::new(volume),
        executor: Arc::new(MacroExecutor::new()),
        encoders: EncoderMap::from_config(&encoders),
        status,
        line_rx,
        volume_permits: Arc::new(Semaphore::new(MAX_CONCURRENT_VOLUME_TASKS)),
    };

    (app, recorded)
}

fn messages(recorded: &Arc<StdMutex<Vec<String>>>) -> Vec<String> {
    recorded.lock().map(|l| l.clone()).unwrap_or_default()
}

fn empty_registry() -> MacroRegistry {
    MacroRegistry::new(std::env::temp_dir().join("macrodeck-dispatch-unused.json"))
}

/// WHAT: An encoder command for an unmapped encoder is dropped silently
/// WHY: No application mapped means no volume call and no reply
#[tokio::test]
async fn given_unmapped_encoder_when_dispatching_then_no_task_and_no_status() {
    // Given: No encoder mappings at all
    let (app, recorded) = test_app(Vec::new(), empty_registry(), VolumeController::new());

    // When: Dispatching an encoder command
    let handle = app.dispatch_encoder(EncoderCommand {
        encoder: 3,
        increase: true,
    });

    // Then: No task spawned, nothing reported
    assert!(handle.is_none());
    assert!(messages(&recorded).is_empty());
}

/// WHAT: A mapped encoder command adjusts volume and attempts a reply
/// WHY: The full encoder path — mapping, clamped arithmetic, reply framing —
///      must run off the dispatch path; with the link down, the failed reply
///      is surfaced rather than dropped
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_mapped_encoder_when_dispatching_then_volume_adjusted_and_reply_attempted() {
    // Given: Encoder 3 mapped to vlc.exe at 40%, serial link disconnected
    let backend = Arc::new(OneSession {
        app: "vlc.exe".to_string(),
        level: StdMutex::new(0.4),
    });

    struct Shared(Arc<OneSession>);
    impl AudioSessionBackend for Shared {
        fn active_process_names(&self) -> Vec<String> {
            self.0.active_process_names()
        }
        fn session_volume(&self, process: &str) -> Option<f32> {
            self.0.session_volume(process)
        }
        fn set_session_volume(&self, process: &str, level: f32) -> bool {
            self.0.set_session_volume(process, level)
        }
    }

    let (app, recorded) = test_app(
        vec![EncoderConfig {
            id: 3,
            app: Some("vlc.exe".to_string()),
            color: None,
        }],
        empty_registry(),
        VolumeController::with_backend(Box::new(Shared(Arc::clone(&backend)))),
    );

    // When: Dispatching `Enc3: +` and waiting for the volume task
    let handle = app.dispatch_encoder(EncoderCommand {
        encoder: 3,
        increase: true,
    });
    handle.unwrap().await.unwrap();

    // Then: Volume stepped 40% -> 50%, and the undeliverable reply for
    // encoder 3 was reported, not swallowed
    let level = backend.level.lock().map(|l| *l).unwrap();
    assert!((level - 0.5).abs() < 1e-4);

    let log = messages(&recorded);
    assert_eq!(log.len(), 1);
    assert!(log[0].starts_with("Failed to send volume reply for encoder 3"));
}

/// WHAT: A mapped encoder whose application has no session reports status
/// WHY: App closed or name mismatch is expected; no reply frame is sent
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_no_audio_session_when_dispatching_then_status_and_no_reply() {
    // Given: Encoder 3 mapped to an application with no session
    let (app, recorded) = test_app(
        vec![EncoderConfig {
            id: 3,
            app: Some("spotify.exe".to_string()),
            color: None,
        }],
        empty_registry(),
        VolumeController::with_backend(Box::new(OneSession {
            app: "vlc.exe".to_string(),
            level: StdMutex::new(0.5),
        })),
    );

    // When: Dispatching and waiting for the task
    let handle = app.dispatch_encoder(EncoderCommand {
        encoder: 3,
        increase: true,
    });
    handle.unwrap().await.unwrap();

    // Then: Only the no-session status line, no reply failure (none sent)
    let log = messages(&recorded);
    assert_eq!(log, vec!["No audio session for spotify.exe".to_string()]);
}

/// WHAT: A line with no registered macro reports "no macro assigned"
/// WHY: Not-yet-configured commands are a common case, not an error
#[tokio::test]
async fn given_unregistered_command_when_dispatching_then_no_macro_status() {
    // Given: An empty registry
    let (app, recorded) = test_app(Vec::new(), empty_registry(), VolumeController::new());

    // When: Dispatching an ordinary line
    app.dispatch_line("play_button").await;

    // Then: The expected status, and nothing else happened
    assert_eq!(
        messages(&recorded),
        vec!["No macro assigned for this command".to_string()]
    );
}

/// WHAT: A macro with an unrecognized key value reports the failure as status
/// WHY: Injection failures are status text, never fatal to the process
#[tokio::test]
async fn given_invalid_macro_value_when_dispatching_then_failure_status() {
    // Given: A macro whose value no key table recognizes
    let mut registry = empty_registry();
    registry.set(
        "play_button",
        Action::new(ActionKind::KeyboardKey, "definitely-not-a-key"),
    );
    let (app, recorded) = test_app(Vec::new(), registry, VolumeController::new());

    // When: Dispatching its command
    app.dispatch_line("play_button").await;

    // Then: One failure status naming the command
    let log = messages(&recorded);
    assert_eq!(log.len(), 1);
    assert!(log[0].starts_with("Macro for play_button failed:"));
}

/// WHAT: A near-miss encoder line takes the macro branch
/// WHY: Classification is line-atomic; a partial match must not half-run
///      the encoder path
#[tokio::test]
async fn given_non_numeric_encoder_line_when_dispatching_then_macro_branch() {
    // Given: Encoder 3 mapped, but the line's id is not numeric
    let (app, recorded) = test_app(
        vec![EncoderConfig {
            id: 3,
            app: Some("vlc.exe".to_string()),
            color: None,
        }],
        empty_registry(),
        VolumeController::new(),
    );

    // When: Dispatching `EncA: +`
    app.dispatch_line("EncA: +").await;

    // Then: Treated as a macro key with no registration
    assert_eq!(
        messages(&recorded),
        vec!["No macro assigned for this command".to_string()]
    );
}
