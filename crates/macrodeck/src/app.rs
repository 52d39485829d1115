use crate::{
    AppResult, EncoderMap, StatusSink,
    device_command::{self, DeviceCommand, EncoderCommand},
};

use std::sync::Arc;

use macrodeck_core::{MacroExecutor, MacroRegistry, SerialLink, VolumeAdjustment, VolumeController};
use tokio::sync::{Mutex, Semaphore, mpsc};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Upper bound on concurrent volume adjustments.
///
/// A flood of encoder events queues on the semaphore instead of spawning
/// unbounded concurrent audio-subsystem calls.
pub(crate) const MAX_CONCURRENT_VOLUME_TASKS: usize = 4;

/// Command dispatcher.
///
/// Consumes lines bridged from the serial reader thread and routes each one:
/// encoder volume commands to the volume controller (asynchronously, reply
/// sent back over the link in completion order), anything else to the macro
/// registry and executor. The reader thread never runs volume queries or key
/// injection; both happen on blocking tasks.
pub struct App {
    pub(crate) serial: Arc<Mutex<SerialLink>>,
    pub(crate) registry: Arc<Mutex<MacroRegistry>>,
    pub(crate) volume: Arc<VolumeController>,
    pub(crate) executor: Arc<MacroExecutor>,
    pub(crate) encoders: EncoderMap,
    pub(crate) status: StatusSink,
    pub(crate) line_rx: mpsc::Receiver<String>,
    pub(crate) volume_permits: Arc<Semaphore>,
}

impl App {
    /// Run the dispatch loop until the line channel closes or Ctrl-C.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("MacroDeck dispatcher running");

        self.apply_encoder_colors().await;

        loop {
            tokio::select! {
                maybe_line = self.line_rx.recv() => {
                    match maybe_line {
                        Some(line) => self.dispatch_line(&line).await,
                        None => {
                            info!("Serial bridge closed, shutting down dispatcher");
                            break;
                        }
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        // Close the bridge first: a reader thread parked on a full channel
        // gets a send error and can observe the stop flag. Only then join it.
        self.line_rx.close();
        self.serial.lock().await.stop();

        info!("MacroDeck shut down successfully");

        Ok(())
    }

    /// Classify one received line and dispatch it. Exactly one branch runs.
    pub(crate) async fn dispatch_line(&self, line: &str) {
        match DeviceCommand::parse(line) {
            DeviceCommand::Encoder(cmd) => {
                let _ = self.dispatch_encoder(cmd);
            }
            DeviceCommand::Macro(command) => self.dispatch_macro(&command).await,
        }
    }

    /// Push configured indicator colors to the device.
    ///
    /// Best-effort: a link that is not connected yet simply skips them.
    pub(crate) async fn apply_encoder_colors(&self) {
        for (encoder, color) in self.encoders.colors() {
            let frame = device_command::color_frame(*encoder, *color);
            if let Err(e) = self.serial.lock().await.send(&frame) {
                warn!(encoder, error = %e, "Failed to set encoder color");
                break;
            }
        }
    }

    /// Handle an encoder volume command.
    ///
    /// The adjustment runs on a blocking task behind the volume semaphore so
    /// a slow or hung audio call cannot stall line dispatch. Returns the
    /// task handle when one was spawned (unmapped encoders spawn nothing).
    pub(crate) fn dispatch_encoder(
        &self,
        cmd: EncoderCommand,
    ) -> Option<tokio::task::JoinHandle<()>> {
        let Some(app) = self.encoders.app_for(cmd.encoder) else {
            debug!(encoder = cmd.encoder, "No application mapped, dropping encoder command");
            return None;
        };

        let app = app.to_string();
        let request_id = Uuid::new_v4();
        let volume = Arc::clone(&self.volume);
        let serial = Arc::clone(&self.serial);
        let status = self.status.clone();
        let permits = Arc::clone(&self.volume_permits);

        Some(tokio::spawn(async move {
            // Closed semaphore only happens at shutdown; nothing to do.
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };

            let adjustment = {
                let volume = Arc::clone(&volume);
                let target = app.clone();
                match tokio::task::spawn_blocking(move || {
                    volume.adjust_volume(&target, cmd.increase)
                })
                .await
                {
                    Ok(a) => a,
                    Err(e) => {
                        error!(request_id = %request_id, error = ?e, "Volume task panicked");
                        return;
                    }
                }
            };

            match adjustment {
                VolumeAdjustment::Applied { percent } => {
                    info!(
                        request_id = %request_id,
                        encoder = cmd.encoder,
                        app = %app,
                        percent,
                        "Volume adjusted"
                    );

                    let frame = device_command::volume_reply(cmd.encoder, percent);
                    if let Err(e) = serial.lock().await.send(&frame) {
                        // A dropped reply desynchronizes the device display;
                        // surface it instead of swallowing.
                        status.report(format!(
                            "Failed to send volume reply for encoder {}: {e}",
                            cmd.encoder
                        ));
                    }
                }
                VolumeAdjustment::NoSession => {
                    debug!(request_id = %request_id, encoder = cmd.encoder, app = %app, "No audio session");
                    status.report(format!("No audio session for {app}"));
                }
            }
        }))
    }

    /// Handle a macro command key.
    async fn dispatch_macro(&self, command: &str) {
        let action = self.registry.lock().await.get(command).cloned();

        let Some(action) = action else {
            debug!(command, "No macro assigned");
            self.status.report("No macro assigned for this command");
            return;
        };

        let executor = Arc::clone(&self.executor);
        let injected = {
            let action = action.clone();
            tokio::task::spawn_blocking(move || executor.execute(&action)).await
        };

        match injected {
            Ok(Ok(())) => self.status.report(format!(
                "Executed {} macro for {command}: {}",
                action.kind, action.value
            )),
            Ok(Err(e)) => self.status.report(format!("Macro for {command} failed: {e}")),
            Err(e) => error!(command, error = ?e, "Macro execution task panicked"),
        }
    }
}
