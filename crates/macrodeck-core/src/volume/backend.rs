//! OS audio-session access behind a trait seam.
//!
//! The Windows implementation walks the WASAPI session enumerator on the
//! default render endpoint. Other platforms report no sessions — per-process
//! playback volume is a WASAPI concept; tests exercise the controller
//! through an in-memory backend instead.

/// Read/write access to per-process audio sessions.
///
/// When several sessions share a process name, the first one encountered
/// wins — both accessors must walk sessions in the same order.
pub trait AudioSessionBackend: Send + Sync {
    /// Process names currently holding an active audio session.
    /// May contain duplicates; callers deduplicate.
    fn active_process_names(&self) -> Vec<String>;

    /// Current volume (0.0–1.0) of the first session matching `process`,
    /// or `None` when no session matches.
    fn session_volume(&self, process: &str) -> Option<f32>;

    /// Set the volume (0.0–1.0) of the first session matching `process`.
    /// Returns `false` when no session matches.
    fn set_session_volume(&self, process: &str, level: f32) -> bool;
}

/// Backend for the platform this binary was built for.
pub(crate) fn platform_backend() -> Box<dyn AudioSessionBackend> {
    #[cfg(windows)]
    {
        Box::new(wasapi::WasapiSessions)
    }
    #[cfg(not(windows))]
    {
        Box::new(NoSessions)
    }
}

/// Fallback backend for platforms without per-process session control.
#[cfg(not(windows))]
struct NoSessions;

#[cfg(not(windows))]
impl AudioSessionBackend for NoSessions {
    fn active_process_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn session_volume(&self, _process: &str) -> Option<f32> {
        None
    }

    fn set_session_volume(&self, _process: &str, _level: f32) -> bool {
        false
    }
}

#[cfg(windows)]
mod wasapi {
    use super::AudioSessionBackend;

    use tracing::warn;
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::Media::Audio::{
        IAudioSessionControl2, IAudioSessionManager2, IMMDevice, IMMDeviceEnumerator,
        ISimpleAudioVolume, MMDeviceEnumerator, eMultimedia, eRender,
    };
    use windows::Win32::System::Com::{
        CLSCTX_ALL, COINIT_MULTITHREADED, CoCreateInstance, CoInitializeEx,
    };
    use windows::Win32::System::ProcessStatus::GetModuleBaseNameW;
    use windows::Win32::System::Threading::{
        OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ,
    };
    use windows::core::Interface;

    /// WASAPI session backend on the default render endpoint.
    pub(crate) struct WasapiSessions;

    fn session_manager() -> windows::core::Result<IAudioSessionManager2> {
        unsafe {
            let enumerator: IMMDeviceEnumerator =
                CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)?;
            let device: IMMDevice = enumerator.GetDefaultAudioEndpoint(eRender, eMultimedia)?;
            device.Activate(CLSCTX_ALL, None)
        }
    }

    fn process_name(pid: u32) -> String {
        unsafe {
            if let Ok(handle) = OpenProcess(PROCESS_QUERY_INFORMATION | PROCESS_VM_READ, false, pid)
            {
                let mut buffer = [0u16; 1024];
                let len = GetModuleBaseNameW(handle, None, &mut buffer);
                let _ = CloseHandle(handle);
                if len > 0 {
                    return String::from_utf16_lossy(&buffer[..len as usize]).to_lowercase();
                }
            }
        }
        String::new()
    }

    /// Walk active sessions in enumeration order, handing each process name
    /// and volume interface to `visit`. Stops early when `visit` returns
    /// `true` (first match wins).
    fn for_each_session(mut visit: impl FnMut(&str, &ISimpleAudioVolume) -> bool) {
        unsafe {
            let _ = CoInitializeEx(None, COINIT_MULTITHREADED);

            let Ok(manager) = session_manager() else {
                warn!("Failed to open WASAPI session manager");
                return;
            };
            let Ok(sessions) = manager.GetSessionEnumerator() else {
                return;
            };
            let Ok(count) = sessions.GetCount() else {
                return;
            };

            for i in 0..count {
                let Ok(session) = sessions.GetSession(i) else {
                    continue;
                };
                let Ok(control) = Interface::cast::<IAudioSessionControl2>(&session) else {
                    continue;
                };
                let Ok(pid) = control.GetProcessId() else {
                    continue;
                };
                if pid == 0 {
                    continue;
                }
                let name = process_name(pid);
                if name.is_empty() {
                    continue;
                }
                let Ok(volume) = Interface::cast::<ISimpleAudioVolume>(&session) else {
                    continue;
                };
                if visit(&name, &volume) {
                    return;
                }
            }
        }
    }

    impl AudioSessionBackend for WasapiSessions {
        fn active_process_names(&self) -> Vec<String> {
            let mut names = Vec::new();
            for_each_session(|name, _volume| {
                names.push(name.to_string());
                false
            });
            names
        }

        fn session_volume(&self, process: &str) -> Option<f32> {
            let target = process.to_lowercase();
            let mut found = None;
            for_each_session(|name, volume| {
                if name != target {
                    return false;
                }
                found = unsafe { volume.GetMasterVolume() }.ok();
                true
            });
            found
        }

        fn set_session_volume(&self, process: &str, level: f32) -> bool {
            let target = process.to_lowercase();
            let mut applied = false;
            for_each_session(|name, volume| {
                if name != target {
                    return false;
                }
                applied = unsafe { volume.SetMasterVolume(level, std::ptr::null()) }.is_ok();
                true
            });
            applied
        }
    }
}
