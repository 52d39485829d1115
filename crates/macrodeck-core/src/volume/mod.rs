mod backend;
mod controller;

pub use {
    backend::AudioSessionBackend,
    controller::{VOLUME_STEP, VolumeAdjustment, VolumeController},
};

pub(crate) use backend::platform_backend;
