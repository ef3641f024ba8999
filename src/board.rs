use crate::config::SdPins;
use crate::volume::{HostVolume, MountConfig, Volume};
use std::path::PathBuf;

/// 板级外设: SPI 总线和 SD 卡挂载
///
/// `mount` has no failure path: a card that did not come up shows up as an
/// open failure on the first file access.
pub trait Board {
    type Volume: Volume;

    fn begin_bus(&mut self, pins: &SdPins);
    fn mount(&mut self, config: &MountConfig) -> Self::Volume;
}

/// Runs the benchmark against a directory on the build host.
#[derive(Debug)]
pub struct HostBoard {
    root: PathBuf,
    pins: Option<SdPins>,
}

impl HostBoard {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pins: None,
        }
    }
    pub fn pins(&self) -> Option<SdPins> {
        self.pins
    }
}

impl Board for HostBoard {
    type Volume = HostVolume;

    fn begin_bus(&mut self, pins: &SdPins) {
        log::debug!(
            "SPI bus: clk={} miso={} mosi={}",
            pins.clk,
            pins.miso,
            pins.mosi
        );
        self.pins = Some(*pins);
    }
    fn mount(&mut self, config: &MountConfig) -> HostVolume {
        log::debug!(
            "mount {} on {} (cs={}, {} Hz, max_files={})",
            config.mount_point,
            self.root.display(),
            config.cs_pin,
            config.frequency_hz,
            config.max_files
        );
        if config.fast_seek {
            log::info!("FAST_SEEK enabled");
        }
        HostVolume::new(self.root.clone(), config)
    }
}
