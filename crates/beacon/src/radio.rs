//! The radio module seam.
//!
//! The BLE module driver (its transport, advertising state machine and
//! timing) lives outside this crate. All the encoder needs from it is a way
//! to start advertising a manufacturer-specific payload right away.

use tracing::{debug, info};

/// AD structure type of a beacon payload, with its assigned-number code.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdElementTag {
    ManufacturerSpecificData = 0xFF,
}

impl AdElementTag {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for AdElementTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02X}", self.code())
    }
}

pub trait RadioDriver {
    /// Begin advertising `payload` (hex ASCII) as an AD element of type `tag`.
    ///
    /// Fire-and-forget: timing, interval and radio state belong to the driver.
    fn start_immediate_beacon(&mut self, tag: AdElementTag, payload: &str);
}

impl<R: RadioDriver + ?Sized> RadioDriver for Box<R> {
    fn start_immediate_beacon(&mut self, tag: AdElementTag, payload: &str) {
        (**self).start_immediate_beacon(tag, payload)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconBroadcast {
    pub tag: AdElementTag,
    pub payload: String,
}

/// Stand-in driver that records every broadcast instead of touching hardware.
#[derive(Debug, Default)]
pub struct RecordingRadio {
    broadcasts: Vec<BeaconBroadcast>,
}

impl RecordingRadio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn broadcast_count(&self) -> usize {
        self.broadcasts.len()
    }

    pub fn broadcasts(&self) -> &[BeaconBroadcast] {
        &self.broadcasts
    }

    pub fn last(&self) -> Option<&BeaconBroadcast> {
        self.broadcasts.last()
    }
}

impl RadioDriver for RecordingRadio {
    fn start_immediate_beacon(&mut self, tag: AdElementTag, payload: &str) {
        debug!(%tag, payload, "RecordingRadio: beacon started");
        self.broadcasts.push(BeaconBroadcast {
            tag,
            payload: payload.to_string(),
        });
    }
}

/// Driver for hosts without a radio module: logs and prints what would go on air.
pub struct ConsoleRadio {
    name: String,
    advertising: Option<String>,
}

impl ConsoleRadio {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            advertising: None,
        }
    }

    pub fn advertising(&self) -> Option<&str> {
        self.advertising.as_deref()
    }

    pub fn stop(&mut self) {
        if let Some(payload) = self.advertising.take() {
            info!(radio = %self.name, payload = %payload, "Beacon stopped");
        }
    }
}

impl RadioDriver for ConsoleRadio {
    fn start_immediate_beacon(&mut self, tag: AdElementTag, payload: &str) {
        info!(
            radio = %self.name,
            ad_type = %tag,
            bytes = payload.len() / 2,
            "Beacon started"
        );
        println!("[{}] AD {} | {}", self.name, tag, payload);
        self.advertising = Some(payload.to_string());
    }
}
