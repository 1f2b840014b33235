use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::payload::{encode_payload, validate_uuid, BeaconPayload};

/// The four values a beacon advertises.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeaconIdentity {
    /// 32 hex characters, no dashes.
    pub uuid: String,
    pub major: u16,
    pub minor: u16,
    /// Calibrated RSSI at 1 m, in dBm.
    pub tx_power: i8,
}

impl BeaconIdentity {
    pub fn new(uuid: impl Into<String>, major: u16, minor: u16, tx_power: i8) -> Result<Self> {
        let uuid = uuid.into();
        validate_uuid(&uuid)?;
        Ok(Self {
            uuid: uuid.to_ascii_uppercase(),
            major,
            minor,
            tx_power,
        })
    }

    pub fn from_uuid(uuid: Uuid, major: u16, minor: u16, tx_power: i8) -> Self {
        Self {
            uuid: uuid.simple().to_string().to_ascii_uppercase(),
            major,
            minor,
            tx_power,
        }
    }

    pub fn payload(&self) -> Result<BeaconPayload> {
        encode_payload(&self.uuid, self.major, self.minor, self.tx_power)
    }
}

impl std::fmt::Display for BeaconIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} major={} minor={} tx_power={}dBm",
            self.uuid, self.major, self.minor, self.tx_power
        )
    }
}
