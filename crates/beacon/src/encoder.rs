use tracing::debug;

use crate::error::Result;
use crate::identity::BeaconIdentity;
use crate::payload::{write_payload, PAYLOAD_HEX_LEN};
use crate::radio::{AdElementTag, RadioDriver};

/// Formats iBeacon payloads and hands them to a radio driver.
///
/// Each encoder owns its radio and a reusable output buffer. Calls take
/// `&mut self`, so sharing one encoder across threads needs external
/// synchronization; independent identities use independent encoders.
pub struct IBeaconEncoder<R> {
    radio: R,
    buf: String,
}

impl<R: RadioDriver> IBeaconEncoder<R> {
    pub fn new(radio: R) -> Self {
        Self {
            radio,
            buf: String::with_capacity(PAYLOAD_HEX_LEN),
        }
    }

    /// Build the payload and start broadcasting it immediately.
    ///
    /// Fails with `MalformedInput` if `uuid` is not 32 hex characters, in
    /// which case the radio is not called.
    pub fn encode_and_broadcast(
        &mut self,
        uuid: &str,
        major: u16,
        minor: u16,
        tx_power: i8,
    ) -> Result<()> {
        write_payload(&mut self.buf, uuid, major, minor, tx_power)?;
        debug!(major, minor, tx_power, payload = %self.buf, "Encoded iBeacon payload");

        self.radio
            .start_immediate_beacon(AdElementTag::ManufacturerSpecificData, &self.buf);
        Ok(())
    }

    pub fn begin(&mut self, uuid: &str, major: u16, minor: u16, tx_power: i8) -> Result<()> {
        self.encode_and_broadcast(uuid, major, minor, tx_power)
    }

    pub fn broadcast_identity(&mut self, identity: &BeaconIdentity) -> Result<()> {
        self.encode_and_broadcast(
            &identity.uuid,
            identity.major,
            identity.minor,
            identity.tx_power,
        )
    }

    /// The most recently built payload; empty before the first success.
    pub fn payload(&self) -> &str {
        &self.buf
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    pub fn into_radio(self) -> R {
        self.radio
    }
}
