//! iBeacon manufacturer-specific advertising data, rendered as hex ASCII.
//!
//! Layout (25 bytes, 50 hex characters):
//!
//! ```text
//! 4C 00 | 02 | 15 | UUID (16 bytes) | MAJOR (2, BE) | MINOR (2, BE) | TX POWER (1)
//! ```
//!
//! The company identifier is sent little-endian, so Apple's `0x004C` shows up
//! as `4C00`. Major and minor are big-endian; tx power is the two's-complement
//! byte of the calibrated RSSI at one meter.

use std::fmt::{self, Write};
use std::str::FromStr;

use tracing::debug;

use crate::error::{BeaconError, Result};
use crate::identity::BeaconIdentity;

/// Apple's Bluetooth SIG company identifier.
pub const COMPANY_ID: u16 = 0x004C;

/// iBeacon type byte.
pub const BEACON_TYPE: u8 = 0x02;

/// Number of bytes following the length byte (UUID + major + minor + tx power).
pub const BEACON_LENGTH: u8 = 0x15;

/// `COMPANY_ID` (LE), `BEACON_TYPE`, `BEACON_LENGTH` as hex ASCII.
pub const PREFIX: &str = "4C000215";

pub const UUID_HEX_LEN: usize = 32;
pub const MAJOR_HEX_LEN: usize = 4;
pub const MINOR_HEX_LEN: usize = 4;
pub const TX_POWER_HEX_LEN: usize = 2;

pub const PAYLOAD_HEX_LEN: usize =
    PREFIX.len() + UUID_HEX_LEN + MAJOR_HEX_LEN + MINOR_HEX_LEN + TX_POWER_HEX_LEN;

/// Checks the 32-hex-digit UUID contract.
pub fn validate_uuid(uuid: &str) -> Result<()> {
    if uuid.len() != UUID_HEX_LEN {
        return Err(BeaconError::MalformedInput(format!(
            "uuid must be {} hex characters, got {}",
            UUID_HEX_LEN,
            uuid.len()
        )));
    }
    if let Some(bad) = uuid.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(BeaconError::MalformedInput(format!(
            "uuid contains non-hex character {:?}",
            bad
        )));
    }
    Ok(())
}

/// Builds the payload into `buf`, replacing whatever it held.
///
/// Validation runs first; on error `buf` is left untouched.
pub(crate) fn write_payload(
    buf: &mut String,
    uuid: &str,
    major: u16,
    minor: u16,
    tx_power: i8,
) -> Result<()> {
    validate_uuid(uuid)?;

    buf.clear();
    buf.push_str(PREFIX);
    buf.extend(uuid.chars().map(|c| c.to_ascii_uppercase()));
    // Writing to a String cannot fail.
    let _ = write!(buf, "{:04X}{:04X}{:02X}", major, minor, tx_power as u8);

    debug_assert_eq!(buf.len(), PAYLOAD_HEX_LEN);
    Ok(())
}

/// Pure form of the encoder: no buffer reuse, no radio.
pub fn encode_payload(uuid: &str, major: u16, minor: u16, tx_power: i8) -> Result<BeaconPayload> {
    let mut buf = String::with_capacity(PAYLOAD_HEX_LEN);
    write_payload(&mut buf, uuid, major, minor, tx_power)?;
    Ok(BeaconPayload(buf))
}

/// Parses a 50-character payload back into its fields.
pub fn decode_payload(payload: &str) -> Result<BeaconIdentity> {
    Ok(payload.parse::<BeaconPayload>()?.identity())
}

/// A complete, well-formed iBeacon payload in upper-case hex ASCII.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BeaconPayload(String);

impl BeaconPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Raw advertisement bytes, for adapters that take binary AD data.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0
            .as_bytes()
            .chunks(2)
            .filter_map(hex_byte)
            .collect()
    }

    pub fn uuid(&self) -> &str {
        let start = PREFIX.len();
        &self.0[start..start + UUID_HEX_LEN]
    }

    pub fn major(&self) -> u16 {
        let start = PREFIX.len() + UUID_HEX_LEN;
        self.field_u16(start)
    }

    pub fn minor(&self) -> u16 {
        let start = PREFIX.len() + UUID_HEX_LEN + MAJOR_HEX_LEN;
        self.field_u16(start)
    }

    pub fn tx_power(&self) -> i8 {
        let start = PAYLOAD_HEX_LEN - TX_POWER_HEX_LEN;
        hex_byte(&self.0.as_bytes()[start..]).unwrap_or_default() as i8
    }

    pub fn identity(&self) -> BeaconIdentity {
        BeaconIdentity {
            uuid: self.uuid().to_string(),
            major: self.major(),
            minor: self.minor(),
            tx_power: self.tx_power(),
        }
    }

    fn field_u16(&self, start: usize) -> u16 {
        u16::from_str_radix(&self.0[start..start + 4], 16).unwrap_or_default()
    }
}

impl FromStr for BeaconPayload {
    type Err = BeaconError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != PAYLOAD_HEX_LEN {
            return Err(BeaconError::MalformedInput(format!(
                "payload must be {} hex characters, got {}",
                PAYLOAD_HEX_LEN,
                s.len()
            )));
        }
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(BeaconError::MalformedInput(
                "payload contains non-hex characters".into(),
            ));
        }

        let normalized = s.to_ascii_uppercase();
        if !normalized.starts_with(PREFIX) {
            return Err(BeaconError::MalformedInput(format!(
                "payload does not start with iBeacon prefix {}",
                PREFIX
            )));
        }

        debug!(payload = %normalized, "Decoded iBeacon payload");
        Ok(Self(normalized))
    }
}

impl fmt::Display for BeaconPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BeaconPayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn hex_byte(pair: &[u8]) -> Option<u8> {
    let s = std::str::from_utf8(pair).ok()?;
    u8::from_str_radix(s, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const UUID: &str = "E2C56DB5DFFB48D2B060D0F5A71096E0";

    #[test]
    fn test_prefix_matches_constants() {
        let [lo, hi] = COMPANY_ID.to_le_bytes();
        let expected = format!("{:02X}{:02X}{:02X}{:02X}", lo, hi, BEACON_TYPE, BEACON_LENGTH);
        assert_eq!(PREFIX, expected);
        assert_eq!(PAYLOAD_HEX_LEN, 50);
    }

    #[test]
    fn test_reference_payload() {
        let payload = encode_payload(UUID, 1, 1, -59).unwrap();
        assert_eq!(
            payload.as_str(),
            "4C000215E2C56DB5DFFB48D2B060D0F5A71096E000010001C5"
        );
        assert_eq!(payload.len(), PAYLOAD_HEX_LEN);
    }

    #[test]
    fn test_major_minor_zero_padding() {
        let payload = encode_payload(UUID, 5, 65535, 0).unwrap();
        assert_eq!(&payload.as_str()[40..44], "0005");
        assert_eq!(&payload.as_str()[44..48], "FFFF");

        let payload = encode_payload(UUID, 0, 0, 0).unwrap();
        assert_eq!(&payload.as_str()[40..48], "00000000");
    }

    #[test]
    fn test_tx_power_twos_complement() {
        let cases = [(-1i8, "FF"), (0, "00"), (127, "7F"), (-128, "80"), (-59, "C5")];
        for (tx_power, expected) in cases {
            let payload = encode_payload(UUID, 1, 1, tx_power).unwrap();
            assert_eq!(&payload.as_str()[48..], expected, "tx_power {}", tx_power);
        }
    }

    #[test]
    fn test_uuid_length_rejected() {
        let short = &UUID[..30];
        let long = format!("{}AB", UUID);

        assert!(matches!(
            encode_payload(short, 1, 1, -59),
            Err(BeaconError::MalformedInput(_))
        ));
        assert!(matches!(
            encode_payload(&long, 1, 1, -59),
            Err(BeaconError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_uuid_charset_rejected() {
        let dashed = "E2C56DB5-DFFB-48D2-B060-D0F5A71096E0";
        assert!(encode_payload(dashed, 1, 1, 0).is_err());

        let non_hex = "G2C56DB5DFFB48D2B060D0F5A71096E0";
        assert!(encode_payload(non_hex, 1, 1, 0).is_err());
    }

    #[test]
    fn test_lowercase_uuid_normalized() {
        let payload = encode_payload(&UUID.to_lowercase(), 1, 1, -59).unwrap();
        assert_eq!(payload.uuid(), UUID);
    }

    #[test]
    fn test_write_payload_reuses_buffer() {
        let mut buf = String::with_capacity(PAYLOAD_HEX_LEN);
        write_payload(&mut buf, UUID, 0xFFFF, 0xFFFF, -1).unwrap();
        let ptr = buf.as_ptr();

        write_payload(&mut buf, UUID, 1, 1, -59).unwrap();
        assert_eq!(buf, "4C000215E2C56DB5DFFB48D2B060D0F5A71096E000010001C5");
        assert_eq!(buf.as_ptr(), ptr);
    }

    #[test]
    fn test_to_bytes() {
        let bytes = encode_payload(UUID, 0x0102, 0xA0B0, -59).unwrap().to_bytes();
        assert_eq!(bytes.len(), 25);
        assert_eq!(&bytes[..4], &[0x4C, 0x00, 0x02, 0x15]);
        assert_eq!(bytes[4], 0xE2);
        assert_eq!(&bytes[20..], &[0x01, 0x02, 0xA0, 0xB0, 0xC5]);
    }

    #[test]
    fn test_decode_reference_payload() {
        let identity = decode_payload("4C000215E2C56DB5DFFB48D2B060D0F5A71096E000010001C5").unwrap();
        assert_eq!(identity.uuid, UUID);
        assert_eq!(identity.major, 1);
        assert_eq!(identity.minor, 1);
        assert_eq!(identity.tx_power, -59);
    }

    #[test]
    fn test_decode_rejects_bad_payloads() {
        // wrong prefix
        assert!(decode_payload("FFFF0215E2C56DB5DFFB48D2B060D0F5A71096E000010001C5").is_err());
        // truncated
        assert!(decode_payload("4C000215E2C56DB5DFFB48D2B060D0F5A71096E000010001").is_err());
        // non-hex
        assert!(decode_payload("4C000215E2C56DB5DFFB48D2B060D0F5A71096E00001000ZC5").is_err());
    }
}
