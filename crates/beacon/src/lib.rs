pub mod config;
pub mod encoder;
pub mod error;
pub mod identity;
pub mod payload;
pub mod radio;

pub use config::BeaconConfig;
pub use encoder::IBeaconEncoder;
pub use error::{BeaconError, ConfigError, Result};
pub use identity::BeaconIdentity;
pub use payload::{decode_payload, encode_payload, BeaconPayload};
pub use radio::{AdElementTag, BeaconBroadcast, ConsoleRadio, RadioDriver, RecordingRadio};
