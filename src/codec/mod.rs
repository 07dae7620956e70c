//! Binary codecs for the WiFi Plaza lobby extension (spec §4.1).
//!
//! `dwc` implements the custom base64 dialect games use for GETCHANKEY/
//! SETCHANKEY/SETCKEY payloads. `records` implements the three fixed
//! little-endian binary records carried inside those payloads. `utm`
//! parses the opaque UTM envelope.

pub mod dwc;
pub mod records;
pub mod utm;

pub use dwc::{dwc_decode, dwc_encode};
pub use records::{LobbyStartTime, LobbyWorldData, PkWifiLobby, PlazaEvent, PlazaEventTimestamp};
pub use utm::UtmMessage;
