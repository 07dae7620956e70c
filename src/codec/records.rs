//! Fixed little-endian binary records carried inside lobby extension
//! payloads (spec §3 "Lobby records", §4.1).

use crate::error::FormatError;

/// Seconds since the Nintendo epoch (2000-01-01 00:00:00 UTC).
pub const NINTENDO_EPOCH_UNIX_SECONDS: i64 = 946_684_800;

/// `u64 seconds_since_nintendo_epoch`, 8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LobbyStartTime {
    pub timestamp: u64,
}

impl LobbyStartTime {
    pub fn from_serialized(buffer: &[u8]) -> Result<Self, FormatError> {
        if buffer.len() != 8 {
            return Err(expect_len(8, buffer.len()));
        }
        let mut raw = [0u8; 8];
        raw.copy_from_slice(buffer);
        Ok(Self {
            timestamp: u64::from_le_bytes(raw),
        })
    }

    pub fn to_serialized(self) -> Vec<u8> {
        self.timestamp.to_le_bytes().to_vec()
    }
}

/// `u16 nation | u8 area | u8 flag`, 4 bytes.
///
/// Nation/area/flag are not validated: the original game accepts any
/// values here and nothing downstream interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LobbyWorldData {
    pub nation: u16,
    pub area: u8,
    pub flag: u8,
}

impl LobbyWorldData {
    pub fn from_serialized(buffer: &[u8]) -> Result<Self, FormatError> {
        if buffer.len() != 4 {
            return Err(expect_len(4, buffer.len()));
        }
        let nation = u16::from_le_bytes([buffer[0], buffer[1]]);
        Ok(Self {
            nation,
            area: buffer[2],
            flag: buffer[3],
        })
    }

    pub fn to_serialized(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4);
        out.extend_from_slice(&self.nation.to_le_bytes());
        out.push(self.area);
        out.push(self.flag);
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PlazaRoomType {
    Fire = 0,
    Water = 1,
    Electric = 2,
    Grass = 3,
    Mew = 4,
}

impl PlazaRoomType {
    fn from_u8(value: u8) -> Result<Self, FormatError> {
        match value {
            0 => Ok(Self::Fire),
            1 => Ok(Self::Water),
            2 => Ok(Self::Electric),
            3 => Ok(Self::Grass),
            4 => Ok(Self::Mew),
            other => Err(FormatError::UnknownRoomType(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PlazaRoomSeason {
    None = 0,
    Spring = 1,
    Summer = 2,
    Fall = 3,
    Winter = 4,
}

impl PlazaRoomSeason {
    fn from_u8(value: u8) -> Result<Self, FormatError> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Spring),
            2 => Ok(Self::Summer),
            3 => Ok(Self::Fall),
            4 => Ok(Self::Winter),
            other => Err(FormatError::UnknownSeason(other)),
        }
    }
}

/// Plaza event kinds, 0..=19 (glossary "Plaza event kinds").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PlazaEvent {
    LockRoom = 0,
    OverheadLightingBase = 1,
    OverheadEndingPhaseOne = 2,
    OverheadEndingPhaseTwo = 3,
    OverheadEndingPhaseThree = 4,
    OverheadEndingPhaseFour = 5,
    OverheadEndingPhaseFive = 6,
    StatueLightingBase = 7,
    StatueEndingPhaseOne = 8,
    StatueEndingPhaseTwo = 9,
    StatueEndingPhaseThree = 10,
    SpotlightLightingBase = 11,
    SpotlightEndingPhaseOne = 12,
    SpotlightEndingPhaseTwo = 13,
    SpotlightEndingPhaseThree = 14,
    EndAllMinigames = 15,
    StartFireworks = 16,
    EndFireworks = 17,
    CreateParade = 18,
    ClosePlaza = 19,
}

impl PlazaEvent {
    fn from_i32(value: i32) -> Result<Self, FormatError> {
        use PlazaEvent::*;
        Ok(match value {
            0 => LockRoom,
            1 => OverheadLightingBase,
            2 => OverheadEndingPhaseOne,
            3 => OverheadEndingPhaseTwo,
            4 => OverheadEndingPhaseThree,
            5 => OverheadEndingPhaseFour,
            6 => OverheadEndingPhaseFive,
            7 => StatueLightingBase,
            8 => StatueEndingPhaseOne,
            9 => StatueEndingPhaseTwo,
            10 => StatueEndingPhaseThree,
            11 => SpotlightLightingBase,
            12 => SpotlightEndingPhaseOne,
            13 => SpotlightEndingPhaseTwo,
            14 => SpotlightEndingPhaseThree,
            15 => EndAllMinigames,
            16 => StartFireworks,
            17 => EndFireworks,
            18 => CreateParade,
            19 => ClosePlaza,
            other => return Err(FormatError::UnknownEventKind(other)),
        })
    }
}

/// `i32 at_seconds | i32 event_kind`, 8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlazaEventTimestamp {
    pub at_seconds: i32,
    pub event: PlazaEvent,
}

impl PlazaEventTimestamp {
    fn from_serialized(buffer: &[u8]) -> Result<Self, FormatError> {
        if buffer.len() != 8 {
            return Err(expect_len(8, buffer.len()));
        }
        let at_seconds = i32::from_le_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]);
        let kind = i32::from_le_bytes([buffer[4], buffer[5], buffer[6], buffer[7]]);
        Ok(Self {
            at_seconds,
            event: PlazaEvent::from_i32(kind)?,
        })
    }

    fn to_serialized(self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[0..4].copy_from_slice(&self.at_seconds.to_le_bytes());
        out[4..8].copy_from_slice(&(self.event as i32).to_le_bytes());
        out
    }
}

/// `u32 lock_after_seconds | u32 unk | u32 arceus_bitflags | u8 room_type |
/// u8 season | u16 event_count` followed by `event_count` event records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkWifiLobby {
    pub lock_after_seconds: u32,
    pub unk: u32,
    pub arceus_bitflags: u32,
    pub room_type: PlazaRoomType,
    pub season: PlazaRoomSeason,
    pub events: Vec<PlazaEventTimestamp>,
}

const HEADER_LEN: usize = 16;

impl PkWifiLobby {
    pub fn from_serialized(buffer: &[u8]) -> Result<Self, FormatError> {
        if buffer.len() < HEADER_LEN {
            return Err(expect_len(HEADER_LEN, buffer.len()));
        }
        let lock_after_seconds = read_u32(&buffer[0..4]);
        let unk = read_u32(&buffer[4..8]);
        let arceus_bitflags = read_u32(&buffer[8..12]);
        let room_type = PlazaRoomType::from_u8(buffer[12])?;
        let season = PlazaRoomSeason::from_u8(buffer[13])?;
        let event_count = u16::from_le_bytes([buffer[14], buffer[15]]) as usize;

        let mut events = Vec::with_capacity(event_count);
        let mut offset = HEADER_LEN;
        for _ in 0..event_count {
            let end = offset + 8;
            let chunk = buffer
                .get(offset..end)
                .ok_or(FormatError::TooShort {
                    expected: end,
                    actual: buffer.len(),
                })?;
            events.push(PlazaEventTimestamp::from_serialized(chunk)?);
            offset = end;
        }

        if offset != buffer.len() {
            return Err(FormatError::TrailingBytes {
                consumed: offset,
                total: buffer.len(),
            });
        }

        Ok(Self {
            lock_after_seconds,
            unk,
            arceus_bitflags,
            room_type,
            season,
            events,
        })
    }

    pub fn to_serialized(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.events.len() * 8);
        out.extend_from_slice(&self.lock_after_seconds.to_le_bytes());
        out.extend_from_slice(&self.unk.to_le_bytes());
        out.extend_from_slice(&self.arceus_bitflags.to_le_bytes());
        out.push(self.room_type as u8);
        out.push(self.season as u8);
        out.extend_from_slice(&(self.events.len() as u16).to_le_bytes());
        for event in &self.events {
            out.extend_from_slice(&event.to_serialized());
        }
        out
    }
}

fn read_u32(buffer: &[u8]) -> u32 {
    u32::from_le_bytes([buffer[0], buffer[1], buffer[2], buffer[3]])
}

fn expect_len(expected: usize, actual: usize) -> FormatError {
    FormatError::TooShort { expected, actual }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lobby_start_time_roundtrip() {
        let x = LobbyStartTime { timestamp: 560_470_305 };
        assert_eq!(LobbyStartTime::from_serialized(&x.to_serialized()).unwrap(), x);
    }

    #[test]
    fn world_data_roundtrip() {
        let x = LobbyWorldData { nation: 1, area: 2, flag: 3 };
        assert_eq!(LobbyWorldData::from_serialized(&x.to_serialized()).unwrap(), x);
    }

    #[test]
    fn pk_wifi_lobby_roundtrip() {
        let lobby = PkWifiLobby {
            lock_after_seconds: 1200,
            unk: 0,
            arceus_bitflags: 1,
            room_type: PlazaRoomType::Mew,
            season: PlazaRoomSeason::Winter,
            events: vec![
                PlazaEventTimestamp { at_seconds: 0, event: PlazaEvent::OverheadLightingBase },
                PlazaEventTimestamp { at_seconds: 1200, event: PlazaEvent::ClosePlaza },
            ],
        };
        let serialized = lobby.to_serialized();
        assert_eq!(PkWifiLobby::from_serialized(&serialized).unwrap(), lobby);
    }

    #[test]
    fn pk_wifi_lobby_rejects_trailing_bytes() {
        let lobby = PkWifiLobby {
            lock_after_seconds: 0,
            unk: 0,
            arceus_bitflags: 0,
            room_type: PlazaRoomType::Fire,
            season: PlazaRoomSeason::None,
            events: vec![],
        };
        let mut serialized = lobby.to_serialized();
        serialized.push(0xFF);
        assert!(matches!(
            PkWifiLobby::from_serialized(&serialized),
            Err(FormatError::TrailingBytes { .. })
        ));
    }

    #[test]
    fn pk_wifi_lobby_rejects_unknown_room_type() {
        let mut buf = vec![0u8; 16];
        buf[12] = 0xFF;
        assert!(matches!(
            PkWifiLobby::from_serialized(&buf),
            Err(FormatError::UnknownRoomType(0xFF))
        ));
    }

    proptest! {
        #[test]
        fn lobby_start_time_prop_roundtrip(timestamp: u64) {
            let x = LobbyStartTime { timestamp };
            prop_assert_eq!(LobbyStartTime::from_serialized(&x.to_serialized()).unwrap(), x);
        }
    }
}
