//! Room codes.
//!
//! A room is named by six characters from an alphabet without look-alikes
//! (no `0`/`O` or `1`/`I`). The code maps to a transport address with a
//! fixed prefix, so every participant derives the same address from it.

use serde::{Deserialize, Serialize};

use super::protocol::ProtocolError;
use crate::core::RandomSource;

/// Characters a room code may contain.
pub const ROOM_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of every room code.
pub const ROOM_CODE_LEN: usize = 6;

const ADDRESS_PREFIX: &str = "primeval-room-";

/// A validated six-character room code.
///
/// ```
/// use primeval::sync::RoomCode;
///
/// let code = RoomCode::parse("abc234").unwrap();
/// assert_eq!(code.as_str(), "ABC234");
/// assert_eq!(code.transport_address(), "primeval-room-abc234");
/// assert!(RoomCode::parse("ABC10").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Parse user input. Lowercase letters are accepted.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let code = text.trim().to_ascii_uppercase();
        if code.len() != ROOM_CODE_LEN {
            return Err(ProtocolError::RoomCode {
                code,
                reason: format!("must be {ROOM_CODE_LEN} characters"),
            });
        }
        if let Some(bad) = code.bytes().find(|b| !ROOM_ALPHABET.contains(b)) {
            return Err(ProtocolError::RoomCode {
                reason: format!("'{}' is not allowed", bad as char),
                code,
            });
        }
        Ok(Self(code))
    }

    /// Draw a fresh code.
    pub fn generate(rng: &mut dyn RandomSource) -> Self {
        let code = (0..ROOM_CODE_LEN)
            .map(|_| {
                let i = rng.pick_index(ROOM_ALPHABET.len()).unwrap_or(0);
                ROOM_ALPHABET[i] as char
            })
            .collect();
        Self(code)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Address the transport uses for this room.
    #[must_use]
    pub fn transport_address(&self) -> String {
        format!("{ADDRESS_PREFIX}{}", self.0.to_ascii_lowercase())
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RoomCode {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, ScriptedRng};

    #[test]
    fn test_parse_normalizes_case() {
        let code = RoomCode::parse(" hjk789 ").unwrap();
        assert_eq!(code.as_str(), "HJK789");
    }

    #[test]
    fn test_parse_rejects_bad_codes() {
        assert!(matches!(
            RoomCode::parse("ABCDE"),
            Err(ProtocolError::RoomCode { .. })
        ));
        // O and 0 are excluded.
        assert!(RoomCode::parse("ABCDE0").is_err());
        assert!(RoomCode::parse("ABCDEO").is_err());
        assert!(RoomCode::parse("ABCDÉ2").is_err());
    }

    #[test]
    fn test_generate() {
        let code = RoomCode::generate(&mut ScriptedRng::new().pick(0).pick(1).pick(31));
        assert_eq!(code.as_str(), "AB9AAA");

        let code = RoomCode::generate(&mut GameRng::new(9));
        assert!(RoomCode::parse(code.as_str()).is_ok());
    }

    #[test]
    fn test_address_is_deterministic() {
        let a = RoomCode::parse("XYZ234").unwrap();
        let b = RoomCode::parse("xyz234").unwrap();
        assert_eq!(a.transport_address(), b.transport_address());
    }

    #[test]
    fn test_serde_validates() {
        let code: RoomCode = serde_json::from_str(r#""PQR567""#).unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), r#""PQR567""#);
        assert!(serde_json::from_str::<RoomCode>(r#""bad""#).is_err());
    }
}
