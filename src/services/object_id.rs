/*
 * Responsibility
 * - Document identifiers (12 bytes, exposed as 24 lowercase hex chars)
 * - Generation: 4-byte seconds timestamp + 5 process-random bytes + 3-byte counter
 * - Parsing/validation of ids supplied by clients (path / body)
 *
 * The error type stays local to this module, so it is written by hand
 * instead of with thiserror.
 */
use std::{
    error::Error,
    fmt,
    str::FromStr,
    sync::{
        LazyLock,
        atomic::{AtomicU32, Ordering},
    },
};

use serde::{Serialize, Serializer};
use uuid::Uuid;

pub const OBJECT_ID_LEN: usize = 12;
pub const OBJECT_ID_HEX_LEN: usize = OBJECT_ID_LEN * 2;

static PROCESS_UNIQUE: LazyLock<[u8; 5]> = LazyLock::new(|| {
    let seed = Uuid::new_v4();
    let mut out = [0u8; 5];
    out.copy_from_slice(&seed.as_bytes()[..5]);
    out
});

static COUNTER: LazyLock<AtomicU32> = LazyLock::new(|| {
    let seed = Uuid::new_v4();
    let b = seed.as_bytes();
    AtomicU32::new(u32::from_be_bytes([0, b[5], b[6], b[7]]))
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    InvalidLength { len: usize },
    InvalidCharacter,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdError::InvalidLength { len } => write!(
                f,
                "id must be {} hex characters, got {}",
                OBJECT_ID_HEX_LEN, len
            ),
            IdError::InvalidCharacter => write!(f, "id must contain only hex characters"),
        }
    }
}

impl Error for IdError {}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

impl ObjectId {
    /// Generate a fresh id. Ids generated later in time sort after earlier ones
    /// (second resolution), which gives collections a natural insertion order.
    pub fn new() -> Self {
        let now = chrono::Utc::now().timestamp();
        let secs = u32::try_from(now).unwrap_or(u32::MAX);
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;
        Self::from_parts(secs, *PROCESS_UNIQUE, count)
    }

    pub fn from_parts(secs: u32, random: [u8; 5], counter: u32) -> Self {
        let mut bytes = [0u8; OBJECT_ID_LEN];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&random);
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.len() != OBJECT_ID_HEX_LEN {
            return Err(IdError::InvalidLength { len: s.len() });
        }
        let mut bytes = [0u8; OBJECT_ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| IdError::InvalidCharacter)?;
        Ok(Self(bytes))
    }

    /// Seconds since the Unix epoch embedded at generation time.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ObjectId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_24_hex_chars_and_parse_back() {
        let id = ObjectId::new();
        let s = id.to_string();
        assert_eq!(s.len(), 24);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(ObjectId::parse(&s).unwrap(), id);
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn uppercase_hex_is_accepted_and_normalized() {
        let id = ObjectId::parse("65A1B2C3D4E5F60718293A4B").unwrap();
        assert_eq!(id.to_string(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert_eq!(
            ObjectId::parse("abc"),
            Err(IdError::InvalidLength { len: 3 })
        );
        assert!(ObjectId::parse("65a1b2c3d4e5f60718293a4b00").is_err());
    }

    #[test]
    fn non_hex_is_rejected() {
        assert_eq!(
            ObjectId::parse("zzzzzzzzzzzzzzzzzzzzzzzz"),
            Err(IdError::InvalidCharacter)
        );
    }

    #[test]
    fn timestamp_prefix_orders_ids() {
        let early = ObjectId::from_parts(1_000, [0; 5], 7);
        let late = ObjectId::from_parts(2_000, [0; 5], 0);
        assert!(early < late);
        assert_eq!(early.timestamp(), 1_000);
    }

    #[test]
    fn serializes_as_hex_string() {
        let id = ObjectId::from_parts(1, [0; 5], 2);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"000000010000000000000002\"");
    }
}
