//! Cluster health wire record.
//!
//! A flat, big-endian record with a fixed field order:
//!
//! | field                   | encoding                          |
//! |-------------------------|-----------------------------------|
//! | cluster name            | u16 byte length + UTF-8           |
//! | active primary shards   | i32                               |
//! | active shards           | i32                               |
//! | relocating shards       | i32                               |
//! | status                  | u8 (`Red=0`, `Yellow=1`, `Green=2`) |
//! | index record count      | i32, followed by the index records |
//! | timed out               | u8 (0 or 1)                       |
//!
//! Each index record is its index name (u16 length + UTF-8), number of shards,
//! number of replicas, active primary shards, active shards, relocating shards
//! (all i32) and its status byte.
//!
//! [`ClusterHealthResponse::write_to`] and [`ClusterHealthResponse::read_from`] are
//! exact inverses.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured errors from encoding or decoding a health record.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HealthError {
    /// The input ended before the record was complete
    #[error("Truncated health record: needed {needed} more bytes while reading {field}")]
    Truncated { field: &'static str, needed: usize },

    /// The status byte is not a known status
    #[error("Unknown cluster health status value: {value}")]
    UnknownStatus { value: u8 },

    /// A string field is not valid UTF-8
    #[error("Invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    /// A string field is too long for its u16 length prefix
    #[error("{field} is {len} bytes, longer than the {max} byte limit")]
    StringTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// The index record count is negative
    #[error("Invalid index record count: {count}")]
    InvalidCount { count: i32 },

    /// Bytes were left over after a complete record
    #[error("{remaining} trailing bytes after health record")]
    TrailingBytes { remaining: usize },
}

impl HealthError {
    /// Check if the input simply ended early.
    pub fn is_truncated(&self) -> bool {
        matches!(self, HealthError::Truncated { .. })
    }
}

impl From<HealthError> for crate::Error {
    fn from(err: HealthError) -> Self {
        crate::Error::Health(err)
    }
}

/// Overall health of a cluster or index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterHealthStatus {
    #[default]
    Red,
    Yellow,
    Green,
}

impl ClusterHealthStatus {
    /// The wire value.
    pub fn value(&self) -> u8 {
        match self {
            ClusterHealthStatus::Red => 0,
            ClusterHealthStatus::Yellow => 1,
            ClusterHealthStatus::Green => 2,
        }
    }

    pub fn from_value(value: u8) -> Result<Self, HealthError> {
        match value {
            0 => Ok(ClusterHealthStatus::Red),
            1 => Ok(ClusterHealthStatus::Yellow),
            2 => Ok(ClusterHealthStatus::Green),
            value => Err(HealthError::UnknownStatus { value }),
        }
    }
}

/// Health of a single index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterIndexHealth {
    pub index: String,
    pub number_of_shards: i32,
    pub number_of_replicas: i32,
    pub active_primary_shards: i32,
    pub active_shards: i32,
    pub relocating_shards: i32,
    pub status: ClusterHealthStatus,
}

impl ClusterIndexHealth {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            number_of_shards: 0,
            number_of_replicas: 0,
            active_primary_shards: 0,
            active_shards: 0,
            relocating_shards: 0,
            status: ClusterHealthStatus::Red,
        }
    }

    pub fn write_to(&self, out: &mut impl BufMut) -> Result<(), HealthError> {
        put_string(out, "index name", &self.index)?;
        out.put_i32(self.number_of_shards);
        out.put_i32(self.number_of_replicas);
        out.put_i32(self.active_primary_shards);
        out.put_i32(self.active_shards);
        out.put_i32(self.relocating_shards);
        out.put_u8(self.status.value());
        Ok(())
    }

    pub fn read_from(input: &mut impl Buf) -> Result<Self, HealthError> {
        Ok(Self {
            index: get_string(input, "index name")?,
            number_of_shards: get_i32(input, "number of shards")?,
            number_of_replicas: get_i32(input, "number of replicas")?,
            active_primary_shards: get_i32(input, "index active primary shards")?,
            active_shards: get_i32(input, "index active shards")?,
            relocating_shards: get_i32(input, "index relocating shards")?,
            status: ClusterHealthStatus::from_value(get_u8(input, "index status")?)?,
        })
    }
}

/// Health of a whole cluster, with per-index detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterHealthResponse {
    pub cluster_name: String,
    pub active_primary_shards: i32,
    pub active_shards: i32,
    pub relocating_shards: i32,
    pub status: ClusterHealthStatus,
    #[serde(default)]
    pub indices: IndexMap<String, ClusterIndexHealth>,
    /// Whether a wait for a target status gave up before it was reached.
    #[serde(default)]
    pub timed_out: bool,
}

impl ClusterHealthResponse {
    pub fn new(cluster_name: impl Into<String>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            active_primary_shards: 0,
            active_shards: 0,
            relocating_shards: 0,
            status: ClusterHealthStatus::Red,
            indices: IndexMap::new(),
            timed_out: false,
        }
    }

    /// Adds or replaces the health of one index.
    pub fn add_index(&mut self, index: ClusterIndexHealth) -> &mut Self {
        self.indices.insert(index.index.clone(), index);
        self
    }

    pub fn index(&self, name: &str) -> Option<&ClusterIndexHealth> {
        self.indices.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClusterIndexHealth> {
        self.indices.values()
    }

    pub fn write_to(&self, out: &mut impl BufMut) -> Result<(), HealthError> {
        put_string(out, "cluster name", &self.cluster_name)?;
        out.put_i32(self.active_primary_shards);
        out.put_i32(self.active_shards);
        out.put_i32(self.relocating_shards);
        out.put_u8(self.status.value());
        let count = i32::try_from(self.indices.len()).map_err(|_| HealthError::InvalidCount {
            count: i32::MAX,
        })?;
        out.put_i32(count);
        for index in self.indices.values() {
            index.write_to(out)?;
        }
        out.put_u8(u8::from(self.timed_out));
        Ok(())
    }

    /// Reads one record. Index records sharing a name keep the last one read.
    pub fn read_from(input: &mut impl Buf) -> Result<Self, HealthError> {
        let cluster_name = get_string(input, "cluster name")?;
        let active_primary_shards = get_i32(input, "active primary shards")?;
        let active_shards = get_i32(input, "active shards")?;
        let relocating_shards = get_i32(input, "relocating shards")?;
        let status = ClusterHealthStatus::from_value(get_u8(input, "status")?)?;

        let count = get_i32(input, "index record count")?;
        let count = usize::try_from(count).map_err(|_| HealthError::InvalidCount { count })?;
        let mut indices = IndexMap::new();
        for _ in 0..count {
            let index = ClusterIndexHealth::read_from(input)?;
            indices.insert(index.index.clone(), index);
        }
        let timed_out = get_u8(input, "timed out flag")? != 0;

        Ok(Self {
            cluster_name,
            active_primary_shards,
            active_shards,
            relocating_shards,
            status,
            indices,
            timed_out,
        })
    }

    pub fn to_bytes(&self) -> Result<Bytes, HealthError> {
        let mut out = BytesMut::new();
        self.write_to(&mut out)?;
        Ok(out.freeze())
    }

    /// Decodes a buffer holding exactly one record.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HealthError> {
        let mut input = bytes;
        let response = Self::read_from(&mut input)?;
        if input.has_remaining() {
            return Err(HealthError::TrailingBytes {
                remaining: input.remaining(),
            });
        }
        Ok(response)
    }
}

fn ensure(remaining: usize, field: &'static str, len: usize) -> Result<(), HealthError> {
    if remaining < len {
        return Err(HealthError::Truncated {
            field,
            needed: len - remaining,
        });
    }
    Ok(())
}

fn get_u8(input: &mut impl Buf, field: &'static str) -> Result<u8, HealthError> {
    ensure(input.remaining(), field, 1)?;
    Ok(input.get_u8())
}

fn get_i32(input: &mut impl Buf, field: &'static str) -> Result<i32, HealthError> {
    ensure(input.remaining(), field, 4)?;
    Ok(input.get_i32())
}

fn get_string(input: &mut impl Buf, field: &'static str) -> Result<String, HealthError> {
    ensure(input.remaining(), field, 2)?;
    let len = usize::from(input.get_u16());
    ensure(input.remaining(), field, len)?;
    let mut raw = vec![0; len];
    input.copy_to_slice(&mut raw);
    String::from_utf8(raw).map_err(|_| HealthError::InvalidUtf8 { field })
}

fn put_string(out: &mut impl BufMut, field: &'static str, value: &str) -> Result<(), HealthError> {
    let len = u16::try_from(value.len()).map_err(|_| HealthError::StringTooLong {
        field,
        len: value.len(),
        max: usize::from(u16::MAX),
    })?;
    out.put_u16(len);
    out.put_slice(value.as_bytes());
    Ok(())
}
