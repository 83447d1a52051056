//! Exact (brute-force) nearest-neighbor index using squared L2 distance.
//!
//! Vectors are stored contiguously, so position `i` in the index is the
//! half-open range `i * dim .. (i + 1) * dim` of the backing buffer.
//!
//! # Binary layout
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | magic `DQVX` |
//! | 4 | 4 | format version, `u32` LE |
//! | 8 | 4 | dimension, `u32` LE |
//! | 12 | 8 | vector count, `u64` LE |
//! | 20 | `4 * dim * count` | `f32` LE components |

use docqa_core::StoreError;

/// Magic bytes at the start of the vector artifact.
pub const MAGIC: &[u8; 4] = b"DQVX";

/// Current binary format version.
pub const FORMAT_VERSION: u32 = 1;

const HEADER_LEN: usize = 20;

/// Flat index over fixed-dimension vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatL2Index {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    /// Create an empty index for vectors of the given dimension.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    /// Vector dimension.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append vectors in order. Nothing is appended if any vector has the wrong dimension.
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<(), StoreError> {
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(StoreError::DimensionMismatch {
                expected: self.dimension,
                actual: bad.len(),
            });
        }

        self.data.reserve(vectors.len() * self.dimension);
        for vector in vectors {
            self.data.extend_from_slice(vector);
        }
        Ok(())
    }

    /// Drop every vector from position `len` onward.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len * self.dimension);
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Vector at `position`, if any.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&[f32]> {
        let start = position.checked_mul(self.dimension)?;
        self.data.get(start..start + self.dimension)
    }

    /// Up to `top_k` `(position, squared distance)` pairs, nearest first.
    ///
    /// Equal distances keep insertion order.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<(usize, f32)>, StoreError> {
        if query.len() != self.dimension {
            return Err(StoreError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if top_k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dimension)
            .map(|vector| squared_l2(query, vector))
            .enumerate()
            .collect();

        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(top_k);
        Ok(scored)
    }

    /// Serialize to the binary vector artifact format.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.data.len() * 4);
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        out.extend_from_slice(&(self.dimension as u32).to_le_bytes());
        out.extend_from_slice(&(self.len() as u64).to_le_bytes());
        for value in &self.data {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out
    }

    /// Parse the binary vector artifact format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        if bytes.len() < HEADER_LEN {
            return Err(StoreError::Corrupt(format!(
                "vector file too short: {} bytes",
                bytes.len()
            )));
        }
        if &bytes[0..4] != MAGIC {
            return Err(StoreError::Corrupt("bad vector file magic".to_string()));
        }

        let version = read_u32(&bytes[4..8]);
        if version != FORMAT_VERSION {
            return Err(StoreError::Corrupt(format!(
                "unsupported vector file version {version}"
            )));
        }

        let dimension = read_u32(&bytes[8..12]) as usize;
        if dimension == 0 {
            return Err(StoreError::Corrupt("zero vector dimension".to_string()));
        }
        let count = read_u64(&bytes[12..20]);

        let expected = usize::try_from(count)
            .ok()
            .and_then(|count| count.checked_mul(dimension))
            .and_then(|floats| floats.checked_mul(4))
            .and_then(|body| body.checked_add(HEADER_LEN))
            .ok_or_else(|| StoreError::Corrupt(format!("implausible vector count {count}")))?;
        if bytes.len() != expected {
            return Err(StoreError::Corrupt(format!(
                "vector file is {} bytes, header implies {expected}",
                bytes.len()
            )));
        }

        let data = bytes[HEADER_LEN..]
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        Ok(Self { dimension, data })
    }
}

/// Squared Euclidean distance.
#[must_use]
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}
