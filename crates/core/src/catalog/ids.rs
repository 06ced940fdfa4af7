use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::Rng;
use uuid::Uuid;

use crate::config::IdStrategy;
use crate::domain::product::ProductId;

/// URL-safe alphabet used for short random ids.
pub const NANOID_ALPHABET: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_-";

pub const DEFAULT_ID_LENGTH: usize = 6;

pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> ProductId;
}

pub struct NanoIdGenerator {
    length: usize,
}

impl NanoIdGenerator {
    pub fn new(length: usize) -> Self {
        Self { length: length.max(1) }
    }
}

impl Default for NanoIdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_LENGTH)
    }
}

impl IdGenerator for NanoIdGenerator {
    fn next_id(&self) -> ProductId {
        let mut rng = rand::thread_rng();
        let id = (0..self.length)
            .map(|_| NANOID_ALPHABET[rng.gen_range(0..NANOID_ALPHABET.len())] as char)
            .collect();
        ProductId(id)
    }
}

#[derive(Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> ProductId {
        ProductId(Uuid::new_v4().to_string())
    }
}

/// Deterministic `prefix-1`, `prefix-2`, ... ids.
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), next: AtomicU64::new(1) }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("p")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> ProductId {
        let sequence = self.next.fetch_add(1, Ordering::Relaxed);
        ProductId(format!("{}-{sequence}", self.prefix))
    }
}

pub fn generator_for(strategy: IdStrategy, id_length: usize) -> Arc<dyn IdGenerator> {
    match strategy {
        IdStrategy::NanoId => Arc::new(NanoIdGenerator::new(id_length)),
        IdStrategy::Uuid => Arc::new(UuidIdGenerator),
        IdStrategy::Sequential => Arc::new(SequentialIdGenerator::default()),
    }
}
