use std::num::NonZeroUsize;

use alloy::primitives::U256;
use lru::LruCache;

use crate::data::types::RequestRecord;

/// Request records never change once written, so entries have no TTL.
const RECORD_CACHE_SIZE: usize = 1000;

pub struct RecordCache {
    records: LruCache<U256, RequestRecord>,
}

impl RecordCache {
    pub fn new() -> Self {
        Self::with_capacity(RECORD_CACHE_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            records: LruCache::new(capacity),
        }
    }

    pub fn get(&mut self, request_id: &U256) -> Option<RequestRecord> {
        self.records.get(request_id).cloned()
    }

    pub fn put(&mut self, record: RequestRecord) {
        self.records.put(record.request_id, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

impl Default for RecordCache {
    fn default() -> Self {
        Self::new()
    }
}
