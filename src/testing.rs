//! Test helpers
//!
//! [`FakeLookup`] stands in for the chain REST service: scripted pointer
//! records, forced failures and a log of every query it received.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use crate::models::PointerType;
use crate::providers::{
    LookupDirection, LookupFailure, LookupOutcome, LookupQuery, PointerLookup, PointerRecord,
};

/// A query observed by [`FakeLookup`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub direction: LookupDirection,
    pub pointer_type: PointerType,
    pub address: String,
}

type RecordKey = (LookupDirection, PointerType, String);

/// In-memory pointer registry
#[derive(Default)]
pub struct FakeLookup {
    records: HashMap<RecordKey, PointerRecord>,
    failing_addresses: HashMap<String, LookupFailure>,
    failing_queries: HashMap<RecordKey, LookupFailure>,
    fail_everything: Option<LookupFailure>,
    panic_on: HashSet<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `pointer` as a pointer of `pointer_type` to `pointee`
    /// (answers the pointee-by-pointer endpoint)
    pub fn with_pointee(self, pointer: &str, pointer_type: PointerType, pointee: &str) -> Self {
        self.with_record(
            LookupDirection::PointeeByPointer,
            pointer_type,
            pointer,
            PointerRecord {
                exists: true,
                pointee: Some(pointee.to_string()),
                version: Some(1),
                ..Default::default()
            },
        )
    }

    /// Register `pointer` against the base asset `pointee`
    /// (answers the pointer-by-pointee endpoint)
    pub fn with_pointer(self, pointee: &str, pointer_type: PointerType, pointer: &str) -> Self {
        self.with_record(
            LookupDirection::PointerByPointee,
            pointer_type,
            pointee,
            PointerRecord {
                exists: true,
                pointer: Some(pointer.to_string()),
                version: Some(1),
                ..Default::default()
            },
        )
    }

    /// Register a raw record, e.g. one that is malformed
    pub fn with_record(
        mut self,
        direction: LookupDirection,
        pointer_type: PointerType,
        address: &str,
        record: PointerRecord,
    ) -> Self {
        self.records
            .insert((direction, pointer_type, address.to_string()), record);
        self
    }

    /// Every query about `address` fails with `failure`
    pub fn failing_for(mut self, address: &str, failure: LookupFailure) -> Self {
        self.failing_addresses.insert(address.to_string(), failure);
        self
    }

    /// One specific query fails with `failure`
    pub fn failing_query(
        mut self,
        direction: LookupDirection,
        pointer_type: PointerType,
        address: &str,
        failure: LookupFailure,
    ) -> Self {
        self.failing_queries
            .insert((direction, pointer_type, address.to_string()), failure);
        self
    }

    /// Every query fails with `failure`
    pub fn failing(mut self, failure: LookupFailure) -> Self {
        self.fail_everything = Some(failure);
        self
    }

    /// Queries about `address` panic
    pub fn panicking_on(mut self, address: &str) -> Self {
        self.panic_on.insert(address.to_string());
        self
    }

    /// Sleep before answering each query
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    pub fn calls_for(&self, address: &str) -> usize {
        self.calls().iter().filter(|c| c.address == address).count()
    }
}

#[async_trait]
impl PointerLookup for FakeLookup {
    async fn lookup(&self, query: LookupQuery<'_>) -> LookupOutcome {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedCall {
                direction: query.direction,
                pointer_type: query.pointer_type,
                address: query.address.to_string(),
            });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panic_on.contains(query.address) {
            panic!("scripted lookup panic for {}", query.address);
        }
        if let Some(failure) = self.fail_everything {
            return LookupOutcome::Unavailable(failure);
        }
        if let Some(failure) = self.failing_addresses.get(query.address) {
            return LookupOutcome::Unavailable(*failure);
        }

        let key = (query.direction, query.pointer_type, query.address.to_string());
        if let Some(failure) = self.failing_queries.get(&key) {
            return LookupOutcome::Unavailable(*failure);
        }
        match self.records.get(&key) {
            Some(record) if record.exists => LookupOutcome::Found(record.clone()),
            _ => LookupOutcome::Absent,
        }
    }
}
