//! In-memory hold store for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{HoldStatus, SlotHold};
use crate::repository::HoldRepository;

#[derive(Default)]
pub struct MemoryHoldRepository {
    holds: Mutex<HashMap<String, SlotHold>>,
}

impl MemoryHoldRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, hold: SlotHold) {
        self.holds
            .lock()
            .expect("hold map poisoned")
            .insert(hold.id.clone(), hold);
    }

    /// Seed a fresh active hold with a generated id.
    pub fn seed_active(&self, session_id: &str, expires_at: i64, now_millis: i64) -> SlotHold {
        let hold = SlotHold::new(
            Uuid::new_v4().to_string(),
            session_id.to_string(),
            expires_at,
            now_millis,
        );
        self.insert(hold.clone());
        hold
    }

    pub fn get(&self, id: &str) -> Option<SlotHold> {
        self.holds
            .lock()
            .expect("hold map poisoned")
            .get(id)
            .cloned()
    }

    /// (active, expired) counts across the whole store.
    pub fn status_counts(&self) -> (usize, usize) {
        let holds = self.holds.lock().expect("hold map poisoned");
        let active = holds
            .values()
            .filter(|h| h.status == HoldStatus::Active)
            .count();
        (active, holds.len() - active)
    }
}

#[async_trait]
impl HoldRepository for MemoryHoldRepository {
    async fn find_expirable(
        &self,
        now_millis: i64,
        limit: usize,
    ) -> Result<Vec<SlotHold>, Box<dyn std::error::Error + Send + Sync>> {
        let holds = self.holds.lock().expect("hold map poisoned");
        let mut expirable: Vec<SlotHold> = holds
            .values()
            .filter(|h| h.is_expirable(now_millis))
            .cloned()
            .collect();
        expirable.sort_by(|a, b| {
            a.expires_at
                .cmp(&b.expires_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        expirable.truncate(limit);
        Ok(expirable)
    }

    async fn expire_batch(
        &self,
        hold_ids: &[String],
        expired_at_millis: i64,
    ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        let mut holds = self.holds.lock().expect("hold map poisoned");
        let mut updated = 0u64;
        for id in hold_ids {
            if let Some(hold) = holds.get_mut(id) {
                if hold.expire(expired_at_millis) {
                    updated += 1;
                }
            }
        }
        Ok(updated)
    }
}
