//! Settlement storage
//!
//! Every status change goes through [`SettlementStore::update_if_status`], a
//! conditional write keyed on the stored status. Two workers racing on one
//! settlement cannot both win.

use crate::{
    types::{Settlement, SettlementStatus},
    Error, Result,
};
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use uuid::Uuid;

/// Settlement persistence
#[async_trait]
pub trait SettlementStore: Send + Sync {
    /// Store a new settlement. Fails if its payment already has one.
    async fn insert(&self, settlement: Settlement) -> Result<()>;

    /// Settlement by ID
    async fn get(&self, id: Uuid) -> Result<Settlement>;

    /// Settlement for a payment, if any
    async fn find_by_payment(&self, payment_id: Uuid) -> Result<Option<Settlement>>;

    /// All settlements in a status, oldest first
    async fn list_by_status(&self, status: SettlementStatus) -> Result<Vec<Settlement>>;

    /// Replace the stored settlement only if its status is still `expected`.
    ///
    /// Returns `false` when another writer got there first.
    async fn update_if_status(
        &self,
        expected: SettlementStatus,
        settlement: &Settlement,
    ) -> Result<bool>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct InMemorySettlementStore {
    settlements: DashMap<Uuid, Settlement>,
    by_payment: DashMap<Uuid, Uuid>,
}

impl InMemorySettlementStore {
    /// Create empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored settlements
    pub fn len(&self) -> usize {
        self.settlements.len()
    }

    /// Store is empty
    pub fn is_empty(&self) -> bool {
        self.settlements.is_empty()
    }
}

#[async_trait]
impl SettlementStore for InMemorySettlementStore {
    async fn insert(&self, settlement: Settlement) -> Result<()> {
        match self.by_payment.entry(settlement.payment_id) {
            Entry::Occupied(existing) => Err(Error::InvalidInput(format!(
                "payment {} already has settlement {}",
                settlement.payment_id,
                existing.get()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(settlement.id);
                self.settlements.insert(settlement.id, settlement);
                Ok(())
            }
        }
    }

    async fn get(&self, id: Uuid) -> Result<Settlement> {
        self.settlements
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::NotFound(format!("settlement {}", id)))
    }

    async fn find_by_payment(&self, payment_id: Uuid) -> Result<Option<Settlement>> {
        let id = match self.by_payment.get(&payment_id) {
            Some(entry) => *entry.value(),
            None => return Ok(None),
        };
        Ok(self.settlements.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_by_status(&self, status: SettlementStatus) -> Result<Vec<Settlement>> {
        let mut found: Vec<Settlement> = self
            .settlements
            .iter()
            .filter(|entry| entry.value().status == status)
            .map(|entry| entry.value().clone())
            .collect();
        // v7 ids sort by creation time
        found.sort_by_key(|s| s.id);
        Ok(found)
    }

    async fn update_if_status(
        &self,
        expected: SettlementStatus,
        settlement: &Settlement,
    ) -> Result<bool> {
        match self.settlements.get_mut(&settlement.id) {
            Some(mut stored) => {
                if stored.status != expected {
                    return Ok(false);
                }
                *stored = settlement.clone();
                Ok(true)
            }
            None => Err(Error::NotFound(format!("settlement {}", settlement.id))),
        }
    }
}
