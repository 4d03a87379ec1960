use crate::core::registration::next_chest_number;
use crate::core::{NewRegistrant, Registrant, RegistrantStore};
use crate::utils::error::StoreError;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-process registrant store. The chest number is picked and the record
/// pushed under one lock, so concurrent writers never share a number.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistrantStore {
    records: Arc<Mutex<Vec<Registrant>>>,
}

impl MemoryRegistrantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以既有紀錄起始，例如接續前一批報名的號碼布
    pub fn with_registrants(records: Vec<Registrant>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub async fn registrants(&self) -> Vec<Registrant> {
        self.records.lock().await.clone()
    }
}

fn highest(records: &[Registrant]) -> Option<i64> {
    records.iter().map(|r| r.chest_number).max()
}

#[async_trait]
impl RegistrantStore for MemoryRegistrantStore {
    async fn highest_chest_number(&self) -> Result<Option<i64>, StoreError> {
        Ok(highest(&self.records.lock().await))
    }

    async fn create(&self, record: NewRegistrant) -> Result<Registrant, StoreError> {
        let mut records = self.records.lock().await;

        let now = Utc::now();
        let registrant = Registrant {
            id: records.len() as i64 + 1,
            name: record.name,
            email: record.email,
            phone: record.phone,
            age: record.age,
            gender: record.gender,
            category: record.category,
            payment_id: record.payment_id,
            chest_number: next_chest_number(highest(&records)),
            created_at: now,
            updated_at: now,
        };
        records.push(registrant.clone());

        Ok(registrant)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.records.lock().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Gender;

    fn new_record(payment_id: &str) -> NewRegistrant {
        NewRegistrant {
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            phone: "111".to_string(),
            age: 30,
            gender: Gender::Male,
            category: "open".to_string(),
            payment_id: payment_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_store_has_no_highest() {
        let store = MemoryRegistrantStore::new();
        assert_eq!(store.highest_chest_number().await.unwrap(), None);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_chest_numbers() {
        let store = MemoryRegistrantStore::new();
        let first = tokio_test::assert_ok!(store.create(new_record("pay_1")).await);
        let second = tokio_test::assert_ok!(store.create(new_record("pay_2")).await);

        assert_eq!((first.id, first.chest_number), (1, 1000));
        assert_eq!((second.id, second.chest_number), (2, 1001));
        assert_eq!(second.created_at, second.updated_at);
        assert_eq!(store.highest_chest_number().await.unwrap(), Some(1001));
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_creates_get_consecutive_numbers() {
        let store = MemoryRegistrantStore::new();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create(new_record(&format!("pay_{}", i))).await })
            })
            .collect();
        for handle in handles {
            tokio_test::assert_ok!(handle.await.unwrap());
        }

        let mut numbers: Vec<i64> = store.registrants().await.iter().map(|r| r.chest_number).collect();
        numbers.sort_unstable();
        assert_eq!(numbers, (1000..1016).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn test_same_email_is_allowed() {
        let store = MemoryRegistrantStore::new();
        store.create(new_record("pay_1")).await.unwrap();
        store.create(new_record("pay_2")).await.unwrap();

        let emails: Vec<String> = store.registrants().await.into_iter().map(|r| r.email).collect();
        assert_eq!(emails, vec!["a@x.com", "a@x.com"]);
    }
}
