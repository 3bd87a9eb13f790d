use anyhow::Result;

use crate::models::{BabyRecord, DiaperRecord, FeedingRecord, VaccineRecord};
use crate::store::{keys, Store};

/// CRUD over the growth, feeding, diaper and vaccine record lists. Each list
/// is one store key, rewritten whole on every change.
#[derive(Clone)]
pub struct RecordStore {
    store: Store,
}

impl RecordStore {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn baby_records(&self) -> Vec<BabyRecord> {
        self.store.read_or_default(keys::BABY_RECORDS).await
    }

    /// Insert or replace by id; newest measurement first.
    pub async fn save_baby_record(&self, record: BabyRecord) -> Result<()> {
        let mut records = self.baby_records().await;
        match records.iter().position(|r| r.id == record.id) {
            Some(index) => records[index] = record,
            None => records.push(record),
        }
        records.sort_by(|a, b| b.date.cmp(&a.date));
        self.store.put(keys::BABY_RECORDS, &records).await
    }

    pub async fn delete_baby_record(&self, record_id: &str) -> Result<()> {
        let records: Vec<BabyRecord> = self
            .baby_records()
            .await
            .into_iter()
            .filter(|r| r.id != record_id)
            .collect();
        self.store.put(keys::BABY_RECORDS, &records).await
    }

    pub async fn feeding_records(&self) -> Vec<FeedingRecord> {
        self.store.read_or_default(keys::FEEDING_RECORDS).await
    }

    pub async fn save_feeding_record(&self, record: FeedingRecord) -> Result<()> {
        let mut records = self.feeding_records().await;
        match records.iter().position(|r| r.id == record.id) {
            Some(index) => records[index] = record,
            None => records.push(record),
        }
        records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.time.cmp(&a.time)));
        self.store.put(keys::FEEDING_RECORDS, &records).await
    }

    pub async fn delete_feeding_record(&self, record_id: &str) -> Result<()> {
        let records: Vec<FeedingRecord> = self
            .feeding_records()
            .await
            .into_iter()
            .filter(|r| r.id != record_id)
            .collect();
        self.store.put(keys::FEEDING_RECORDS, &records).await
    }

    pub async fn diaper_records(&self) -> Vec<DiaperRecord> {
        self.store.read_or_default(keys::DIAPER_RECORDS).await
    }

    pub async fn save_diaper_record(&self, record: DiaperRecord) -> Result<()> {
        let mut records = self.diaper_records().await;
        match records.iter().position(|r| r.id == record.id) {
            Some(index) => records[index] = record,
            None => records.push(record),
        }
        records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.time.cmp(&a.time)));
        self.store.put(keys::DIAPER_RECORDS, &records).await
    }

    pub async fn delete_diaper_record(&self, record_id: &str) -> Result<()> {
        let records: Vec<DiaperRecord> = self
            .diaper_records()
            .await
            .into_iter()
            .filter(|r| r.id != record_id)
            .collect();
        self.store.put(keys::DIAPER_RECORDS, &records).await
    }

    pub async fn vaccine_records(&self) -> Vec<VaccineRecord> {
        self.store.read_or_default(keys::VACCINE_RECORDS).await
    }

    /// Vaccines keep their schedule order; no resort on save.
    pub async fn save_vaccine_record(&self, record: VaccineRecord) -> Result<()> {
        let mut records = self.vaccine_records().await;
        match records.iter().position(|r| r.id == record.id) {
            Some(index) => records[index] = record,
            None => records.push(record),
        }
        self.store.put(keys::VACCINE_RECORDS, &records).await
    }

    pub async fn delete_vaccine_record(&self, record_id: &str) -> Result<()> {
        let records: Vec<VaccineRecord> = self
            .vaccine_records()
            .await
            .into_iter()
            .filter(|r| r.id != record_id)
            .collect();
        self.store.put(keys::VACCINE_RECORDS, &records).await
    }
}
