use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};

use crate::model::{Demande, Statut};

use super::{DemandeFilter, Page, StoreError};

/// Flat-file backend: one JSON document holding one named array per
/// demande kind. A missing file reads as empty collections; a file that
/// exists but does not parse is a storage error, never silently reset.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_doc(&self) -> Result<Map<String, Value>, StoreError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_doc(&self, doc: &Map<String, Value>) -> Result<(), StoreError> {
        let pretty = serde_json::to_string_pretty(doc)?;
        fs::write(&self.path, pretty)?;
        Ok(())
    }

    fn collection<R: Demande>(&self, doc: &Map<String, Value>) -> Result<Vec<R>, StoreError> {
        match doc.get(R::COLLECTION) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(Vec::new()),
        }
    }

    fn replace_collection<R: Demande>(
        &self,
        doc: &mut Map<String, Value>,
        records: Vec<R>,
    ) -> Result<(), StoreError> {
        doc.insert(R::COLLECTION.to_string(), serde_json::to_value(records)?);
        Ok(())
    }

    pub fn insert<R: Demande>(&self, record: &R) -> Result<(), StoreError> {
        let _guard = self.guard();
        let mut doc = self.read_doc()?;
        let mut records: Vec<R> = self.collection(&doc)?;
        records.push(record.clone());
        self.replace_collection(&mut doc, records)?;
        self.write_doc(&doc)
    }

    pub fn get<R: Demande>(&self, id: &str) -> Result<Option<R>, StoreError> {
        let _guard = self.guard();
        let doc = self.read_doc()?;
        let records: Vec<R> = self.collection(&doc)?;
        Ok(records.into_iter().find(|r| r.base().id == id))
    }

    pub fn list<R: Demande>(
        &self,
        filter: &DemandeFilter,
        page: Page,
    ) -> Result<(i64, Vec<R>), StoreError> {
        let _guard = self.guard();
        let doc = self.read_doc()?;
        let mut matching: Vec<R> = self
            .collection::<R>(&doc)?
            .into_iter()
            .filter(|r| filter.matches(r.base()))
            .collect();
        matching.sort_by(|a, b| b.base().created_at.cmp(&a.base().created_at));

        let total = matching.len() as i64;
        let records = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect();
        Ok((total, records))
    }

    pub fn count<R: Demande>(
        &self,
        filter: &DemandeFilter,
        statut: Option<Statut>,
    ) -> Result<i64, StoreError> {
        let _guard = self.guard();
        let doc = self.read_doc()?;
        let count = self
            .collection::<R>(&doc)?
            .iter()
            .filter(|r| filter.matches(r.base()))
            .filter(|r| statut.is_none_or(|s| r.base().status == s))
            .count();
        Ok(count as i64)
    }

    pub fn save<R: Demande>(&self, record: &R) -> Result<bool, StoreError> {
        let _guard = self.guard();
        let mut doc = self.read_doc()?;
        let mut records: Vec<R> = self.collection(&doc)?;
        let Some(slot) = records.iter_mut().find(|r| r.base().id == record.base().id) else {
            return Ok(false);
        };
        *slot = record.clone();
        self.replace_collection(&mut doc, records)?;
        self.write_doc(&doc)?;
        Ok(true)
    }

    pub fn delete<R: Demande>(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.guard();
        let mut doc = self.read_doc()?;
        let mut records: Vec<R> = self.collection(&doc)?;
        let before = records.len();
        records.retain(|r| r.base().id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.replace_collection(&mut doc, records)?;
        self.write_doc(&doc)?;
        Ok(true)
    }
}
