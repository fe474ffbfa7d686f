pub mod file;
pub mod mysql;

pub use file::FileStore;
pub use mysql::{MySqlRecord, MySqlStore};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

use crate::model::{Demande, DemandeBase, Statut};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt data file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Typed filter over the common demande fields. Every provided field
/// must match for a record to be kept; name and badge matches are
/// case-insensitive substring matches, the date range is inclusive.
#[derive(Debug, Clone, Default)]
pub struct DemandeFilter {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub matricule: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl DemandeFilter {
    pub(crate) fn created_from(&self) -> Option<DateTime<Utc>> {
        self.date_from.map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    pub(crate) fn created_to(&self) -> Option<DateTime<Utc>> {
        self.date_to
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .map(|dt| dt.and_utc())
    }

    pub fn matches(&self, base: &DemandeBase) -> bool {
        fn contains_ci(haystack: &str, needle: &str) -> bool {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }

        if let Some(nom) = &self.nom {
            if !contains_ci(&base.nom, nom) {
                return false;
            }
        }
        if let Some(prenom) = &self.prenom {
            if !contains_ci(&base.prenom, prenom) {
                return false;
            }
        }
        if let Some(matricule) = &self.matricule {
            if !contains_ci(&base.matricule, matricule) {
                return false;
            }
        }
        if let Some(from) = self.created_from() {
            if base.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.created_to() {
            if base.created_at > to {
                return false;
            }
        }
        true
    }
}

/// 1-based pagination window; `per_page` is clamped to 1..=100.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(10).clamp(1, 100),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }
}

/// Storage backend, selected once at startup. Both backends expose the
/// same operations over both demande kinds.
pub enum Store {
    MySql(MySqlStore),
    File(FileStore),
}

impl Store {
    pub async fn insert<R>(&self, record: &R) -> Result<(), StoreError>
    where
        R: Demande + MySqlRecord,
    {
        match self {
            Self::MySql(store) => store.insert(record).await,
            Self::File(store) => store.insert(record),
        }
    }

    pub async fn get<R>(&self, id: &str) -> Result<Option<R>, StoreError>
    where
        R: Demande + MySqlRecord,
    {
        match self {
            Self::MySql(store) => store.get(id).await,
            Self::File(store) => store.get(id),
        }
    }

    /// Matching records ordered newest-first, plus the total matching
    /// count.
    pub async fn list<R>(&self, filter: &DemandeFilter, page: Page) -> Result<(i64, Vec<R>), StoreError>
    where
        R: Demande + MySqlRecord,
    {
        match self {
            Self::MySql(store) => store.list(filter, page).await,
            Self::File(store) => store.list(filter, page),
        }
    }

    pub async fn count<R>(
        &self,
        filter: &DemandeFilter,
        statut: Option<Statut>,
    ) -> Result<i64, StoreError>
    where
        R: Demande + MySqlRecord,
    {
        match self {
            Self::MySql(store) => store.count::<R>(filter, statut).await,
            Self::File(store) => store.count::<R>(filter, statut),
        }
    }

    /// Full-row replace by id. Returns false when the id is gone.
    pub async fn save<R>(&self, record: &R) -> Result<bool, StoreError>
    where
        R: Demande + MySqlRecord,
    {
        match self {
            Self::MySql(store) => store.save(record).await,
            Self::File(store) => store.save(record),
        }
    }

    pub async fn delete<R>(&self, id: &str) -> Result<bool, StoreError>
    where
        R: Demande + MySqlRecord,
    {
        match self {
            Self::MySql(store) => store.delete::<R>(id).await,
            Self::File(store) => store.delete::<R>(id),
        }
    }
}
