//! MySQL backend. Expected schema (one table per demande kind):
//!
//! ```sql
//! CREATE TABLE demande_attestation (
//!     id           CHAR(36)     NOT NULL PRIMARY KEY,
//!     nom          VARCHAR(255) NOT NULL,
//!     prenom       VARCHAR(255) NOT NULL,
//!     matricule    VARCHAR(16)  NOT NULL,
//!     email        VARCHAR(255) NOT NULL,
//!     departement  VARCHAR(255) NULL,
//!     status       VARCHAR(32)  NOT NULL,
//!     objet        TEXT         NOT NULL,
//!     attestations TEXT         NOT NULL,
//!     created_at   DATETIME(3)  NOT NULL,
//!     updated_at   DATETIME(3)  NOT NULL
//! );
//!
//! CREATE TABLE demande_changement_parada (
//!     id              CHAR(36)     NOT NULL PRIMARY KEY,
//!     nom             VARCHAR(255) NOT NULL,
//!     prenom          VARCHAR(255) NOT NULL,
//!     matricule       VARCHAR(16)  NOT NULL,
//!     email           VARCHAR(255) NOT NULL,
//!     departement     VARCHAR(255) NULL,
//!     status          VARCHAR(32)  NOT NULL,
//!     ancienne_parada TEXT         NOT NULL,
//!     nouvelle_parada TEXT         NOT NULL,
//!     created_at      DATETIME(3)  NOT NULL,
//!     updated_at      DATETIME(3)  NOT NULL
//! );
//! ```

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::{MySql, MySqlPool, Row};

use crate::model::{Demande, DemandeAttestation, DemandeBase, DemandeChangementParada, Statut};

use super::{DemandeFilter, Page, StoreError};

/// Bindable value for dynamically assembled queries.
#[derive(Debug, Clone)]
pub enum SqlValue {
    Str(String),
    DateTime(DateTime<Utc>),
    Null,
}

fn bind_value<'q>(
    query: sqlx::query::Query<'q, MySql, MySqlArguments>,
    value: SqlValue,
) -> sqlx::query::Query<'q, MySql, MySqlArguments> {
    match value {
        SqlValue::Str(v) => query.bind(v),
        SqlValue::DateTime(v) => query.bind(v),
        SqlValue::Null => query.bind(None::<String>),
    }
}

fn bind_scalar<'q, T>(
    query: sqlx::query::QueryScalar<'q, MySql, T, MySqlArguments>,
    value: SqlValue,
) -> sqlx::query::QueryScalar<'q, MySql, T, MySqlArguments> {
    match value {
        SqlValue::Str(v) => query.bind(v),
        SqlValue::DateTime(v) => query.bind(v),
        SqlValue::Null => query.bind(None::<String>),
    }
}

/// Per-kind SQL statements and row mapping for the MySQL backend.
pub trait MySqlRecord: Sized {
    /// INSERT with positional placeholders for [`Self::insert_values`].
    const INSERT_SQL: &'static str;
    /// Full-row UPDATE by id; placeholders for [`Self::update_values`],
    /// then the id.
    const UPDATE_SQL: &'static str;

    fn insert_values(&self) -> Vec<SqlValue>;
    fn update_values(&self) -> Vec<SqlValue>;
    fn from_row(row: &MySqlRow) -> Result<Self, sqlx::Error>;
}

fn base_values(base: &DemandeBase) -> Vec<SqlValue> {
    vec![
        SqlValue::Str(base.nom.clone()),
        SqlValue::Str(base.prenom.clone()),
        SqlValue::Str(base.matricule.clone()),
        SqlValue::Str(base.email.clone()),
        base.departement.clone().map_or(SqlValue::Null, SqlValue::Str),
        SqlValue::Str(base.status.to_string()),
    ]
}

fn base_from_row(row: &MySqlRow) -> Result<DemandeBase, sqlx::Error> {
    let status_raw: String = row.try_get("status")?;
    let status = Statut::from_str(&status_raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: Box::new(e),
    })?;

    Ok(DemandeBase {
        id: row.try_get("id")?,
        nom: row.try_get("nom")?,
        prenom: row.try_get("prenom")?,
        matricule: row.try_get("matricule")?,
        email: row.try_get("email")?,
        departement: row.try_get("departement")?,
        status,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl MySqlRecord for DemandeAttestation {
    const INSERT_SQL: &'static str = "INSERT INTO demande_attestation \
        (id, nom, prenom, matricule, email, departement, status, objet, attestations, created_at, updated_at) \
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

    const UPDATE_SQL: &'static str = "UPDATE demande_attestation \
        SET nom = ?, prenom = ?, matricule = ?, email = ?, departement = ?, status = ?, \
        objet = ?, attestations = ?, updated_at = ? \
        WHERE id = ?";

    fn insert_values(&self) -> Vec<SqlValue> {
        let mut values = vec![SqlValue::Str(self.base.id.clone())];
        values.extend(base_values(&self.base));
        values.push(SqlValue::Str(self.objet.clone()));
        values.push(SqlValue::Str(
            serde_json::to_string(&self.attestations).unwrap_or_default(),
        ));
        values.push(SqlValue::DateTime(self.base.created_at));
        values.push(SqlValue::DateTime(self.base.updated_at));
        values
    }

    fn update_values(&self) -> Vec<SqlValue> {
        let mut values = base_values(&self.base);
        values.push(SqlValue::Str(self.objet.clone()));
        values.push(SqlValue::Str(
            serde_json::to_string(&self.attestations).unwrap_or_default(),
        ));
        values.push(SqlValue::DateTime(self.base.updated_at));
        values
    }

    fn from_row(row: &MySqlRow) -> Result<Self, sqlx::Error> {
        let base = base_from_row(row)?;
        let objet: String = row.try_get("objet")?;
        let raw: String = row.try_get("attestations")?;
        let attestations =
            serde_json::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
                index: "attestations".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            base,
            objet,
            attestations,
        })
    }
}

impl MySqlRecord for DemandeChangementParada {
    const INSERT_SQL: &'static str = "INSERT INTO demande_changement_parada \
        (id, nom, prenom, matricule, email, departement, status, ancienne_parada, nouvelle_parada, created_at, updated_at) \
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

    const UPDATE_SQL: &'static str = "UPDATE demande_changement_parada \
        SET nom = ?, prenom = ?, matricule = ?, email = ?, departement = ?, status = ?, \
        ancienne_parada = ?, nouvelle_parada = ?, updated_at = ? \
        WHERE id = ?";

    fn insert_values(&self) -> Vec<SqlValue> {
        let mut values = vec![SqlValue::Str(self.base.id.clone())];
        values.extend(base_values(&self.base));
        values.push(SqlValue::Str(self.ancienne_parada.clone()));
        values.push(SqlValue::Str(self.nouvelle_parada.clone()));
        values.push(SqlValue::DateTime(self.base.created_at));
        values.push(SqlValue::DateTime(self.base.updated_at));
        values
    }

    fn update_values(&self) -> Vec<SqlValue> {
        let mut values = base_values(&self.base);
        values.push(SqlValue::Str(self.ancienne_parada.clone()));
        values.push(SqlValue::Str(self.nouvelle_parada.clone()));
        values.push(SqlValue::DateTime(self.base.updated_at));
        values
    }

    fn from_row(row: &MySqlRow) -> Result<Self, sqlx::Error> {
        let base = base_from_row(row)?;
        Ok(Self {
            base,
            ancienne_parada: row.try_get("ancienne_parada")?,
            nouvelle_parada: row.try_get("nouvelle_parada")?,
        })
    }
}

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn where_clause(filter: &DemandeFilter) -> (String, Vec<SqlValue>) {
        let mut conditions = Vec::new();
        let mut binds = Vec::new();

        if let Some(nom) = &filter.nom {
            conditions.push("nom LIKE ?");
            binds.push(SqlValue::Str(format!("%{nom}%")));
        }
        if let Some(prenom) = &filter.prenom {
            conditions.push("prenom LIKE ?");
            binds.push(SqlValue::Str(format!("%{prenom}%")));
        }
        if let Some(matricule) = &filter.matricule {
            conditions.push("matricule LIKE ?");
            binds.push(SqlValue::Str(format!("%{matricule}%")));
        }
        if let Some(from) = filter.created_from() {
            conditions.push("created_at >= ?");
            binds.push(SqlValue::DateTime(from));
        }
        if let Some(to) = filter.created_to() {
            conditions.push("created_at <= ?");
            binds.push(SqlValue::DateTime(to));
        }

        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        (clause, binds)
    }

    pub async fn insert<R: MySqlRecord>(&self, record: &R) -> Result<(), StoreError> {
        let mut query = sqlx::query(R::INSERT_SQL);
        for value in record.insert_values() {
            query = bind_value(query, value);
        }
        query.execute(&self.pool).await?;
        Ok(())
    }

    pub async fn get<R: Demande + MySqlRecord>(&self, id: &str) -> Result<Option<R>, StoreError> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", R::TABLE);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(|r| R::from_row(&r)).transpose()?)
    }

    pub async fn list<R: Demande + MySqlRecord>(
        &self,
        filter: &DemandeFilter,
        page: Page,
    ) -> Result<(i64, Vec<R>), StoreError> {
        let (where_sql, binds) = Self::where_clause(filter);

        let count_sql = format!("SELECT COUNT(*) FROM {}{}", R::TABLE, where_sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for value in binds.clone() {
            count_query = bind_scalar(count_query, value);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let data_sql = format!(
            "SELECT * FROM {}{} ORDER BY created_at DESC LIMIT ? OFFSET ?",
            R::TABLE,
            where_sql
        );
        let mut data_query = sqlx::query(&data_sql);
        for value in binds {
            data_query = bind_value(data_query, value);
        }
        data_query = data_query
            .bind(i64::from(page.per_page))
            .bind(page.offset() as i64);

        let rows = data_query.fetch_all(&self.pool).await?;
        let records = rows
            .iter()
            .map(|row| R::from_row(row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((total, records))
    }

    pub async fn count<R: Demande + MySqlRecord>(
        &self,
        filter: &DemandeFilter,
        statut: Option<Statut>,
    ) -> Result<i64, StoreError> {
        let (mut where_sql, mut binds) = Self::where_clause(filter);
        if let Some(statut) = statut {
            if where_sql.is_empty() {
                where_sql.push_str(" WHERE status = ?");
            } else {
                where_sql.push_str(" AND status = ?");
            }
            binds.push(SqlValue::Str(statut.to_string()));
        }

        let sql = format!("SELECT COUNT(*) FROM {}{}", R::TABLE, where_sql);
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for value in binds {
            query = bind_scalar(query, value);
        }
        Ok(query.fetch_one(&self.pool).await?)
    }

    pub async fn save<R: Demande + MySqlRecord>(&self, record: &R) -> Result<bool, StoreError> {
        let mut query = sqlx::query(R::UPDATE_SQL);
        for value in record.update_values() {
            query = bind_value(query, value);
        }
        query = query.bind(record.base().id.clone());
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete<R: Demande + MySqlRecord>(&self, id: &str) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", R::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
