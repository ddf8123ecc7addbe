use crate::{errors::MedicalError, models};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::{MedicalRecordRepo, PetDirectory, sqlite_queries};

#[derive(Clone)]
pub struct SqlxSqliteRepo {
    pub db_pool: SqlitePool,
}

#[derive(Clone)]
pub struct SqlxSqlitePetDirectory {
    pub db_pool: SqlitePool,
}

/// `createdAt` is kept as microseconds so rows sort exactly by insertion time
fn created_at_from_micros(micros: i64) -> sqlx::Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| sqlx::Error::Decode(format!("createdAt out of range: {micros}").into()))
}

fn truncate_to_micros(date: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(date.timestamp_micros()).unwrap_or(date)
}

impl FromRow<'_, SqliteRow> for models::medical_record::MedicalRecord {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let id: uuid::fmt::Hyphenated = row.try_get("id")?;
        let pet_id: uuid::fmt::Hyphenated = row.try_get("petId")?;

        Ok(Self {
            id: id.into(),
            pet_id: pet_id.into(),
            data: models::medical_record::ClinicalData {
                last_visit_date: row.try_get("lastVisitDate")?,
                weight: row.try_get("weight")?,
                health_status: row.try_get("healthStatus")?,
                diseases: row.try_get("diseases")?,
                treatments: row.try_get("treatments")?,
                vaccinations: row.try_get("vaccinations")?,
                allergies: row.try_get("allergies")?,
                special_care: row.try_get("specialCare")?,
                sterilized: row.try_get("sterilized")?,
            },
            created_at: created_at_from_micros(row.try_get("createdAt")?)?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::pet::Pet {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let id: uuid::fmt::Hyphenated = row.try_get("id")?;
        let responsible_id: uuid::fmt::Hyphenated = row.try_get("responsibleId")?;

        Ok(Self {
            id: id.into(),
            responsible_id: responsible_id.into(),
        })
    }
}

#[async_trait]
impl MedicalRecordRepo for SqlxSqliteRepo {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(sqlite_queries::QUERY_CREATE_MEDICAL_RECORD_TABLE)
            .execute(&self.db_pool)
            .await?;
        sqlx::query(sqlite_queries::QUERY_CREATE_MEDICAL_RECORD_PET_INDEX)
            .execute(&self.db_pool)
            .await?;

        Ok(())
    }

    async fn insert(
        &self,
        record: models::medical_record::NewMedicalRecord,
    ) -> anyhow::Result<models::medical_record::MedicalRecord> {
        let stored = models::medical_record::MedicalRecord {
            id: record.id.unwrap_or_else(Uuid::new_v4),
            pet_id: record.pet_id,
            data: record.data,
            created_at: truncate_to_micros(record.created_at.unwrap_or_else(Utc::now)),
        };

        sqlx::query(sqlite_queries::QUERY_INSERT_MEDICAL_RECORD)
            .bind(stored.id.to_string())
            .bind(stored.pet_id.to_string())
            .bind(stored.data.last_visit_date)
            .bind(stored.data.weight)
            .bind(&stored.data.health_status)
            .bind(&stored.data.diseases)
            .bind(&stored.data.treatments)
            .bind(&stored.data.vaccinations)
            .bind(&stored.data.allergies)
            .bind(&stored.data.special_care)
            .bind(stored.data.sterilized)
            .bind(stored.created_at.timestamp_micros())
            .execute(&self.db_pool)
            .await?;

        Ok(stored)
    }

    async fn find_latest(
        &self,
        pet_id: Uuid,
    ) -> anyhow::Result<Option<models::medical_record::MedicalRecord>> {
        Ok(sqlx::query_as::<_, models::medical_record::MedicalRecord>(
            sqlite_queries::QUERY_GET_PET_LATEST_MEDICAL_RECORD,
        )
        .bind(pet_id.to_string())
        .fetch_optional(&self.db_pool)
        .await?)
    }

    async fn find_all(
        &self,
        pet_id: Uuid,
    ) -> anyhow::Result<Vec<models::medical_record::MedicalRecord>> {
        Ok(sqlx::query_as::<_, models::medical_record::MedicalRecord>(
            sqlite_queries::QUERY_GET_PET_MEDICAL_RECORDS,
        )
        .bind(pet_id.to_string())
        .fetch_all(&self.db_pool)
        .await?)
    }

    async fn find_by_id(
        &self,
        record_id: Uuid,
    ) -> anyhow::Result<Option<models::medical_record::MedicalRecord>> {
        Ok(sqlx::query_as::<_, models::medical_record::MedicalRecord>(
            sqlite_queries::QUERY_GET_MEDICAL_RECORD_BY_ID,
        )
        .bind(record_id.to_string())
        .fetch_optional(&self.db_pool)
        .await?)
    }

    async fn delete_by_id(&self, record_id: Uuid) -> anyhow::Result<()> {
        let deleted = sqlx::query(sqlite_queries::QUERY_DELETE_MEDICAL_RECORD)
            .bind(record_id.to_string())
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(MedicalError::RecordNotFound.into());
        }

        Ok(())
    }
}

#[async_trait]
impl PetDirectory for SqlxSqlitePetDirectory {
    async fn get_pet_by_id(&self, pet_id: Uuid) -> anyhow::Result<Option<models::pet::Pet>> {
        Ok(
            sqlx::query_as::<_, models::pet::Pet>(sqlite_queries::QUERY_GET_PET_BY_ID)
                .bind(pet_id.to_string())
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::medical_record::{ClinicalData, NewMedicalRecord};
    use chrono::{TimeDelta, TimeZone};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    async fn memory_repo() -> SqlxSqliteRepo {
        let repo = SqlxSqliteRepo {
            db_pool: memory_pool().await,
        };
        repo.ensure_schema().await.unwrap();
        repo
    }

    fn clinical_data(weight: f64) -> ClinicalData {
        ClinicalData {
            last_visit_date: Utc.with_ymd_and_hms(2025, 3, 1, 10, 30, 0).unwrap(),
            weight,
            health_status: "ok".into(),
            diseases: None,
            treatments: Some("antiparasitic".into()),
            vaccinations: "rabies".into(),
            allergies: None,
            special_care: Some("soft food".into()),
            sterilized: true,
        }
    }

    fn revision_at(pet_id: Uuid, weight: f64, created_at: DateTime<Utc>) -> NewMedicalRecord {
        NewMedicalRecord {
            created_at: Some(created_at),
            ..NewMedicalRecord::new(pet_id, clinical_data(weight))
        }
    }

    #[ntex::test]
    async fn test_insert_assigns_id_and_created_at() {
        let repo = memory_repo().await;
        let pet_id = Uuid::new_v4();

        let stored = repo
            .insert(NewMedicalRecord::new(pet_id, clinical_data(4.2)))
            .await
            .unwrap();

        assert!(!stored.id.is_nil());
        assert_eq!(stored.pet_id, pet_id);
        assert_eq!(stored.data, clinical_data(4.2));

        let found = repo.find_by_id(stored.id).await.unwrap();
        assert_eq!(found, Some(stored));
    }

    #[ntex::test]
    async fn test_insert_keeps_caller_id() {
        let repo = memory_repo().await;
        let record_id = Uuid::new_v4();

        let stored = repo
            .insert(NewMedicalRecord {
                id: Some(record_id),
                ..NewMedicalRecord::new(Uuid::new_v4(), clinical_data(1.0))
            })
            .await
            .unwrap();

        assert_eq!(stored.id, record_id);
    }

    #[ntex::test]
    async fn test_find_all_newest_first_and_latest_is_head() {
        let repo = memory_repo().await;
        let pet_id = Uuid::new_v4();
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();

        for (offset, weight) in [(1, 4.0), (3, 4.4), (2, 4.2)] {
            repo.insert(revision_at(pet_id, weight, base + TimeDelta::minutes(offset)))
                .await
                .unwrap();
        }
        repo.insert(revision_at(Uuid::new_v4(), 9.9, base + TimeDelta::hours(5)))
            .await
            .unwrap();

        let all = repo.find_all(pet_id).await.unwrap();
        let weights: Vec<f64> = all.iter().map(|r| r.data.weight).collect();

        assert_eq!(weights, vec![4.4, 4.2, 4.0]);
        assert!(all.windows(2).all(|w| w[0].created_at > w[1].created_at));
        assert_eq!(repo.find_latest(pet_id).await.unwrap().as_ref(), all.first());
    }

    #[ntex::test]
    async fn test_find_for_unknown_pet_is_empty() {
        let repo = memory_repo().await;
        let pet_id = Uuid::new_v4();

        assert!(repo.find_all(pet_id).await.unwrap().is_empty());
        assert!(repo.find_latest(pet_id).await.unwrap().is_none());
    }

    #[ntex::test]
    async fn test_delete_removes_only_target_revision() {
        let repo = memory_repo().await;
        let pet_id = Uuid::new_v4();
        let base = Utc::now();

        let first = repo.insert(revision_at(pet_id, 4.0, base)).await.unwrap();
        let second = repo
            .insert(revision_at(pet_id, 4.5, base + TimeDelta::seconds(1)))
            .await
            .unwrap();

        repo.delete_by_id(second.id).await.unwrap();

        let remaining = repo.find_all(pet_id).await.unwrap();
        assert_eq!(remaining, vec![first]);

        let err = repo.delete_by_id(second.id).await.unwrap_err();
        assert_eq!(MedicalError::from(err), MedicalError::RecordNotFound);
    }

    #[ntex::test]
    async fn test_pet_directory_lookup() {
        let db_pool = memory_pool().await;
        sqlx::query("CREATE TABLE Pets (id TEXT PRIMARY KEY, name TEXT, responsibleId TEXT NOT NULL);")
            .execute(&db_pool)
            .await
            .unwrap();

        let pet_id = Uuid::new_v4();
        let responsible_id = Uuid::new_v4();
        sqlx::query("INSERT INTO Pets (id, name, responsibleId) VALUES ($1, 'firulais', $2);")
            .bind(pet_id.to_string())
            .bind(responsible_id.to_string())
            .execute(&db_pool)
            .await
            .unwrap();

        let directory = SqlxSqlitePetDirectory { db_pool };

        let pet = directory.get_pet_by_id(pet_id).await.unwrap().unwrap();
        assert_eq!(pet.id, pet_id);
        assert!(pet.is_responsible(responsible_id));

        assert!(
            directory
                .get_pet_by_id(Uuid::new_v4())
                .await
                .unwrap()
                .is_none()
        );
    }
}
