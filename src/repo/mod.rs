pub mod sqlite;
pub mod sqlite_queries;

use crate::models;
use async_trait::async_trait;
use uuid::Uuid;

/// Append-only persistence of medical record revisions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicalRecordRepo: Send + Sync {
    /// Creates the backing table when the store is empty.
    async fn ensure_schema(&self) -> anyhow::Result<()>;

    /// Appends a revision, assigning `id` and `created_at` when missing.
    async fn insert(
        &self,
        record: models::medical_record::NewMedicalRecord,
    ) -> anyhow::Result<models::medical_record::MedicalRecord>;

    async fn find_latest(
        &self,
        pet_id: Uuid,
    ) -> anyhow::Result<Option<models::medical_record::MedicalRecord>>;

    /// Retrieves every revision of a pet, newest first
    async fn find_all(
        &self,
        pet_id: Uuid,
    ) -> anyhow::Result<Vec<models::medical_record::MedicalRecord>>;

    async fn find_by_id(
        &self,
        record_id: Uuid,
    ) -> anyhow::Result<Option<models::medical_record::MedicalRecord>>;

    /// Removes exactly one revision. Fails with `MedicalError::RecordNotFound`
    /// when nothing was removed.
    async fn delete_by_id(&self, record_id: Uuid) -> anyhow::Result<()>;
}

/// Read-only lookup into the pets owned by the pet service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetDirectory: Send + Sync {
    async fn get_pet_by_id(&self, pet_id: Uuid) -> anyhow::Result<Option<models::pet::Pet>>;
}

pub type ImplMedicalRecordRepo = Box<dyn MedicalRecordRepo>;
pub type ImplPetDirectory = Box<dyn PetDirectory>;
