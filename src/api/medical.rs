//! # Medical API Module
//!
//! The five medical record operations. Each one receives an already verified
//! caller id, runs the ownership guard and then talks to the medical store.

use super::{ownership, revision};
use crate::{
    errors::MedicalError,
    metric,
    models::medical_record::{MedicalRecord, MedicalRecordCreate, MedicalRecordUpdate, NewMedicalRecord},
    repo,
};
use uuid::Uuid;

/// Stores a complete medical record for a pet owned by the caller.
pub async fn create_medical_record(
    caller_id: Uuid,
    payload: MedicalRecordCreate,
    medical_repo: &repo::ImplMedicalRecordRepo,
    pet_directory: &repo::ImplPetDirectory,
) -> Result<MedicalRecord, MedicalError> {
    let _span = logfire::span!("create_medical_record").entered();

    ownership::ensure_pet_owner(caller_id, payload.pet_id, pet_directory).await?;

    let record = medical_repo
        .insert(NewMedicalRecord::new(payload.pet_id, payload.data))
        .await?;

    metric::incr_medical_action_statds("create");
    Ok(record)
}

/// Retrieves the newest revision of the pet medical history.
///
/// # Errors
/// [`MedicalError::RecordNotFound`] when the pet has no history yet
pub async fn get_latest_medical_record(
    caller_id: Uuid,
    pet_id: Uuid,
    medical_repo: &repo::ImplMedicalRecordRepo,
    pet_directory: &repo::ImplPetDirectory,
) -> Result<MedicalRecord, MedicalError> {
    let _span = logfire::span!("get_latest_medical_record").entered();

    ownership::ensure_pet_owner(caller_id, pet_id, pet_directory).await?;

    let record = medical_repo
        .find_latest(pet_id)
        .await?
        .ok_or(MedicalError::RecordNotFound)?;

    metric::incr_medical_action_statds("get_latest");
    Ok(record)
}

/// Retrieves the full pet medical history, newest revision first.
///
/// # Errors
/// [`MedicalError::RecordNotFound`] when the pet has no history yet
pub async fn get_all_medical_records(
    caller_id: Uuid,
    pet_id: Uuid,
    medical_repo: &repo::ImplMedicalRecordRepo,
    pet_directory: &repo::ImplPetDirectory,
) -> Result<Vec<MedicalRecord>, MedicalError> {
    let _span = logfire::span!("get_all_medical_records").entered();

    ownership::ensure_pet_owner(caller_id, pet_id, pet_directory).await?;

    let records = medical_repo.find_all(pet_id).await?;
    if records.is_empty() {
        return Err(MedicalError::RecordNotFound);
    }

    metric::incr_medical_action_statds("get_all");
    Ok(records)
}

/// Appends a revision merging the supplied fields over the latest one.
pub async fn update_medical_record(
    caller_id: Uuid,
    payload: MedicalRecordUpdate,
    medical_repo: &repo::ImplMedicalRecordRepo,
    pet_directory: &repo::ImplPetDirectory,
) -> Result<MedicalRecord, MedicalError> {
    let _span = logfire::span!("update_medical_record").entered();

    ownership::ensure_pet_owner(caller_id, payload.pet_id, pet_directory).await?;

    let record = revision::apply(payload.pet_id, &payload.changes, medical_repo)
        .await
        .inspect_err(|e| metric::incr_rejection_statds(e.reason()))?;

    metric::incr_medical_action_statds("update");
    Ok(record)
}

/// Removes one revision, whichever its position in the history. Ownership is
/// checked against the pet the revision belongs to.
pub async fn delete_medical_record(
    caller_id: Uuid,
    record_id: Uuid,
    medical_repo: &repo::ImplMedicalRecordRepo,
    pet_directory: &repo::ImplPetDirectory,
) -> Result<(), MedicalError> {
    let _span = logfire::span!("delete_medical_record").entered();

    let record = medical_repo
        .find_by_id(record_id)
        .await?
        .ok_or(MedicalError::RecordNotFound)?;

    ownership::ensure_pet_owner(caller_id, record.pet_id, pet_directory).await?;

    medical_repo.delete_by_id(record.id).await?;

    metric::incr_medical_action_statds("delete");
    Ok(())
}
