//! Revision engine for pet medical histories.
//!
//! Medical histories are append-only: an update never rewrites a stored row,
//! it merges the supplied fields over the latest revision and appends the
//! result as a new revision. Updates that would append a copy of the latest
//! revision are rejected so client retries don't pollute the history.

use crate::{
    errors::MedicalError,
    models::medical_record::{ClinicalData, MedicalRecord, MedicalRecordChanges, NewMedicalRecord},
    repo,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Appends a new revision for `pet_id` built from `changes`.
///
/// # Process
/// 1. Reject an update without fields before touching the store
/// 2. Fetch the latest revision of the pet
/// 3. Without history, build the first revision from the supplied fields and
///    defaults (`weight` 0, `sterilized` false, `lastVisitDate` now, empty texts)
/// 4. With history, take each supplied field or else the latest value
/// 5. Reject a candidate equal to the latest revision
/// 6. Append the candidate with a fresh id and creation time
///
/// # Errors
/// - [`MedicalError::EmptyUpdate`] when `changes` has no field
/// - [`MedicalError::NoOpUpdate`] when the candidate duplicates the latest revision
/// - [`MedicalError::StoreUnavailable`] when the store fails
pub async fn apply(
    pet_id: Uuid,
    changes: &MedicalRecordChanges,
    repo: &repo::ImplMedicalRecordRepo,
) -> Result<MedicalRecord, MedicalError> {
    apply_at(pet_id, changes, repo, Utc::now()).await
}

pub(crate) async fn apply_at(
    pet_id: Uuid,
    changes: &MedicalRecordChanges,
    repo: &repo::ImplMedicalRecordRepo,
    now: DateTime<Utc>,
) -> Result<MedicalRecord, MedicalError> {
    let _span = logfire::span!("apply_medical_revision").entered();

    if changes.is_empty() {
        return Err(MedicalError::EmptyUpdate);
    }

    let candidate = match repo.find_latest(pet_id).await? {
        None => NewMedicalRecord {
            id: Some(Uuid::new_v4()),
            pet_id,
            data: first_revision_data(changes, now),
            created_at: Some(now),
        },
        Some(latest) => {
            let data = merge_changes(&latest.data, changes);

            if is_duplicate_revision(&latest, &data, changes, now) {
                logfire::info!(
                    "Update for pet {pet_id} matches revision {revision_id}",
                    pet_id = pet_id.to_string(),
                    revision_id = latest.id.to_string()
                );
                return Err(MedicalError::NoOpUpdate);
            }

            NewMedicalRecord {
                id: Some(Uuid::new_v4()),
                pet_id: latest.pet_id,
                data,
                created_at: Some(now),
            }
        }
    };

    Ok(repo.insert(candidate).await?)
}

fn first_revision_data(changes: &MedicalRecordChanges, now: DateTime<Utc>) -> ClinicalData {
    ClinicalData {
        last_visit_date: changes.last_visit_date.unwrap_or(now),
        weight: changes.weight.unwrap_or(0.0),
        health_status: changes.health_status.clone().unwrap_or_default(),
        diseases: changes.diseases.clone(),
        treatments: changes.treatments.clone(),
        vaccinations: changes.vaccinations.clone().unwrap_or_default(),
        allergies: changes.allergies.clone(),
        special_care: changes.special_care.clone(),
        sterilized: changes.sterilized.unwrap_or(false),
    }
}

fn merge_changes(latest: &ClinicalData, changes: &MedicalRecordChanges) -> ClinicalData {
    ClinicalData {
        last_visit_date: changes.last_visit_date.unwrap_or(latest.last_visit_date),
        weight: changes.weight.unwrap_or(latest.weight),
        health_status: changes
            .health_status
            .clone()
            .unwrap_or_else(|| latest.health_status.clone()),
        diseases: changes.diseases.clone().or_else(|| latest.diseases.clone()),
        treatments: changes
            .treatments
            .clone()
            .or_else(|| latest.treatments.clone()),
        vaccinations: changes
            .vaccinations
            .clone()
            .unwrap_or_else(|| latest.vaccinations.clone()),
        allergies: changes.allergies.clone().or_else(|| latest.allergies.clone()),
        special_care: changes
            .special_care
            .clone()
            .or_else(|| latest.special_care.clone()),
        sterilized: changes.sterilized.unwrap_or(latest.sterilized),
    }
}

/// `lastVisitDate` is compared by date only, every other field exactly
fn same_clinical_snapshot(latest: &ClinicalData, candidate: &ClinicalData) -> bool {
    latest.last_visit_date.date_naive() == candidate.last_visit_date.date_naive()
        && latest.weight == candidate.weight
        && latest.health_status == candidate.health_status
        && latest.diseases == candidate.diseases
        && latest.treatments == candidate.treatments
        && latest.vaccinations == candidate.vaccinations
        && latest.allergies == candidate.allergies
        && latest.special_care == candidate.special_care
        && latest.sterilized == candidate.sterilized
}

/// A copy of the latest revision is a retry. When the caller omits
/// `lastVisitDate` it is inherited, so a copy created on a later day is a new
/// check-up instead.
fn is_duplicate_revision(
    latest: &MedicalRecord,
    candidate: &ClinicalData,
    changes: &MedicalRecordChanges,
    now: DateTime<Utc>,
) -> bool {
    if !same_clinical_snapshot(&latest.data, candidate) {
        return false;
    }

    changes.last_visit_date.is_some() || latest.created_at.date_naive() == now.date_naive()
}
