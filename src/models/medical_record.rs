use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Clinical snapshot carried by every revision of a pet medical history
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalData {
    pub last_visit_date: DateTime<Utc>,
    pub weight: f64,
    pub health_status: String,
    pub diseases: Option<String>,
    pub treatments: Option<String>,
    pub vaccinations: String,
    pub allergies: Option<String>,
    pub special_care: Option<String>,
    pub sterilized: bool,
}

/// One stored revision. Rows are never mutated, a pet's current state is the
/// row with the greatest `created_at`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: Uuid,
    pub pet_id: Uuid,
    #[serde(flatten)]
    pub data: ClinicalData,
    pub created_at: DateTime<Utc>,
}

/// Revision waiting to be appended. The store fills `id` and `created_at`
/// when they are left empty.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMedicalRecord {
    pub id: Option<Uuid>,
    pub pet_id: Uuid,
    pub data: ClinicalData,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewMedicalRecord {
    pub fn new(pet_id: Uuid, data: ClinicalData) -> Self {
        Self {
            id: None,
            pet_id,
            data,
            created_at: None,
        }
    }
}

/// Body of the create operation, every clinical field but the optional texts
/// is mandatory
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordCreate {
    pub pet_id: Uuid,
    #[serde(flatten)]
    pub data: ClinicalData,
}

/// Fields a caller wants to change on top of the latest revision
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordChanges {
    pub last_visit_date: Option<DateTime<Utc>>,
    pub weight: Option<f64>,
    pub health_status: Option<String>,
    pub diseases: Option<String>,
    pub treatments: Option<String>,
    pub vaccinations: Option<String>,
    pub allergies: Option<String>,
    pub special_care: Option<String>,
    pub sterilized: Option<bool>,
}

impl MedicalRecordChanges {
    pub fn is_empty(&self) -> bool {
        self.last_visit_date.is_none()
            && self.weight.is_none()
            && self.health_status.is_none()
            && self.diseases.is_none()
            && self.treatments.is_none()
            && self.vaccinations.is_none()
            && self.allergies.is_none()
            && self.special_care.is_none()
            && self.sterilized.is_none()
    }
}

/// Body of the update operation
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordUpdate {
    pub pet_id: Uuid,
    #[serde(flatten)]
    pub changes: MedicalRecordChanges,
}
