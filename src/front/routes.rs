//! Route configuration module.
//!
//! Every medical record operation lives under the `/medical` scope.

use super::medical;
use ntex::web;

/// Configures medical record routes.
///
/// # Routes
/// - `POST /medical` - Create a medical record
/// - `POST /medical/create` - Create a medical record (older clients)
/// - `POST /medical/update` - Append a revision merged over the latest one
/// - `GET /medical/latest/{pet_id}` - Latest revision of a pet
/// - `DELETE /medical/delete/{id}` - Delete one revision
/// - `GET /medical/{pet_id}` - Every revision of a pet, newest first
pub fn medical(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/medical").service((
        medical::create_medical_record,
        medical::create_medical_record_legacy,
        medical::update_medical_record,
        medical::get_latest_medical_record,
        medical::delete_medical_record,
        medical::get_all_medical_records,
    )));
}
