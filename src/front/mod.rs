pub mod auth;
pub mod errors;
pub mod medical;
pub mod routes;
pub mod server;

use crate::repo;

pub struct AppState {
    pub jwt_secret: String,
    pub medical_repo: repo::ImplMedicalRecordRepo,
    pub pet_directory: repo::ImplPetDirectory,
}
