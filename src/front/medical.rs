//! Medical record endpoints.
//!
//! Every endpoint authenticates the caller from the `Authorization` header
//! and answers JSON, failures as `{"message": "<reason>"}`.

use crate::{
    api, consts,
    front::{
        AppState, auth,
        errors::{ApiError, Operation, UserError},
    },
    models::medical_record::{MedicalRecordCreate, MedicalRecordUpdate},
};
use ntex::web::{
    self,
    error::{JsonPayloadError, PathError},
};
use serde_json::json;
use uuid::Uuid;

type JsonBody<T> = Result<web::types::Json<T>, JsonPayloadError>;
type UrlPath<T> = Result<web::types::Path<T>, PathError>;

#[derive(serde::Deserialize)]
struct PetPath {
    pet_id: Uuid,
}

#[derive(serde::Deserialize)]
struct RecordPath {
    id: Uuid,
}

/// Payload errors are reported after authentication, with a JSON body
fn json_body<T>(payload: JsonBody<T>) -> Result<T, UserError> {
    payload
        .map(web::types::Json::into_inner)
        .map_err(|e| UserError::InvalidBody(e.to_string()))
}

fn url_path<T>(path: UrlPath<T>) -> Result<T, UserError> {
    path.map(web::types::Path::into_inner)
        .map_err(|_| UserError::InvalidPath)
}

async fn create(
    req: &web::HttpRequest,
    app_state: &AppState,
    payload: JsonBody<MedicalRecordCreate>,
) -> Result<web::HttpResponse, web::Error> {
    let caller_id = auth::caller_identity(req, &app_state.jwt_secret)
        .map_err(|e| ApiError::new(Operation::Create, e))?;
    let payload = json_body(payload)?;

    let record = api::medical::create_medical_record(
        caller_id,
        payload,
        &app_state.medical_repo,
        &app_state.pet_directory,
    )
    .await
    .map_err(|e| ApiError::new(Operation::Create, e))?;

    Ok(web::HttpResponse::Ok().json(&record))
}

/// Create a medical record for a pet of the caller
#[web::post("")]
async fn create_medical_record(
    req: web::HttpRequest,
    app_state: web::types::State<AppState>,
    payload: JsonBody<MedicalRecordCreate>,
) -> Result<impl web::Responder, web::Error> {
    create(&req, &app_state, payload).await
}

/// Same as [create_medical_record], path used by older clients
#[web::post("/create")]
async fn create_medical_record_legacy(
    req: web::HttpRequest,
    app_state: web::types::State<AppState>,
    payload: JsonBody<MedicalRecordCreate>,
) -> Result<impl web::Responder, web::Error> {
    create(&req, &app_state, payload).await
}

/// Latest revision of the pet medical history
#[web::get("/latest/{pet_id}")]
async fn get_latest_medical_record(
    req: web::HttpRequest,
    app_state: web::types::State<AppState>,
    path: UrlPath<PetPath>,
) -> Result<impl web::Responder, web::Error> {
    let caller_id = auth::caller_identity(&req, &app_state.jwt_secret)
        .map_err(|e| ApiError::new(Operation::GetLatest, e))?;
    let path = url_path(path)?;

    let record = api::medical::get_latest_medical_record(
        caller_id,
        path.pet_id,
        &app_state.medical_repo,
        &app_state.pet_directory,
    )
    .await
    .map_err(|e| ApiError::new(Operation::GetLatest, e))?;

    Ok(web::HttpResponse::Ok().json(&record))
}

/// Whole pet medical history, newest first
#[web::get("/{pet_id}")]
async fn get_all_medical_records(
    req: web::HttpRequest,
    app_state: web::types::State<AppState>,
    path: UrlPath<PetPath>,
) -> Result<impl web::Responder, web::Error> {
    let caller_id = auth::caller_identity(&req, &app_state.jwt_secret)
        .map_err(|e| ApiError::new(Operation::GetAll, e))?;
    let path = url_path(path)?;

    let records = api::medical::get_all_medical_records(
        caller_id,
        path.pet_id,
        &app_state.medical_repo,
        &app_state.pet_directory,
    )
    .await
    .map_err(|e| ApiError::new(Operation::GetAll, e))?;

    Ok(web::HttpResponse::Ok().json(&records))
}

/// Append a revision with the supplied fields merged over the latest one
#[web::post("/update")]
async fn update_medical_record(
    req: web::HttpRequest,
    app_state: web::types::State<AppState>,
    payload: JsonBody<MedicalRecordUpdate>,
) -> Result<impl web::Responder, web::Error> {
    let caller_id = auth::caller_identity(&req, &app_state.jwt_secret)
        .map_err(|e| ApiError::new(Operation::Update, e))?;
    let payload = json_body(payload)?;

    let record = api::medical::update_medical_record(
        caller_id,
        payload,
        &app_state.medical_repo,
        &app_state.pet_directory,
    )
    .await
    .map_err(|e| ApiError::new(Operation::Update, e))?;

    Ok(web::HttpResponse::Ok().json(&record))
}

/// Delete one revision by its own id
#[web::delete("/delete/{id}")]
async fn delete_medical_record(
    req: web::HttpRequest,
    app_state: web::types::State<AppState>,
    path: UrlPath<RecordPath>,
) -> Result<impl web::Responder, web::Error> {
    let caller_id = auth::caller_identity(&req, &app_state.jwt_secret)
        .map_err(|e| ApiError::new(Operation::Delete, e))?;
    let path = url_path(path)?;

    api::medical::delete_medical_record(
        caller_id,
        path.id,
        &app_state.medical_repo,
        &app_state.pet_directory,
    )
    .await
    .map_err(|e| ApiError::new(Operation::Delete, e))?;

    Ok(web::HttpResponse::Ok().json(&json!({
        "message": consts::MEDICAL_RECORD_DELETED_MSG,
    })))
}
