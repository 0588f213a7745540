//! Batch Verify Access Handler

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use passgate_app::domain::{
    access_logs::data::AccessAttempt,
    verification::{BatchVerification, BatchVerificationError},
};

use crate::{
    access::models::{AccessDirection, BatchEntryResponse, VerificationResponse},
    extensions::*,
    observability::observe_verification,
};

/// Batch Verify Access Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchVerifyAccessRequest {
    /// Scanned QR payloads, at most 100
    #[serde(default)]
    pub qr_codes: Vec<String>,

    /// Reader or gate the codes were presented at
    #[serde(default)]
    pub access_point_id: String,

    #[salvo(schema(value_type = Option<Object>))]
    pub device_info: Option<Value>,

    #[serde(default)]
    pub access_type: AccessDirection,
}

fn into_status_error(error: BatchVerificationError) -> StatusError {
    StatusError::bad_request().brief(error.to_string())
}

/// Batch Verify Access Handler
///
/// Verifies up to 100 codes in order. Each entry is logged as its own
/// access attempt.
#[endpoint(
    tags("access"),
    summary = "Verify a batch of scanned passes",
    responses(
        (status_code = StatusCode::OK, description = "One decision per code, in input order"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty or oversized batch"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<BatchVerifyAccessRequest>,
    depot: &mut Depot,
) -> Result<Json<Vec<BatchEntryResponse>>, StatusError> {
    let state = depot.state_or_500()?;
    let request = json.into_inner();

    let access_point_id = request
        .access_point_id
        .non_blank_or_400("accessPointId")?
        .to_owned();

    let now = Timestamp::now();

    let results = state
        .app
        .verification
        .verify_batch(request.qr_codes, now)
        .await
        .map_err(into_status_error)?;

    let mut responses = Vec::with_capacity(results.len());

    for BatchVerification {
        qr_code,
        verification,
    } in results
    {
        observe_verification(&verification);

        state
            .app
            .access_logs
            .record(
                AccessAttempt {
                    access_point_id: access_point_id.clone(),
                    access_type: request.access_type.into(),
                    device_info: request.device_info.clone(),
                    attempted_at: now,
                },
                &verification,
            )
            .await;

        responses.push(BatchEntryResponse {
            qr_code,
            result: VerificationResponse::new(&verification, now),
        });
    }

    Ok(Json(responses))
}
