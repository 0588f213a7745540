//! Temporary Code Handler

use jiff::{SignedDuration, Timestamp};
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use passgate_app::domain::passes::data::TemporaryQrCode;

use crate::{extensions::*, passes::errors::into_status_error};

const DEFAULT_VALID_MINUTES: u32 = 15;

fn default_valid_minutes() -> u32 {
    DEFAULT_VALID_MINUTES
}

/// Temporary Code Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TemporaryCodeRequest {
    /// Minutes until the code stops working, at most 1440
    #[serde(default = "default_valid_minutes")]
    pub valid_minutes: u32,
}

/// Temporary Code Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TemporaryCodeResponse {
    pub pass_uuid: Uuid,

    /// Signed payload; it is not stored and cannot be fetched again
    pub qr_code: String,

    pub expires_at: String,
}

impl From<TemporaryQrCode> for TemporaryCodeResponse {
    fn from(code: TemporaryQrCode) -> Self {
        Self {
            pass_uuid: code.pass_uuid.into(),
            qr_code: code.qr_code,
            expires_at: code.expires_at.to_string(),
        }
    }
}

/// Temporary Code Handler
///
/// Signs a short-lived stand-in code for an active pass, e.g. when the
/// holder has left their card at home.
#[endpoint(
    tags("passes"),
    summary = "Issue Temporary Code",
    responses(
        (status_code = StatusCode::CREATED, description = "Temporary code issued"),
        (status_code = StatusCode::BAD_REQUEST, description = "Validity out of range"),
        (status_code = StatusCode::NOT_FOUND, description = "Pass not found"),
        (status_code = StatusCode::CONFLICT, description = "Pass is not active"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    pass: PathParam<Uuid>,
    json: JsonBody<TemporaryCodeRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<TemporaryCodeResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let validity = SignedDuration::from_mins(i64::from(json.into_inner().valid_minutes));

    let code = state
        .app
        .passes
        .issue_temporary_code(pass.into_inner().into(), validity, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(code.into()))
}
