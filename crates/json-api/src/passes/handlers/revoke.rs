//! Revoke Pass Handler

use jiff::Timestamp;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use passgate_app::domain::passes::data::RevokePass;

use crate::{
    extensions::*,
    passes::{errors::into_status_error, models::PassResponse},
};

/// Revoke Pass Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RevokePassRequest {
    /// Staff member revoking the pass
    pub revoked_by: Uuid,

    /// Why the pass is being revoked
    #[serde(default)]
    pub reason: String,
}

/// Revoke Pass Handler
///
/// Takes effect immediately for every gate served by this process.
#[endpoint(
    tags("passes"),
    summary = "Revoke Pass",
    responses(
        (status_code = StatusCode::OK, description = "Pass revoked"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing reason"),
        (status_code = StatusCode::NOT_FOUND, description = "Pass not found"),
        (status_code = StatusCode::CONFLICT, description = "Pass is not active"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    pass: PathParam<Uuid>,
    json: JsonBody<RevokePassRequest>,
    depot: &mut Depot,
) -> Result<Json<PassResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let request = json.into_inner();

    let reason = request.reason.non_blank_or_400("reason")?.to_owned();

    let pass = state
        .app
        .passes
        .revoke_pass(
            pass.into_inner().into(),
            RevokePass {
                revoked_by: request.revoked_by.into(),
                reason,
            },
            Timestamp::now(),
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(pass.into()))
}
