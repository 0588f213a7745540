//! Get Pass Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    passes::{errors::into_status_error, models::PassResponse},
};

/// Get Pass Handler
///
/// Reads from the store, never the verification cache.
#[endpoint(
    tags("passes"),
    summary = "Get Pass",
    responses(
        (status_code = StatusCode::OK, description = "Pass found"),
        (status_code = StatusCode::NOT_FOUND, description = "Pass not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    pass: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<PassResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let pass = state
        .app
        .passes
        .get_pass(pass.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(pass.into()))
}
