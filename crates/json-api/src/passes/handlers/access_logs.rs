//! Pass Access Logs Handler

use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use passgate_app::domain::access_logs::{data::DEFAULT_LIST_LIMIT, records::AccessLogRecord};

use crate::extensions::*;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccessLogResponse {
    pub uuid: Uuid,
    pub student_uuid: Option<Uuid>,
    pub pass_uuid: Option<Uuid>,
    pub access_point_id: String,
    pub accessed_at: String,

    /// `entry` or `exit`
    pub access_type: String,

    /// `granted` or `denied`
    pub status: String,

    pub reason: Option<String>,

    #[salvo(schema(value_type = Option<Object>))]
    pub device_info: Option<Value>,
}

impl From<AccessLogRecord> for AccessLogResponse {
    fn from(log: AccessLogRecord) -> Self {
        Self {
            uuid: log.uuid.into(),
            student_uuid: log.student_uuid.map(Into::into),
            pass_uuid: log.pass_uuid.map(Into::into),
            access_point_id: log.access_point_id,
            accessed_at: log.accessed_at.to_string(),
            access_type: log.access_type.to_string(),
            status: log.status.to_string(),
            reason: log.reason,
            device_info: log.device_info,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccessLogsResponse {
    /// Newest first
    pub access_logs: Vec<AccessLogResponse>,
}

/// Pass Access Logs Handler
///
/// Recent scans of a pass, for working out why a gate refused someone.
/// `limit` defaults to 50 and is clamped to 500.
#[endpoint(
    tags("passes"),
    summary = "List Pass Access Logs",
    responses(
        (status_code = StatusCode::OK, description = "Recent access attempts"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    pass: PathParam<Uuid>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<AccessLogsResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let logs = state
        .app
        .access_logs
        .list_for_pass(
            pass.into_inner().into(),
            limit.into_inner().unwrap_or(DEFAULT_LIST_LIMIT),
        )
        .await
        .or_500("failed to fetch access logs")?;

    Ok(Json(AccessLogsResponse {
        access_logs: logs.into_iter().map(Into::into).collect(),
    }))
}
