//! Issue Pass Handler

use jiff::Timestamp;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use passgate_app::domain::passes::data::{DEFAULT_PASS_TYPE, NewPass};

use crate::{
    extensions::*,
    passes::{errors::into_status_error, models::PassResponse},
};

fn default_pass_type() -> String {
    DEFAULT_PASS_TYPE.to_string()
}

/// Issue Pass Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IssuePassRequest {
    /// Student receiving the pass
    pub student_uuid: Uuid,

    /// Staff member issuing the pass
    pub issued_by: Uuid,

    /// Pass type label
    #[serde(default = "default_pass_type")]
    pub pass_type: String,
}

impl From<IssuePassRequest> for NewPass {
    fn from(request: IssuePassRequest) -> Self {
        NewPass {
            student_uuid: request.student_uuid.into(),
            pass_type: request.pass_type,
            issued_by: request.issued_by.into(),
        }
    }
}

/// Issue Pass Handler
#[endpoint(
    tags("passes"),
    summary = "Issue Pass",
    responses(
        (status_code = StatusCode::CREATED, description = "Pass issued"),
        (status_code = StatusCode::NOT_FOUND, description = "Student not found"),
        (status_code = StatusCode::CONFLICT, description = "Student is inactive or already holds an active pass"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<IssuePassRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<PassResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let pass = state
        .app
        .passes
        .issue_pass(json.into_inner().into(), Timestamp::now())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/passes/{}", pass.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(pass.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use passgate_app::domain::{
        passes::{
            MockPassesService, PassesServiceError,
            records::{PassStatus, PassUuid},
        },
        students::records::StudentStatus,
    };

    use crate::test_helpers::{TEST_STAFF_UUID, TEST_STUDENT_UUID, make_pass, passes_service};

    use super::*;

    fn make_service(passes: MockPassesService) -> Service {
        passes_service(passes, Router::with_path("passes").post(handler))
    }

    fn issue_request() -> serde_json::Value {
        json!({
            "studentUuid": TEST_STUDENT_UUID.into_uuid(),
            "issuedBy": TEST_STAFF_UUID.into_uuid(),
        })
    }

    #[tokio::test]
    async fn test_issue_pass_success() -> TestResult {
        let uuid = PassUuid::new();
        let pass = make_pass(uuid, PassStatus::Active);

        let mut passes = MockPassesService::new();

        passes
            .expect_issue_pass()
            .once()
            .withf(|new, _| {
                *new == NewPass {
                    student_uuid: TEST_STUDENT_UUID,
                    pass_type: DEFAULT_PASS_TYPE.to_string(),
                    issued_by: TEST_STAFF_UUID,
                }
            })
            .return_once(move |_, _| Ok(pass));

        passes.expect_revoke_pass().never();
        passes.expect_issue_temporary_code().never();
        passes.expect_refresh_qr_code().never();
        passes.expect_get_pass().never();

        let mut res = TestClient::post("http://example.com/passes")
            .json(&issue_request())
            .send(&make_service(passes))
            .await;

        let body: PassResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/passes/{uuid}").as_str()));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.pass_number, "THS-2026-000001");
        assert_eq!(body.status, "active");

        Ok(())
    }

    #[tokio::test]
    async fn test_issue_pass_with_live_pass_returns_409() -> TestResult {
        let mut passes = MockPassesService::new();

        passes
            .expect_issue_pass()
            .once()
            .return_once(|_, _| Err(PassesServiceError::ActivePassExists));

        passes.expect_revoke_pass().never();
        passes.expect_issue_temporary_code().never();
        passes.expect_refresh_qr_code().never();
        passes.expect_get_pass().never();

        let res = TestClient::post("http://example.com/passes")
            .json(&issue_request())
            .send(&make_service(passes))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_issue_pass_for_suspended_student_returns_409() -> TestResult {
        let mut passes = MockPassesService::new();

        passes
            .expect_issue_pass()
            .once()
            .return_once(|_, _| Err(PassesServiceError::StudentInactive(StudentStatus::Suspended)));

        passes.expect_revoke_pass().never();
        passes.expect_issue_temporary_code().never();
        passes.expect_refresh_qr_code().never();
        passes.expect_get_pass().never();

        let res = TestClient::post("http://example.com/passes")
            .json(&issue_request())
            .send(&make_service(passes))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
