//! Refresh QR Code Handler

use jiff::Timestamp;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    passes::{errors::into_status_error, models::PassResponse},
};

/// Refresh QR Code Handler
///
/// Re-signs the stored code so it falls back inside the replay window. The
/// previous code stops working.
#[endpoint(
    tags("passes"),
    summary = "Refresh QR Code",
    responses(
        (status_code = StatusCode::OK, description = "Code refreshed"),
        (status_code = StatusCode::NOT_FOUND, description = "Pass not found"),
        (status_code = StatusCode::CONFLICT, description = "Pass is not active"),
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
        .refresh_qr_code(pass.into_inner().into(), Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(pass.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use passgate_app::domain::passes::{
        MockPassesService, PassesServiceError,
        records::{PassStatus, PassUuid},
    };

    use crate::test_helpers::{make_pass, passes_service};

    use super::*;

    fn make_service(passes: MockPassesService) -> Service {
        passes_service(
            passes,
            Router::with_path("passes/{pass}/refresh").post(handler),
        )
    }

    #[tokio::test]
    async fn test_refresh_returns_the_new_code() -> TestResult {
        let uuid = PassUuid::new();
        let mut refreshed = make_pass(uuid, PassStatus::Active);
        refreshed.qr_code = "{\"refreshed\":true}".to_string();

        let mut passes = MockPassesService::new();

        passes
            .expect_refresh_qr_code()
            .once()
            .withf(move |pass, _| *pass == uuid)
            .return_once(move |_, _| Ok(refreshed));

        passes.expect_issue_pass().never();
        passes.expect_revoke_pass().never();
        passes.expect_issue_temporary_code().never();
        passes.expect_get_pass().never();

        let response: PassResponse =
            TestClient::post(format!("http://example.com/passes/{uuid}/refresh"))
                .send(&make_service(passes))
                .await
                .take_json()
                .await?;

        assert_eq!(response.qr_code, "{\"refreshed\":true}");

        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_unknown_pass_returns_404() -> TestResult {
        let mut passes = MockPassesService::new();

        passes
            .expect_refresh_qr_code()
            .once()
            .return_once(|_, _| Err(PassesServiceError::NotFound));

        passes.expect_issue_pass().never();
        passes.expect_revoke_pass().never();
        passes.expect_issue_temporary_code().never();
        passes.expect_get_pass().never();

        let res = TestClient::post(format!(
            "http://example.com/passes/{}/refresh",
            PassUuid::new()
        ))
        .send(&make_service(passes))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
