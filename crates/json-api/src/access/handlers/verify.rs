//! Verify Access Handler

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use passgate_app::domain::access_logs::data::AccessAttempt;

use crate::{
    access::models::{AccessDirection, VerificationResponse},
    extensions::*,
    observability::observe_verification,
};

/// Verify Access Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerifyAccessRequest {
    /// The scanned QR payload
    #[serde(default)]
    pub qr_code: String,

    /// Reader or gate the code was presented at
    #[serde(default)]
    pub access_point_id: String,

    /// Reader metadata, stored verbatim with the access log
    #[salvo(schema(value_type = Option<Object>))]
    pub device_info: Option<Value>,

    #[serde(default)]
    pub access_type: AccessDirection,
}

/// Verify Access Handler
///
/// Every decision, grant or denial, is a 200; the access log is written
/// before responding.
#[endpoint(
    tags("access"),
    summary = "Verify a scanned pass",
    responses(
        (status_code = StatusCode::OK, description = "Access decision"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing QR code or access point"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<VerifyAccessRequest>,
    depot: &mut Depot,
) -> Result<Json<VerificationResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let request = json.into_inner();

    let qr_code = request.qr_code.non_blank_or_400("qrCode")?;
    let access_point_id = request
        .access_point_id
        .non_blank_or_400("accessPointId")?
        .to_owned();

    let now = Timestamp::now();

    let verification = state.app.verification.verify(qr_code, now).await;

    observe_verification(&verification);

    state
        .app
        .access_logs
        .record(
            AccessAttempt {
                access_point_id,
                access_type: request.access_type.into(),
                device_info: request.device_info,
                attempted_at: now,
            },
            &verification,
        )
        .await;

    Ok(Json(VerificationResponse::new(&verification, now)))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use passgate_app::domain::{
        access_logs::{MockAccessLogService, records::AccessType},
        passes::records::{PassStatus, PassUuid},
        students::records::StudentStatus,
        verification::{DenialReason, MockVerificationService, Verification},
    };

    use crate::test_helpers::{
        access_service, make_pass, make_student, strict_access_logs_mock,
        strict_verification_mock,
    };

    use super::*;

    fn make_service(
        verification: MockVerificationService,
        access_logs: MockAccessLogService,
    ) -> Service {
        access_service(
            verification,
            access_logs,
            Router::with_path("access/verify").post(handler),
        )
    }

    #[tokio::test]
    async fn test_verify_granted_returns_pass_and_logs_attempt() -> TestResult {
        let pass = make_pass(PassUuid::new(), PassStatus::Active);
        let pass_uuid = pass.uuid;
        let qr_code = pass.qr_code.clone();
        let expected_code = qr_code.clone();

        let mut verification = MockVerificationService::new();

        verification
            .expect_verify()
            .once()
            .withf(move |code, _| code == expected_code)
            .return_once(move |_, _| Verification::Granted {
                pass,
                student: make_student(StudentStatus::Active),
            });

        verification.expect_verify_batch().never();

        let mut access_logs = MockAccessLogService::new();

        access_logs
            .expect_record()
            .once()
            .withf(move |attempt, verification| {
                attempt.access_point_id == "main-gate"
                    && attempt.access_type == AccessType::Exit
                    && attempt.device_info == Some(json!({ "reader": "R-7" }))
                    && verification.pass().map(|pass| pass.uuid) == Some(pass_uuid)
            })
            .return_const(());

        access_logs.expect_list_for_pass().never();

        let response: VerificationResponse = TestClient::post("http://example.com/access/verify")
            .json(&json!({
                "qrCode": qr_code,
                "accessPointId": "main-gate",
                "deviceInfo": { "reader": "R-7" },
                "accessType": "exit",
            }))
            .send(&make_service(verification, access_logs))
            .await
            .take_json()
            .await?;

        assert!(response.valid, "expected a valid scan");
        assert!(response.access_granted, "expected the gate to open");
        assert_eq!(response.message, "Access granted");
        assert_eq!(
            response.pass.map(|pass| pass.uuid),
            Some(pass_uuid.into_uuid())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_verify_denial_is_still_200() -> TestResult {
        let mut verification = MockVerificationService::new();

        verification
            .expect_verify()
            .once()
            .return_once(|_, _| Verification::Denied {
                reason: DenialReason::InvalidCode,
                pass: None,
            });

        verification.expect_verify_batch().never();

        let mut access_logs = MockAccessLogService::new();

        access_logs
            .expect_record()
            .once()
            .withf(|attempt, verification| {
                attempt.access_type == AccessType::Entry
                    && verification.reason() == Some(DenialReason::InvalidCode)
            })
            .return_const(());

        access_logs.expect_list_for_pass().never();

        let mut res = TestClient::post("http://example.com/access/verify")
            .json(&json!({ "qrCode": "{\"passId\":\"forged\"}", "accessPointId": "main-gate" }))
            .send(&make_service(verification, access_logs))
            .await;

        let response: VerificationResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(!response.access_granted, "expected the gate to stay shut");
        assert_eq!(response.reason.as_deref(), Some("invalid QR code"));
        assert_eq!(response.message, "Access denied: invalid QR code");

        Ok(())
    }

    #[tokio::test]
    async fn test_verify_blank_qr_code_returns_400() -> TestResult {
        let res = TestClient::post("http://example.com/access/verify")
            .json(&json!({ "qrCode": "   ", "accessPointId": "main-gate" }))
            .send(&make_service(strict_verification_mock(), strict_access_logs_mock()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_verify_missing_access_point_returns_400() -> TestResult {
        let res = TestClient::post("http://example.com/access/verify")
            .json(&json!({ "qrCode": "{}" }))
            .send(&make_service(strict_verification_mock(), strict_access_logs_mock()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
