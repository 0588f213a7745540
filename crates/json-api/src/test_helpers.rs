//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use passgate_app::{
    context::AppContext,
    domain::{
        access_logs::MockAccessLogService,
        passes::{
            MockPassesService,
            records::{PassRecord, PassStatus, PassUuid},
        },
        students::records::{SchoolUuid, StudentRecord, StudentStatus, StudentUuid},
        users::UserUuid,
        verification::MockVerificationService,
    },
};

use crate::state::State;

pub(crate) const TEST_STUDENT_UUID: StudentUuid = StudentUuid::from_uuid(Uuid::nil());
pub(crate) const TEST_SCHOOL_UUID: SchoolUuid = SchoolUuid::from_uuid(Uuid::from_u128(2));
pub(crate) const TEST_STAFF_UUID: UserUuid = UserUuid::from_uuid(Uuid::from_u128(7));

/// 2026-03-01T08:00:00Z
pub(crate) const TEST_ISSUED_AT: Timestamp = Timestamp::constant(1_772_352_000, 0);

pub(crate) fn make_student(status: StudentStatus) -> StudentRecord {
    StudentRecord {
        uuid: TEST_STUDENT_UUID,
        school_uuid: TEST_SCHOOL_UUID,
        school_code: "THS".to_string(),
        status,
    }
}

pub(crate) fn make_pass(uuid: PassUuid, status: PassStatus) -> PassRecord {
    let issued_at = TEST_ISSUED_AT;

    PassRecord {
        uuid,
        pass_number: "THS-2026-000001".to_string(),
        student_uuid: TEST_STUDENT_UUID,
        school_uuid: TEST_SCHOOL_UUID,
        qr_code: format!("{{\"passId\":\"{uuid}\"}}"),
        pass_type: "student".to_string(),
        status,
        issued_at,
        expires_at: Timestamp::constant(1_803_888_000, 0),
        issued_by: TEST_STAFF_UUID,
        revoked_by: None,
        revoked_at: None,
        revocation_reason: None,
        created_at: issued_at,
        updated_at: issued_at,
    }
}

pub(crate) fn strict_passes_mock() -> MockPassesService {
    let mut passes = MockPassesService::new();

    passes.expect_issue_pass().never();
    passes.expect_revoke_pass().never();
    passes.expect_issue_temporary_code().never();
    passes.expect_refresh_qr_code().never();
    passes.expect_get_pass().never();

    passes
}

pub(crate) fn strict_verification_mock() -> MockVerificationService {
    let mut verification = MockVerificationService::new();

    verification.expect_verify().never();
    verification.expect_verify_batch().never();

    verification
}

pub(crate) fn strict_access_logs_mock() -> MockAccessLogService {
    let mut access_logs = MockAccessLogService::new();

    access_logs.expect_record().never();
    access_logs.expect_list_for_pass().never();

    access_logs
}

pub(crate) fn app_context(
    passes: MockPassesService,
    verification: MockVerificationService,
    access_logs: MockAccessLogService,
) -> AppContext {
    AppContext {
        passes: Arc::new(passes),
        verification: Arc::new(verification),
        access_logs: Arc::new(access_logs),
    }
}

pub(crate) fn service(app: AppContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::from_app_context(app)))
            .push(route),
    )
}

/// A service where only the pass registry is expected to be called.
pub(crate) fn passes_service(passes: MockPassesService, route: Router) -> Service {
    service(
        app_context(passes, strict_verification_mock(), strict_access_logs_mock()),
        route,
    )
}

/// A service for the gate endpoints, which never touch the pass registry.
pub(crate) fn access_service(
    verification: MockVerificationService,
    access_logs: MockAccessLogService,
    route: Router,
) -> Service {
    service(
        app_context(strict_passes_mock(), verification, access_logs),
        route,
    )
}
