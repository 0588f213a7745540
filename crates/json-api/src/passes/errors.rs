//! Pass Errors

use salvo::http::StatusError;
use tracing::error;

use passgate_app::domain::passes::PassesServiceError;

pub(crate) fn into_status_error(error: PassesServiceError) -> StatusError {
    match error {
        PassesServiceError::NotFound => StatusError::not_found().brief("Pass not found"),
        PassesServiceError::StudentNotFound => {
            StatusError::not_found().brief("Student not found")
        }
        PassesServiceError::StudentInactive(status) => {
            StatusError::conflict().brief(format!("Student is {status}"))
        }
        PassesServiceError::ActivePassExists => {
            StatusError::conflict().brief("Student already holds an active pass")
        }
        PassesServiceError::NotActive | PassesServiceError::Transition(_) => {
            StatusError::conflict().brief("Pass is not active")
        }
        PassesServiceError::MissingReason | PassesServiceError::InvalidValidity => {
            StatusError::bad_request().brief(error.to_string())
        }
        PassesServiceError::Repository(_)
        | PassesServiceError::Students(_)
        | PassesServiceError::QrCode(_)
        | PassesServiceError::Date(_) => {
            error!(error = ?error, "pass operation failed");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use passgate_app::domain::{
        passes::{
            PassesRepositoryError,
            records::{PassStatus, PassTransitionError},
        },
        qr::QrCodeError,
        students::records::StudentStatus,
    };

    use super::*;

    fn code(error: PassesServiceError) -> StatusCode {
        into_status_error(error).code
    }

    #[test]
    fn lifecycle_conflicts_are_409() {
        assert_eq!(code(PassesServiceError::ActivePassExists), StatusCode::CONFLICT);
        assert_eq!(code(PassesServiceError::NotActive), StatusCode::CONFLICT);
        assert_eq!(
            code(PassesServiceError::Transition(PassTransitionError::Terminal(
                PassStatus::Expired
            ))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            code(PassesServiceError::StudentInactive(StudentStatus::Graduated)),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn invalid_input_is_400() {
        assert_eq!(code(PassesServiceError::MissingReason), StatusCode::BAD_REQUEST);
        assert_eq!(code(PassesServiceError::InvalidValidity), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_failures_are_500() {
        assert_eq!(
            code(PassesServiceError::Repository(
                PassesRepositoryError::InvalidReference
            )),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            code(PassesServiceError::QrCode(QrCodeError::WeakSecret)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
