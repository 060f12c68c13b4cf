//! Conversions from external infrastructure errors into domain errors.

use paceline_domain::PacelineError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PacelineError);

impl From<InfraError> for PacelineError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PacelineError> for InfraError {
    fn from(value: PacelineError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoPacelineError {
    fn into_paceline(self) -> PacelineError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → PacelineError */
/* -------------------------------------------------------------------------- */

impl IntoPacelineError for SqlError {
    fn into_paceline(self) -> PacelineError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        PacelineError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        PacelineError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        PacelineError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        PacelineError::Database("foreign key constraint violation".into())
                    }
                    _ => PacelineError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => PacelineError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                PacelineError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                PacelineError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                PacelineError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidParameterName(parameter_name) => {
                PacelineError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => PacelineError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => PacelineError::Database("invalid SQL query".into()),
            other => PacelineError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_paceline())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → PacelineError */
/* -------------------------------------------------------------------------- */

impl IntoPacelineError for r2d2::Error {
    fn into_paceline(self) -> PacelineError {
        PacelineError::Database(format!("connection pool error: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_paceline())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
