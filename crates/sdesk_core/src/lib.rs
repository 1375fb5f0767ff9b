pub mod categorize;
pub mod db;
pub mod demo;
pub mod domain;
pub mod error;
pub mod lifecycle;
pub mod monitor;
pub mod policy;
pub mod sla;
pub mod store;
pub mod timefmt;
pub mod validate;

#[cfg(test)]
mod tests {
    use super::error::AppError;

    #[test]
    fn app_error_is_structured() {
        let err = AppError::new("DB_TEST", "db failed").with_retryable(false);
        assert_eq!(err.code, "DB_TEST");
        assert_eq!(err.message, "db failed");
        assert_eq!(err.retryable, false);
    }

    #[test]
    fn error_constructors_use_stable_codes() {
        assert_eq!(AppError::not_found(7).code, super::error::NOT_FOUND);
        assert_eq!(
            AppError::invalid_transition("dup").code,
            super::error::INVALID_TRANSITION
        );
        assert_eq!(
            AppError::unknown_priority("P9").code,
            super::error::UNKNOWN_PRIORITY
        );
        assert_eq!(
            AppError::validation("blank").code,
            super::error::VALIDATION_FAILED
        );
    }
}
