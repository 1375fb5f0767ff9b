use crate::domain::NewIncident;
use crate::error::AppError;

const MAX_DESCRIPTION_LEN: usize = 4000;
const MAX_NAME_LEN: usize = 200;

/// Validate creation fields before any row is written. Failures are
/// `VALIDATION_FAILED` with the offending field in the details; nothing is
/// corrected silently.
pub fn validate_new_incident(fields: &NewIncident) -> Result<(), AppError> {
    require_non_blank("reporter_name", &fields.reporter_name)?;
    require_non_blank("reporter_email", &fields.reporter_email)?;
    require_non_blank("description", &fields.description)?;

    if fields.reporter_name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation("reporter_name too long")
            .with_details(format!("max={MAX_NAME_LEN} characters")));
    }
    if fields.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(AppError::validation("description too long")
            .with_details(format!("max={MAX_DESCRIPTION_LEN} characters")));
    }

    // Shape check only (local@domain with a dot in the domain); real
    // deliverability is not this layer's concern.
    let email = fields.reporter_email.trim();
    let valid_email = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid_email {
        return Err(AppError::validation("reporter_email is not a valid address")
            .with_details(format!("value={email}")));
    }

    Ok(())
}

fn require_non_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(
            AppError::validation(format!("{field} is required")).with_details("blank value")
        );
    }
    Ok(())
}
