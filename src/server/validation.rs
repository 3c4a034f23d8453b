use crate::server::response::ApiError;

const MIN_PASSWORD_LEN: usize = 6;
const MAX_PASSWORD_LEN: usize = 64;
const MAX_EMAIL_LEN: usize = 254;
const MAX_TRIP_NAME_LEN: usize = 100;

/// Syntactic email check: one '@' with a non-empty local part and a
/// domain containing a dot. Deliverability is not our problem.
fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN || email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if !is_valid_email(email) {
        return Err(ApiError::bad_request("Please enter a valid email address"));
    }
    Ok(())
}

/// Inclusive bounds: 6 and 64 characters are both accepted.
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "Password must be {MIN_PASSWORD_LEN} characters or more"
        )));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "Password must be {MAX_PASSWORD_LEN} characters or less"
        )));
    }
    Ok(())
}

pub fn validate_person_name(name: &str, field: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{field} cannot be empty")));
    }
    Ok(())
}

pub fn validate_trip_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::bad_request("Trip name cannot be empty"));
    }
    if name.len() > MAX_TRIP_NAME_LEN {
        return Err(ApiError::bad_request(format!(
            "Trip name cannot exceed {MAX_TRIP_NAME_LEN} characters"
        )));
    }
    Ok(())
}
