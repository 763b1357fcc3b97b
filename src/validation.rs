// ABOUTME: Field-level validation for coach and coaching request payloads
// ABOUTME: Length bounds, email shape and expertise normalization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

use coachhub_core::errors::{AppError, AppResult};
use coachhub_core::models::{
    CreateCoachRequest, CreateCoachingRequest, PatchCoachRequest, PatchCoachingRequest,
    PutCoachingRequest,
};

use crate::constants::limits::{
    MAX_DESCRIPTION_LENGTH, MAX_FROM_EMAIL_LENGTH, MAX_HOURLY_RATE, MAX_MESSAGE_LENGTH,
    MAX_NAME_LENGTH, MIN_EMAIL_LENGTH, MIN_HOURLY_RATE,
};

/// Loose email shape check: `local@domain.tld`, no whitespace
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < MIN_EMAIL_LENGTH || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some(at_pos) = email.find('@') else {
        return false;
    };
    if at_pos == 0 || at_pos == email.len() - 1 {
        return false;
    }
    let domain_part = &email[at_pos + 1..];
    !domain_part.contains('@') && domain_part.contains('.')
}

fn require_text(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::missing_field(field));
    }
    let len = value.chars().count();
    if len > max {
        return Err(AppError::invalid_input(format!(
            "{field} must be at most {max} characters, got {len}"
        )));
    }
    Ok(())
}

fn require_id(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        Err(AppError::missing_field(field))
    } else {
        Ok(())
    }
}

/// Validate a student contact email
///
/// # Errors
///
/// Returns an error if the email is empty, too long or malformed
pub fn validate_from_email(email: &str) -> AppResult<()> {
    require_text("from_email", email, MAX_FROM_EMAIL_LENGTH)?;
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(AppError::invalid_input(format!("from_email '{email}' is not a valid email")))
    }
}

/// Validate a new coaching request
///
/// # Errors
///
/// Returns an error naming the first invalid field
pub fn validate_create_coaching_request(request: &CreateCoachingRequest) -> AppResult<()> {
    require_id("coach_id", &request.coach_id)?;
    validate_from_email(&request.from_email)?;
    require_text("message", &request.message, MAX_MESSAGE_LENGTH)
}

/// Validate a partial update. At least one field must be present.
///
/// # Errors
///
/// Returns an error if the patch is empty or any present field is invalid
pub fn validate_patch_coaching_request(patch: &PatchCoachingRequest) -> AppResult<()> {
    if patch.is_empty() {
        return Err(AppError::invalid_input(
            "patch must contain at least one of from_email, message, reply",
        ));
    }
    if let Some(email) = &patch.from_email {
        validate_from_email(email)?;
    }
    if let Some(message) = &patch.message {
        require_text("message", message, MAX_MESSAGE_LENGTH)?;
    }
    if let Some(reply) = &patch.reply {
        require_text("reply", reply, MAX_MESSAGE_LENGTH)?;
    }
    Ok(())
}

/// Validate a full overwrite
///
/// # Errors
///
/// Returns an error naming the first invalid field
pub fn validate_put_coaching_request(request: &PutCoachingRequest) -> AppResult<()> {
    require_id("coach_id", &request.coach_id)?;
    validate_from_email(&request.from_email)?;
    require_text("message", &request.message, MAX_MESSAGE_LENGTH)?;
    if let Some(reply) = &request.reply {
        require_text("reply", reply, MAX_MESSAGE_LENGTH)?;
    }
    Ok(())
}

fn normalize_coach_email(email: &str) -> AppResult<String> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::missing_field("email"));
    }
    if !is_valid_email(email) {
        return Err(AppError::invalid_input(format!("email '{email}' is not a valid email")));
    }
    Ok(email.to_owned())
}

fn normalize_name(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    require_text(field, value, MAX_NAME_LENGTH)?;
    Ok(value.to_owned())
}

fn validate_description(description: &str) -> AppResult<()> {
    let description_len = description.chars().count();
    if description_len > MAX_DESCRIPTION_LENGTH {
        return Err(AppError::invalid_input(format!(
            "description must be at most {MAX_DESCRIPTION_LENGTH} characters, got {description_len}"
        )));
    }
    Ok(())
}

fn validate_hourly_rate(hourly_rate: u32) -> AppResult<()> {
    if (MIN_HOURLY_RATE..=MAX_HOURLY_RATE).contains(&hourly_rate) {
        Ok(())
    } else {
        Err(AppError::invalid_input(format!(
            "hourly_rate must be between {MIN_HOURLY_RATE} and {MAX_HOURLY_RATE}"
        )))
    }
}

/// Trim, lowercase and de-duplicate in first-seen order
fn normalize_expertise(items: &[String]) -> AppResult<Vec<String>> {
    let mut expertise: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let normalized = item.trim().to_lowercase();
        if !normalized.is_empty() && !expertise.contains(&normalized) {
            expertise.push(normalized);
        }
    }
    if expertise.is_empty() {
        return Err(AppError::missing_field("expertise"));
    }
    Ok(expertise)
}

/// Validate a coach registration and normalize it in place
///
/// Names and email are trimmed; expertise is trimmed, lowercased and
/// de-duplicated in first-seen order.
///
/// # Errors
///
/// Returns an error naming the first invalid field
pub fn normalize_coach_registration(request: &mut CreateCoachRequest) -> AppResult<()> {
    request.email = normalize_coach_email(&request.email)?;
    request.first_name = normalize_name("first_name", &request.first_name)?;
    request.last_name = normalize_name("last_name", &request.last_name)?;
    validate_description(&request.description)?;
    validate_hourly_rate(request.hourly_rate)?;
    request.expertise = normalize_expertise(&request.expertise)?;
    Ok(())
}

/// Validate a partial coach update and normalize present fields in place
///
/// Present fields follow the registration rules. At least one field must be present.
///
/// # Errors
///
/// Returns an error if the patch is empty or any present field is invalid
pub fn normalize_coach_patch(patch: &mut PatchCoachRequest) -> AppResult<()> {
    if patch.is_empty() {
        return Err(AppError::invalid_input(
            "patch must contain at least one coach field",
        ));
    }
    if let Some(email) = patch.email.as_deref() {
        patch.email = Some(normalize_coach_email(email)?);
    }
    if let Some(first_name) = patch.first_name.as_deref() {
        patch.first_name = Some(normalize_name("first_name", first_name)?);
    }
    if let Some(last_name) = patch.last_name.as_deref() {
        patch.last_name = Some(normalize_name("last_name", last_name)?);
    }
    if let Some(description) = &patch.description {
        validate_description(description)?;
    }
    if let Some(hourly_rate) = patch.hourly_rate {
        validate_hourly_rate(hourly_rate)?;
    }
    if let Some(expertise) = &patch.expertise {
        patch.expertise = Some(normalize_expertise(expertise)?);
    }
    if let Some(image_url) = &patch.image_url {
        if image_url.trim().is_empty() {
            return Err(AppError::missing_field("image_url"));
        }
    }
    Ok(())
}
