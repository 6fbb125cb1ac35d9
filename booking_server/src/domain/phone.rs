use crate::domain::errors::OtpError;

// Validate an Indian mobile number and normalize it to the +91XXXXXXXXXX form
// used as the store key. Accepted inputs: ten digits starting 6-9, optionally
// preceded by a 91 or +91 country prefix. Whitespace and hyphens are ignored.
pub fn normalize_phone(raw: &str) -> Result<String, OtpError> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    let national = if let Some(rest) = compact.strip_prefix("+91") {
        rest
    } else if compact.len() == 12 {
        // A bare 91 prefix is only unambiguous with exactly twelve digits;
        // ten-digit numbers may themselves start with 9.
        compact.strip_prefix("91").ok_or(OtpError::InvalidPhone)?
    } else {
        compact.as_str()
    };

    if national.len() != 10 || !national.chars().all(|c| c.is_ascii_digit()) {
        return Err(OtpError::InvalidPhone);
    }
    if !matches!(national.as_bytes()[0], b'6'..=b'9') {
        return Err(OtpError::InvalidPhone);
    }

    Ok(format!("+91{national}"))
}
