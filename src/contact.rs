//! Contact records and the QR payload text format.
//!
//! The canonical payload is the labeled form `"Name: X, Phone Number: Y"`,
//! which is also what the create screen renders. The parser additionally
//! accepts the bare `"X, Y"` form so codes produced by other apps still
//! scan; for those, the first `", "` occurrence is the separator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const NAME_TAG: &str = "Name: ";
const PHONE_MARKER: &str = ", Phone Number: ";

/// A contact captured from a scanned code or the create form. Transient:
/// built, handed to the address book once, then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub name: String,
    pub phone_number: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("payload has no `, ` separator")]
    MissingSeparator,
    #[error("payload is missing a name or phone number")]
    MissingField,
}

/// Renders the canonical QR payload for a contact.
pub fn encode_payload(record: &ContactRecord) -> String {
    format!(
        "{NAME_TAG}{}{PHONE_MARKER}{}",
        record.name, record.phone_number
    )
}

/// Parses a scanned payload into a contact record.
pub fn parse_payload(payload: &str) -> Result<ContactRecord, PayloadError> {
    let payload = payload.trim_start();
    let rest = payload.strip_prefix(NAME_TAG).unwrap_or(payload);
    if let Some(pos) = rest.rfind(PHONE_MARKER) {
        return record_from(&rest[..pos], &rest[pos + PHONE_MARKER.len()..]);
    }
    let (name, phone) = rest.split_once(", ").ok_or(PayloadError::MissingSeparator)?;
    record_from(name, phone)
}

fn record_from(name: &str, phone: &str) -> Result<ContactRecord, PayloadError> {
    let name = name.trim();
    let phone = phone.trim();
    if name.is_empty() || phone.is_empty() {
        return Err(PayloadError::MissingField);
    }
    Ok(ContactRecord {
        name: name.to_string(),
        phone_number: phone.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, phone: &str) -> ContactRecord {
        ContactRecord {
            name: name.to_string(),
            phone_number: phone.to_string(),
        }
    }

    #[test]
    fn encode_uses_labeled_form() {
        assert_eq!(
            encode_payload(&record("Ada", "5551234")),
            "Name: Ada, Phone Number: 5551234"
        );
    }

    #[test]
    fn bare_payload_parses_unchanged() {
        assert_eq!(parse_payload("Grace, 5559876"), Ok(record("Grace", "5559876")));
    }

    #[test]
    fn encoded_payloads_parse_back() {
        // The create and scan screens share one format; a code generated
        // here must scan here.
        let original = record("Ada Lovelace", "5551234");
        assert_eq!(parse_payload(&encode_payload(&original)), Ok(original));
    }

    #[test]
    fn bare_split_takes_first_separator() {
        assert_eq!(
            parse_payload("Ada, 555, 1234"),
            Ok(record("Ada", "555, 1234"))
        );
    }

    #[test]
    fn labeled_prefix_without_phone_tag_falls_back() {
        assert_eq!(parse_payload("Name: Ada, 5551234"), Ok(record("Ada", "5551234")));
    }

    #[test]
    fn missing_separator_is_rejected() {
        assert_eq!(parse_payload("AdaLovelace5551234"), Err(PayloadError::MissingSeparator));
    }

    #[test]
    fn empty_phone_is_rejected() {
        assert_eq!(parse_payload("Ada, "), Err(PayloadError::MissingField));
        assert_eq!(parse_payload("Name: Ada, Phone Number: "), Err(PayloadError::MissingField));
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(parse_payload(", 5551234"), Err(PayloadError::MissingField));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(parse_payload("  Grace, 5559876\n"), Ok(record("Grace", "5559876")));
    }
}
