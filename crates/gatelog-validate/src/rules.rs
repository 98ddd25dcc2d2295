//! The per-field validation rules.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// ─── Fields ──────────────────────────────────────────────────────────────────

/// The registration-form fields subject to validation.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Field {
  Name,
  Address,
  ContactNumber,
  VehicleNumber,
  PurposeOfVisit,
  TypeOfVisit,
  IdType,
  IdNumber,
  Temperature,
  Company,
  PersonToMeet,
  Department,
}

// ─── Patterns ────────────────────────────────────────────────────────────────

static PERSON_NAME: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]{2,50}$").expect("pattern"));

static ADDRESS_FORBIDDEN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[^\w\s,.\-/#()&]").expect("pattern"));

/// Regional plate format: 2 letters, 1–2 digits, 1–2 letters, 4 digits.
static VEHICLE_PLATE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[A-Z]{2}[0-9]{1,2}[A-Z]{1,2}[0-9]{4}$").expect("pattern")
});

static ID_NUMBER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)^[A-Z0-9\-/]{4,20}$").expect("pattern"));

static COMPANY: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s&.,'\-]{2,50}$").expect("pattern"));

static DEPARTMENT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s&\-]{2,50}$").expect("pattern"));

const VISIT_TYPES: [&str; 4] = ["Personal", "Business", "Official", "Other"];
const ID_TYPES: [&str; 4] =
  ["Passport", "Driving License", "National ID", "Other"];

// ─── Rules ───────────────────────────────────────────────────────────────────

fn person_name(value: &str, label: &str) -> Option<String> {
  if value.trim().is_empty() {
    return Some(format!("{label} is required"));
  }
  if !PERSON_NAME.is_match(value.trim()) {
    return Some(format!(
      "{label} should be 2-50 characters and contain only letters and spaces"
    ));
  }
  None
}

fn address(value: &str) -> Option<String> {
  // Optional field.
  if value.is_empty() {
    return None;
  }
  if value.trim().len() < 5 {
    return Some("Address should be at least 5 characters".into());
  }
  if ADDRESS_FORBIDDEN.is_match(value) {
    return Some("Address contains invalid characters".into());
  }
  None
}

fn contact_number(value: &str) -> Option<String> {
  if value.is_empty() {
    return Some("Contact number is required".into());
  }
  let digits: String = value.chars().filter(char::is_ascii_digit).collect();
  if digits.len() != 10 {
    return Some("Contact number must be 10 digits".into());
  }
  None
}

fn vehicle_number(value: &str) -> Option<String> {
  // Optional field.
  if value.is_empty() {
    return None;
  }
  let cleaned = crate::format::vehicle_number(value);
  if !VEHICLE_PLATE.is_match(&cleaned) {
    return Some("Invalid vehicle number format (e.g., KA01AB1234)".into());
  }
  None
}

fn purpose_of_visit(value: &str) -> Option<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Some("Purpose of visit is required".into());
  }
  if trimmed.len() < 10 {
    return Some("Purpose should be at least 10 characters".into());
  }
  if trimmed.len() > 200 {
    return Some("Purpose should not exceed 200 characters".into());
  }
  None
}

fn type_of_visit(value: &str) -> Option<String> {
  if !VISIT_TYPES.contains(&value) {
    return Some("Please select a valid visit type".into());
  }
  None
}

fn id_type(value: &str) -> Option<String> {
  if value.is_empty() {
    return Some("ID type is required".into());
  }
  if !ID_TYPES.contains(&value) {
    return Some("Please select a valid ID type".into());
  }
  None
}

fn id_number(value: &str) -> Option<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Some("ID number is required".into());
  }
  if trimmed.len() < 4 {
    return Some("ID number should be at least 4 characters".into());
  }
  if !ID_NUMBER.is_match(trimmed) {
    return Some("Invalid ID number format".into());
  }
  None
}

fn temperature(value: &str) -> Option<String> {
  if value.is_empty() {
    return Some("Temperature is required".into());
  }
  match value.parse::<f64>() {
    Ok(t) if (35.0..=42.0).contains(&t) => None,
    _ => Some("Temperature must be between 35°C and 42°C".into()),
  }
}

fn company(value: &str) -> Option<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Some("Company name is required".into());
  }
  if trimmed.len() < 2 {
    return Some("Company name should be at least 2 characters".into());
  }
  if !COMPANY.is_match(trimmed) {
    return Some("Invalid company name format".into());
  }
  None
}

fn department(value: &str) -> Option<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Some("Department is required".into());
  }
  if trimmed.len() < 2 {
    return Some("Department should be at least 2 characters".into());
  }
  if !DEPARTMENT.is_match(trimmed) {
    return Some("Invalid department name format".into());
  }
  None
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Validate a single field. `None` means valid; `Some` carries the message
/// to surface inline next to the field.
pub fn validate(field: Field, value: &str) -> Option<String> {
  match field {
    Field::Name => person_name(value, "Name"),
    Field::Address => address(value),
    Field::ContactNumber => contact_number(value),
    Field::VehicleNumber => vehicle_number(value),
    Field::PurposeOfVisit => purpose_of_visit(value),
    Field::TypeOfVisit => type_of_visit(value),
    Field::IdType => id_type(value),
    Field::IdNumber => id_number(value),
    Field::Temperature => temperature(value),
    Field::Company => company(value),
    Field::PersonToMeet => person_name(value, "Person name"),
    Field::Department => department(value),
  }
}

/// Validate a whole form. The result contains only the fields that failed;
/// absence of a key means the field is valid.
pub fn validate_form(
  form: &BTreeMap<Field, String>,
) -> BTreeMap<Field, String> {
  form
    .iter()
    .filter_map(|(field, value)| {
      validate(*field, value).map(|message| (*field, message))
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn name_requires_letters_and_spaces_within_bounds() {
    assert!(validate(Field::Name, "Asha Rao").is_none());
    assert!(validate(Field::Name, "").is_some());
    assert!(validate(Field::Name, "A").is_some());
    assert!(validate(Field::Name, "R2-D2").is_some());
    assert!(validate(Field::Name, &"a".repeat(51)).is_some());
  }

  #[test]
  fn contact_number_strips_punctuation_before_counting() {
    // 10 digits after stripping — valid.
    assert!(validate(Field::ContactNumber, "98-765 43210").is_none());
    assert!(validate(Field::ContactNumber, "9876543210").is_none());
    assert!(validate(Field::ContactNumber, "").is_some());
    assert!(validate(Field::ContactNumber, "12345").is_some());
    assert!(validate(Field::ContactNumber, "98765432101").is_some());
  }

  #[test]
  fn vehicle_number_is_optional_but_strict_when_present() {
    assert!(validate(Field::VehicleNumber, "").is_none());
    assert!(validate(Field::VehicleNumber, "ka 01 ab 1234").is_none());
    assert!(validate(Field::VehicleNumber, "KA01AB1234").is_none());
    assert!(validate(Field::VehicleNumber, "KA1AB12").is_some());
    assert!(validate(Field::VehicleNumber, "1234AB12").is_some());
  }

  #[test]
  fn purpose_length_is_bounded() {
    assert!(validate(Field::PurposeOfVisit, "quarterly review").is_none());
    assert!(validate(Field::PurposeOfVisit, "").is_some());
    assert!(validate(Field::PurposeOfVisit, "short").is_some());
    assert!(validate(Field::PurposeOfVisit, &"x".repeat(201)).is_some());
    // Trimmed length is what counts.
    assert!(validate(Field::PurposeOfVisit, "   short   ").is_some());
  }

  #[test]
  fn visit_and_id_types_are_closed_enumerations() {
    for t in ["Personal", "Business", "Official", "Other"] {
      assert!(validate(Field::TypeOfVisit, t).is_none());
    }
    assert!(validate(Field::TypeOfVisit, "Casual").is_some());

    for t in ["Passport", "Driving License", "National ID", "Other"] {
      assert!(validate(Field::IdType, t).is_none());
    }
    assert!(validate(Field::IdType, "").is_some());
    assert!(validate(Field::IdType, "Library Card").is_some());
  }

  #[test]
  fn id_number_accepts_mixed_case_alphanumerics() {
    assert!(validate(Field::IdNumber, "ab-1234/x").is_none());
    assert!(validate(Field::IdNumber, "AB1234").is_none());
    assert!(validate(Field::IdNumber, "ab").is_some());
    assert!(validate(Field::IdNumber, "ab 1234").is_some());
  }

  #[test]
  fn temperature_range_is_inclusive() {
    assert!(validate(Field::Temperature, "37.0").is_none());
    assert!(validate(Field::Temperature, "35").is_none());
    assert!(validate(Field::Temperature, "42").is_none());
    assert!(validate(Field::Temperature, "42.5").is_some());
    assert!(validate(Field::Temperature, "34.9").is_some());
    assert!(validate(Field::Temperature, "warm").is_some());
    assert!(validate(Field::Temperature, "").is_some());
  }

  #[test]
  fn address_is_optional_with_restricted_charset() {
    assert!(validate(Field::Address, "").is_none());
    assert!(validate(Field::Address, "12/4 MG Road, #2 (rear)").is_none());
    assert!(validate(Field::Address, "abc").is_some());
    assert!(validate(Field::Address, "12 MG Road <script>").is_some());
  }

  #[test]
  fn department_allows_ampersand_and_hyphen_only() {
    assert!(validate(Field::Department, "R&D - Platforms").is_none());
    assert!(validate(Field::Department, "HR").is_none());
    assert!(validate(Field::Department, "X").is_some());
    assert!(validate(Field::Department, "Ops/Infra").is_some());
  }

  #[test]
  fn validate_form_keeps_only_failures() {
    let form = BTreeMap::from([
      (Field::Name, "Asha Rao".to_owned()),
      (Field::ContactNumber, "12345".to_owned()),
      (Field::Temperature, "98.6".to_owned()),
    ]);
    let errors = validate_form(&form);
    assert!(!errors.contains_key(&Field::Name));
    assert!(errors.contains_key(&Field::ContactNumber));
    assert!(errors.contains_key(&Field::Temperature));
    assert_eq!(errors.len(), 2);
  }
}
