//! Enrolled children and the two fixed classification axes (gender, section).

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Opaque, immutable identifier of an enrolled child.
///
/// New ids are hyphenated UUID v4 strings, but rows created elsewhere may
/// carry any string, so the id is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildId(String);

impl ChildId {
  pub fn generate() -> Self { Self(Uuid::new_v4().hyphenated().to_string()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl From<String> for ChildId {
  fn from(s: String) -> Self { Self(s) }
}

impl From<&str> for ChildId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl fmt::Display for ChildId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Categories ──────────────────────────────────────────────────────────────

/// Gender as recorded on enrollment. The string form is the French label
/// stored by the backend.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString, IntoStaticStr,
)]
pub enum Gender {
  #[serde(rename = "Garçon")]
  #[strum(serialize = "Garçon")]
  Boy,
  #[serde(rename = "Fille")]
  #[strum(serialize = "Fille")]
  Girl,
}

impl Gender {
  pub fn label(self) -> &'static str { self.into() }

  pub fn from_label(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownGender(s.to_owned()))
  }

  /// Every gender, in display order.
  pub fn all() -> Vec<Self> { Self::iter().collect() }
}

/// Age cohort a child is enrolled in.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString, IntoStaticStr,
)]
pub enum Section {
  #[serde(rename = "Petite")]
  #[strum(serialize = "Petite")]
  Young,
  #[serde(rename = "Moyenne")]
  #[strum(serialize = "Moyenne")]
  Middle,
  #[serde(rename = "Préscolaire")]
  #[strum(serialize = "Préscolaire")]
  PreSchool,
}

impl Section {
  pub fn label(self) -> &'static str { self.into() }

  pub fn from_label(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownSection(s.to_owned()))
  }

  /// Every section, youngest first.
  pub fn all() -> Vec<Self> { Self::iter().collect() }
}

// ─── Child ───────────────────────────────────────────────────────────────────

/// An enrolled child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
  pub id:           ChildId,
  pub family_name:  String,
  pub given_name:   String,
  pub birth_date:   NaiveDate,
  pub enrolled_on:  NaiveDate,
  pub gender:       Gender,
  pub section:      Section,
  #[serde(default)]
  pub father_name:  Option<String>,
  #[serde(default)]
  pub mother_name:  Option<String>,
  #[serde(default)]
  pub father_phone: Option<String>,
  #[serde(default)]
  pub mother_phone: Option<String>,
}

impl Child {
  /// "family given", the form used for display and search.
  pub fn full_name(&self) -> String { format!("{} {}", self.family_name, self.given_name) }

  pub fn validate(&self) -> Result<()> {
    if self.family_name.trim().is_empty() {
      return Err(Error::BlankField("family name"));
    }
    if self.given_name.trim().is_empty() {
      return Err(Error::BlankField("given name"));
    }
    Ok(())
  }
}

/// Input for enrolling or editing a child; the id is assigned by the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildDraft {
  pub family_name:  String,
  pub given_name:   String,
  pub birth_date:   NaiveDate,
  pub enrolled_on:  NaiveDate,
  pub gender:       Gender,
  pub section:      Section,
  #[serde(default)]
  pub father_name:  Option<String>,
  #[serde(default)]
  pub mother_name:  Option<String>,
  #[serde(default)]
  pub father_phone: Option<String>,
  #[serde(default)]
  pub mother_phone: Option<String>,
}

impl ChildDraft {
  /// Attach `id` and validate the result.
  pub fn into_child(self, id: ChildId) -> Result<Child> {
    let child = Child {
      id,
      family_name:  self.family_name.trim().to_owned(),
      given_name:   self.given_name.trim().to_owned(),
      birth_date:   self.birth_date,
      enrolled_on:  self.enrolled_on,
      gender:       self.gender,
      section:      self.section,
      father_name:  non_blank(self.father_name),
      mother_name:  non_blank(self.mother_name),
      father_phone: non_blank(self.father_phone),
      mother_phone: non_blank(self.mother_phone),
    };
    child.validate()?;
    Ok(child)
  }
}

/// Collapse empty or whitespace-only optional text to `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn draft() -> ChildDraft {
    ChildDraft {
      family_name:  " Amrani ".into(),
      given_name:   "Lina".into(),
      birth_date:   NaiveDate::from_ymd_opt(2021, 4, 12).unwrap(),
      enrolled_on:  NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
      gender:       Gender::Girl,
      section:      Section::Middle,
      father_name:  Some("Karim".into()),
      mother_name:  Some("   ".into()),
      father_phone: None,
      mother_phone: Some("".into()),
    }
  }

  #[test]
  fn labels_round_trip_through_from_label() {
    for g in Gender::all() {
      assert_eq!(Gender::from_label(g.label()).unwrap(), g);
    }
    for s in Section::all() {
      assert_eq!(Section::from_label(s.label()).unwrap(), s);
    }
  }

  #[test]
  fn unknown_labels_are_rejected() {
    assert!(matches!(Section::from_label("Grande"), Err(Error::UnknownSection(_))));
    assert!(matches!(Gender::from_label("X"), Err(Error::UnknownGender(_))));
  }

  #[test]
  fn serde_uses_french_labels() {
    let json = serde_json::to_string(&Section::PreSchool).unwrap();
    assert_eq!(json, "\"Préscolaire\"");
    let g: Gender = serde_json::from_str("\"Garçon\"").unwrap();
    assert_eq!(g, Gender::Boy);
  }

  #[test]
  fn draft_trims_and_drops_blank_contacts() {
    let child = draft().into_child(ChildId::from("c-1")).unwrap();
    assert_eq!(child.family_name, "Amrani");
    assert_eq!(child.father_name.as_deref(), Some("Karim"));
    assert!(child.mother_name.is_none());
    assert!(child.mother_phone.is_none());
    assert_eq!(child.full_name(), "Amrani Lina");
  }

  #[test]
  fn draft_with_blank_name_is_rejected() {
    let mut d = draft();
    d.given_name = "  ".into();
    assert!(matches!(
      d.into_child(ChildId::generate()),
      Err(Error::BlankField("given name"))
    ));
  }

  #[test]
  fn child_json_is_camel_case() {
    let child = draft().into_child(ChildId::from("c-1")).unwrap();
    let v = serde_json::to_value(&child).unwrap();
    assert_eq!(v["familyName"], "Amrani");
    assert_eq!(v["enrolledOn"], "2024-09-01");
    assert_eq!(v["section"], "Moyenne");
  }
}
