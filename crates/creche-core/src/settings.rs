//! Facility settings: the single global record printed on certificates.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Identity and legal numbers of the facility. There is exactly one such
/// record; the last write wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilitySettings {
  pub name:            String,
  /// Commercial registry number (RC).
  pub registry_number: String,
  /// Tax identification number (NIF).
  pub tax_id:          String,
  pub article:         String,
  /// Operating approval number (agrément).
  pub approval_number: String,
  pub address:         String,
  pub phone:           String,
  pub city:            String,
}

impl FacilitySettings {
  pub fn validate(&self) -> Result<()> {
    let fields = [
      ("name", &self.name),
      ("registry number", &self.registry_number),
      ("tax id", &self.tax_id),
      ("article", &self.article),
      ("approval number", &self.approval_number),
      ("address", &self.address),
      ("phone", &self.phone),
      ("city", &self.city),
    ];
    match fields.iter().find(|(_, v)| v.trim().is_empty()) {
      Some((field, _)) => Err(Error::BlankField(*field)),
      None => Ok(()),
    }
  }
}

/// Used until a settings row has been saved to the backend.
impl Default for FacilitySettings {
  fn default() -> Self {
    Self {
      name:            "CRECHE L’ILE DES BAMBINS".into(),
      registry_number: "06/01-0961315A10".into(),
      tax_id:          "196506010063735".into(),
      article:         "06017732933".into(),
      approval_number: "2678".into(),
      address:         "Ihadadden Bejaia 06000".into(),
      phone:           "0553367356".into(),
      city:            "Bejaia".into(),
    }
  }
}
