//! Wire rows as the backend stores them, and their mapping to domain types.

use chrono::NaiveDate;
use creche_core::{
  child::{Child, ChildId, Gender, Section, non_blank},
  payment::{Amount, Payment},
  settings::FacilitySettings,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// The settings table holds a single row with this id.
pub const SETTINGS_ROW_ID: i64 = 1;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn encode_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

/// Accepts `YYYY-MM-DD` as well as a timestamp starting with it.
fn decode_date(column: &'static str, s: &str) -> Result<NaiveDate> {
  let day = s.get(..10).unwrap_or(s);
  NaiveDate::parse_from_str(day, DATE_FORMAT)
    .map_err(|_| Error::DateParse { column, value: s.to_owned() })
}

/// Numeric columns may come back as `10000` or `10000.0`.
fn whole_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Amount, D::Error> {
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Number {
    Int(i64),
    Float(f64),
  }

  Ok(match Number::deserialize(d)? {
    Number::Int(n) => n,
    Number::Float(f) => f.round() as Amount,
  })
}

fn nullable_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
  Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

// ─── Children ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildRow {
  pub id:               String,
  pub nom:              String,
  pub prenom:           String,
  pub date_naissance:   String,
  pub date_inscription: String,
  pub sexe:             String,
  pub section:          String,
  #[serde(default)]
  pub nom_pere:         Option<String>,
  #[serde(default)]
  pub nom_mere:         Option<String>,
  #[serde(default)]
  pub num_pere:         Option<String>,
  #[serde(default)]
  pub num_mere:         Option<String>,
}

impl From<&Child> for ChildRow {
  fn from(child: &Child) -> Self {
    Self {
      id:               child.id.as_str().to_owned(),
      nom:              child.family_name.clone(),
      prenom:           child.given_name.clone(),
      date_naissance:   encode_date(child.birth_date),
      date_inscription: encode_date(child.enrolled_on),
      sexe:             child.gender.label().to_owned(),
      section:          child.section.label().to_owned(),
      nom_pere:         child.father_name.clone(),
      nom_mere:         child.mother_name.clone(),
      num_pere:         child.father_phone.clone(),
      num_mere:         child.mother_phone.clone(),
    }
  }
}

impl ChildRow {
  pub fn into_child(self) -> Result<Child> {
    Ok(Child {
      id:           ChildId::from(self.id),
      family_name:  self.nom,
      given_name:   self.prenom,
      birth_date:   decode_date("date_naissance", &self.date_naissance)?,
      enrolled_on:  decode_date("date_inscription", &self.date_inscription)?,
      gender:       Gender::from_label(&self.sexe)?,
      section:      Section::from_label(&self.section)?,
      father_name:  non_blank(self.nom_pere),
      mother_name:  non_blank(self.nom_mere),
      father_phone: non_blank(self.num_pere),
      mother_phone: non_blank(self.num_mere),
    })
  }
}

// ─── Payments ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRow {
  pub child_id:     String,
  pub year:         i32,
  pub month:        u8,
  #[serde(deserialize_with = "whole_amount")]
  pub amount_paid:  Amount,
  pub payment_date: String,
}

impl From<&Payment> for PaymentRow {
  fn from(p: &Payment) -> Self {
    Self {
      child_id:     p.child_id.as_str().to_owned(),
      year:         p.year,
      month:        p.month,
      amount_paid:  p.amount_paid,
      payment_date: encode_date(p.payment_date),
    }
  }
}

impl PaymentRow {
  pub fn into_payment(self) -> Result<Payment> {
    let payment = Payment {
      child_id:     ChildId::from(self.child_id),
      year:         self.year,
      month:        self.month,
      amount_paid:  self.amount_paid,
      payment_date: decode_date("payment_date", &self.payment_date)?,
    };
    payment.validate()?;
    Ok(payment)
  }
}

// ─── Settings ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsRow {
  #[serde(default)]
  pub id:       i64,
  #[serde(default, deserialize_with = "nullable_text")]
  pub name:     String,
  #[serde(default, deserialize_with = "nullable_text")]
  pub rc:       String,
  #[serde(default, deserialize_with = "nullable_text")]
  pub nif:      String,
  #[serde(default, deserialize_with = "nullable_text")]
  pub article:  String,
  #[serde(default, deserialize_with = "nullable_text")]
  pub agrement: String,
  #[serde(default, deserialize_with = "nullable_text")]
  pub address:  String,
  #[serde(default, deserialize_with = "nullable_text")]
  pub tel:      String,
  #[serde(default, deserialize_with = "nullable_text")]
  pub city:     String,
}

impl From<&FacilitySettings> for SettingsRow {
  fn from(s: &FacilitySettings) -> Self {
    Self {
      id:       SETTINGS_ROW_ID,
      name:     s.name.clone(),
      rc:       s.registry_number.clone(),
      nif:      s.tax_id.clone(),
      article:  s.article.clone(),
      agrement: s.approval_number.clone(),
      address:  s.address.clone(),
      tel:      s.phone.clone(),
      city:     s.city.clone(),
    }
  }
}

impl From<SettingsRow> for FacilitySettings {
  fn from(row: SettingsRow) -> Self {
    Self {
      name:            row.name,
      registry_number: row.rc,
      tax_id:          row.nif,
      article:         row.article,
      approval_number: row.agrement,
      address:         row.address,
      phone:           row.tel,
      city:            row.city,
    }
  }
}
