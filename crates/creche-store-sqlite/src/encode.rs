//! Conversions between domain types and the plain-text SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD`. Gender and section are stored as their
//! French labels.

use chrono::NaiveDate;
use creche_core::{
  child::{Child, ChildId, Gender, Section, non_blank},
  payment::{Amount, Payment},
  settings::FacilitySettings,
};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

pub fn decode_date(column: &'static str, s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|_| Error::DateParse { column, value: s.to_owned() })
}

// ─── Children ────────────────────────────────────────────────────────────────

pub const CHILD_COLUMNS: &str = "id, nom, prenom, date_naissance, date_inscription, sexe, \
                                 section, nom_pere, nom_mere, num_pere, num_mere";

/// Raw strings read directly from a `children` row.
pub struct RawChild {
  pub id:               String,
  pub nom:              String,
  pub prenom:           String,
  pub date_naissance:   String,
  pub date_inscription: String,
  pub sexe:             String,
  pub section:          String,
  pub nom_pere:         Option<String>,
  pub nom_mere:         Option<String>,
  pub num_pere:         Option<String>,
  pub num_mere:         Option<String>,
}

impl RawChild {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      nom:              row.get(1)?,
      prenom:           row.get(2)?,
      date_naissance:   row.get(3)?,
      date_inscription: row.get(4)?,
      sexe:             row.get(5)?,
      section:          row.get(6)?,
      nom_pere:         row.get(7)?,
      nom_mere:         row.get(8)?,
      num_pere:         row.get(9)?,
      num_mere:         row.get(10)?,
    })
  }

  pub fn from_child(child: &Child) -> Self {
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

/// Raw values read directly from a `payments` row.
pub struct RawPayment {
  pub child_id:     String,
  pub year:         i32,
  pub month:        u8,
  pub amount_paid:  Amount,
  pub payment_date: String,
}

impl RawPayment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      child_id:     row.get(0)?,
      year:         row.get(1)?,
      month:        row.get(2)?,
      amount_paid:  row.get(3)?,
      payment_date: row.get(4)?,
    })
  }

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

pub fn settings_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FacilitySettings> {
  Ok(FacilitySettings {
    name:            row.get(0)?,
    registry_number: row.get(1)?,
    tax_id:          row.get(2)?,
    article:         row.get(3)?,
    approval_number: row.get(4)?,
    address:         row.get(5)?,
    phone:           row.get(6)?,
    city:            row.get(7)?,
  })
}
