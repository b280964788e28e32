//! The certificate template.

use chrono::NaiveDate;
use creche_core::{
  child::{Child, Gender, Section},
  settings::FacilitySettings,
};
use serde::Serialize;

use crate::{
  academic::AcademicYear,
  layout::{align_right, center, wrap},
};

/// Characters per line of the rendered page.
pub const PAGE_WIDTH: usize = 78;

const FRENCH_DATE: &str = "%d/%m/%Y";

// ─── Grammatical agreement ────────────────────────────────────────────────────

pub fn born_word(gender: Gender) -> &'static str {
  match gender {
    Gender::Boy => "né",
    Gender::Girl => "née",
  }
}

pub fn enrolled_word(gender: Gender) -> &'static str {
  match gender {
    Gender::Boy => "inscrit",
    Gender::Girl => "inscrite",
  }
}

/// "petite section", "moyenne section", or plain "préscolaire".
pub fn section_phrase(section: Section) -> String {
  match section {
    Section::PreSchool => section.label().to_lowercase(),
    other => format!("{} section", other.label().to_lowercase()),
  }
}

// ─── Certificate ──────────────────────────────────────────────────────────────

/// A filled-in enrollment certificate, ready to be laid out.
#[derive(Debug, Clone, Serialize)]
pub struct Certificate {
  pub facility:      FacilitySettings,
  pub issued_on:     NaiveDate,
  pub academic_year: AcademicYear,
  pub family_name:   String,
  pub given_name:    String,
  pub body:          String,
}

impl Certificate {
  pub fn new(child: &Child, facility: &FacilitySettings, issued_on: NaiveDate) -> Self {
    let academic_year = AcademicYear::containing(issued_on);
    let body = format!(
      "Je soussigné, Monsieur le Directeur de la crèche {name}, atteste que l’élève {given} \
       {family}, {born} le {birth}, est {enrolled} au sein de notre établissement en \
       {section} pour l’année scolaire {academic_year}.",
      name = facility.name,
      given = child.given_name.to_uppercase(),
      family = child.family_name.to_uppercase(),
      born = born_word(child.gender),
      birth = child.birth_date.format(FRENCH_DATE),
      enrolled = enrolled_word(child.gender),
      section = section_phrase(child.section),
    );

    Self {
      facility: facility.clone(),
      issued_on,
      academic_year,
      family_name: child.family_name.clone(),
      given_name: child.given_name.clone(),
      body,
    }
  }

  /// Suggested download name, e.g. `Certificat_Amrani_Lina.txt`.
  pub fn file_name(&self) -> String {
    format!("Certificat_{}_{}.txt", self.family_name, self.given_name)
  }

  /// The page, line by line, at [`PAGE_WIDTH`].
  pub fn lines(&self) -> Vec<String> {
    let f = &self.facility;
    let name = f.name.to_uppercase();
    let mut lines = vec![
      align_right(
        &format!("{} le {}", f.city, self.issued_on.format(FRENCH_DATE)),
        PAGE_WIDTH,
      ),
      String::new(),
      center(&name, PAGE_WIDTH),
      String::new(),
      format!("\"{name}\""),
      format!("RC : {}", f.registry_number),
      format!("NIF : {}", f.tax_id),
      format!("ARTICLE : {}", f.article),
      format!("Agrément N° : {}", f.approval_number),
      f.address.clone(),
      format!("TEL : {}", f.phone),
      String::new(),
      center("Certificat de scolarité", PAGE_WIDTH),
      String::new(),
    ];

    lines.extend(wrap(&self.body, PAGE_WIDTH));
    lines.push(String::new());
    lines.push("Cette attestation est faite pour servir et valoir ce que de droit".to_owned());
    lines.push(String::new());
    lines.push(align_right("Le directeur", PAGE_WIDTH));
    lines
  }

  /// The page as a single string with `\n` line endings.
  pub fn render(&self) -> String {
    let mut text = self.lines().join("\n");
    text.push('\n');
    text
  }
}
