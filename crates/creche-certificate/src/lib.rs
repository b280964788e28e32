//! Enrollment certificate ("certificat de scolarité") for the crèche.
//!
//! Fills a fixed French template from a child record and the facility
//! settings, then lays it out as plain text. Pure synchronous; no HTTP or
//! database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use creche_certificate::Certificate;
//! # fn demo(child: &creche_core::child::Child) {
//! let settings = creche_core::settings::FacilitySettings::default();
//! let issued   = NaiveDate::from_ymd_opt(2024, 10, 3).unwrap();
//! let cert     = Certificate::new(child, &settings, issued);
//! println!("{}", cert.render());
//! # }
//! ```

mod academic;
mod layout;
mod render;

pub use academic::AcademicYear;
pub use render::{Certificate, PAGE_WIDTH, born_word, enrolled_word, section_phrase};
