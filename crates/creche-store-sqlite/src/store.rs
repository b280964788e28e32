//! [`SqliteStore`], the SQLite implementation of [`CrecheStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use creche_core::{
  child::{Child, ChildId},
  payment::{Payment, PaymentKey},
  settings::FacilitySettings,
  store::CrecheStore,
};

use crate::{
  Error, Result,
  encode::{CHILD_COLUMNS, RawChild, RawPayment, encode_date, settings_from_row},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A crèche store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CrecheStore impl ────────────────────────────────────────────────────────

impl CrecheStore for SqliteStore {
  type Error = Error;

  // ── Children ──────────────────────────────────────────────────────────────

  async fn list_children(&self) -> Result<Vec<Child>> {
    let raws: Vec<RawChild> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CHILD_COLUMNS} FROM children ORDER BY nom ASC, prenom ASC"
        ))?;
        let rows = stmt
          .query_map([], RawChild::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawChild::into_child).collect()
  }

  async fn upsert_child(&self, child: Child) -> Result<()> {
    child.validate()?;
    let raw = RawChild::from_child(&child);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO children (
             id, nom, prenom, date_naissance, date_inscription, sexe,
             section, nom_pere, nom_mere, num_pere, num_mere
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
           ON CONFLICT (id) DO UPDATE SET
             nom              = excluded.nom,
             prenom           = excluded.prenom,
             date_naissance   = excluded.date_naissance,
             date_inscription = excluded.date_inscription,
             sexe             = excluded.sexe,
             section          = excluded.section,
             nom_pere         = excluded.nom_pere,
             nom_mere         = excluded.nom_mere,
             num_pere         = excluded.num_pere,
             num_mere         = excluded.num_mere",
          rusqlite::params![
            raw.id,
            raw.nom,
            raw.prenom,
            raw.date_naissance,
            raw.date_inscription,
            raw.sexe,
            raw.section,
            raw.nom_pere,
            raw.nom_mere,
            raw.num_pere,
            raw.num_mere,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_child(&self, id: ChildId) -> Result<()> {
    let id_str = id.as_str().to_owned();

    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let payments =
          tx.execute("DELETE FROM payments WHERE child_id = ?1", rusqlite::params![id_str])?;
        tx.execute("DELETE FROM children WHERE id = ?1", rusqlite::params![id_str])?;
        tx.commit()?;
        Ok(payments)
      })
      .await?;

    tracing::debug!(child = %id, payments = removed, "deleted child");
    Ok(())
  }

  // ── Payments ──────────────────────────────────────────────────────────────

  async fn list_payments(&self) -> Result<Vec<Payment>> {
    let raws: Vec<RawPayment> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT child_id, year, month, amount_paid, payment_date
           FROM payments
           ORDER BY child_id, year, month",
        )?;
        let rows = stmt
          .query_map([], RawPayment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPayment::into_payment).collect()
  }

  async fn upsert_payment(&self, payment: Payment) -> Result<()> {
    payment.validate()?;
    let child_id = payment.child_id.as_str().to_owned();
    let date_str = encode_date(payment.payment_date);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO payments (child_id, year, month, amount_paid, payment_date)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (child_id, year, month) DO UPDATE SET
             amount_paid  = excluded.amount_paid,
             payment_date = excluded.payment_date",
          rusqlite::params![child_id, payment.year, payment.month, payment.amount_paid, date_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_payment(&self, key: PaymentKey) -> Result<()> {
    let child_id = key.child_id.as_str().to_owned();
    let year = key.period.year();
    let month = key.period.month();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM payments WHERE child_id = ?1 AND year = ?2 AND month = ?3",
          rusqlite::params![child_id, year, month],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  async fn get_settings(&self) -> Result<Option<FacilitySettings>> {
    let settings = self
      .conn
      .call(|conn| {
        let row = conn
          .query_row(
            "SELECT name, rc, nif, article, agrement, address, tel, city
             FROM settings WHERE id = 1",
            [],
            settings_from_row,
          )
          .optional()?;
        Ok(row)
      })
      .await?;
    Ok(settings)
  }

  async fn put_settings(&self, settings: FacilitySettings) -> Result<()> {
    settings.validate()?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO settings (id, name, rc, nif, article, agrement, address, tel, city)
           VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
           ON CONFLICT (id) DO UPDATE SET
             name     = excluded.name,
             rc       = excluded.rc,
             nif      = excluded.nif,
             article  = excluded.article,
             agrement = excluded.agrement,
             address  = excluded.address,
             tel      = excluded.tel,
             city     = excluded.city",
          rusqlite::params![
            settings.name,
            settings.registry_number,
            settings.tax_id,
            settings.article,
            settings.approval_number,
            settings.address,
            settings.phone,
            settings.city,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
