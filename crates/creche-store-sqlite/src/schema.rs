//! SQL schema for the crèche SQLite store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS children (
    id               TEXT PRIMARY KEY,
    nom              TEXT NOT NULL,
    prenom           TEXT NOT NULL,
    date_naissance   TEXT NOT NULL,   -- YYYY-MM-DD
    date_inscription TEXT NOT NULL,   -- YYYY-MM-DD
    sexe             TEXT NOT NULL,   -- 'Garçon' | 'Fille'
    section          TEXT NOT NULL,   -- 'Petite' | 'Moyenne' | 'Préscolaire'
    nom_pere         TEXT,
    nom_mere         TEXT,
    num_pere         TEXT,
    num_mere         TEXT
);

-- One row per child per month; month is 0-based.
CREATE TABLE IF NOT EXISTS payments (
    child_id     TEXT    NOT NULL REFERENCES children(id) ON DELETE CASCADE,
    year         INTEGER NOT NULL,
    month        INTEGER NOT NULL CHECK (month BETWEEN 0 AND 11),
    amount_paid  INTEGER NOT NULL CHECK (amount_paid >= 0),
    payment_date TEXT    NOT NULL,
    PRIMARY KEY (child_id, year, month)
);

-- Single row; id is always 1.
CREATE TABLE IF NOT EXISTS settings (
    id       INTEGER PRIMARY KEY CHECK (id = 1),
    name     TEXT NOT NULL,
    rc       TEXT NOT NULL,
    nif      TEXT NOT NULL,
    article  TEXT NOT NULL,
    agrement TEXT NOT NULL,
    address  TEXT NOT NULL,
    tel      TEXT NOT NULL,
    city     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS children_nom_idx ON children(nom);

PRAGMA user_version = 1;
";
