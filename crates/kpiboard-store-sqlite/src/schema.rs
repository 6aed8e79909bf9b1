//! SQL schema for the kpiboard SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id         TEXT PRIMARY KEY,
    external_id     TEXT UNIQUE,
    name            TEXT NOT NULL,
    email           TEXT UNIQUE COLLATE NOCASE,
    description     TEXT,
    given_name      TEXT,
    surname         TEXT,
    job_title       TEXT,
    business_phone  TEXT,
    mobile_phone    TEXT,
    office_location TEXT,
    created_at      TEXT NOT NULL
);

-- One dashboard per user; the UNIQUE constraint closes the
-- check-then-insert race between concurrent creators.
CREATE TABLE IF NOT EXISTS dashboards (
    dashboard_id TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL UNIQUE REFERENCES users(user_id),
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS boards (
    board_id   TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    icon       TEXT,
    created_at TEXT NOT NULL
);

-- A board placed on a member's dashboard.
CREATE TABLE IF NOT EXISTS dashboard_boards (
    dashboard_id TEXT NOT NULL REFERENCES dashboards(dashboard_id),
    board_id     TEXT NOT NULL REFERENCES boards(board_id),
    user_id      TEXT NOT NULL REFERENCES users(user_id),
    PRIMARY KEY (dashboard_id, board_id)
);

-- A member's access to a board.
CREATE TABLE IF NOT EXISTS board_users (
    board_id TEXT NOT NULL REFERENCES boards(board_id),
    user_id  TEXT NOT NULL REFERENCES users(user_id),
    PRIMARY KEY (board_id, user_id)
);

CREATE TABLE IF NOT EXISTS styles (
    style_id    TEXT PRIMARY KEY,
    kind        TEXT NOT NULL,   -- 'color' | 'chart' | 'icon'
    name        TEXT NOT NULL,
    description TEXT,
    abbrev      TEXT NOT NULL,
    UNIQUE (kind, abbrev)
);

CREATE TABLE IF NOT EXISTS catalogs (
    catalog_id TEXT PRIMARY KEY,
    board_id   TEXT NOT NULL REFERENCES boards(board_id),
    name       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS kpis (
    kpi_id         TEXT PRIMARY KEY,
    catalog_id     TEXT NOT NULL REFERENCES catalogs(catalog_id),
    name           TEXT NOT NULL,
    description    TEXT,
    formula        TEXT,
    color_id       TEXT REFERENCES styles(style_id) ON DELETE SET NULL,
    chart_id       TEXT REFERENCES styles(style_id) ON DELETE SET NULL,
    position_index INTEGER,
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS records (
    record_id  TEXT PRIMARY KEY,
    kpi_id     TEXT NOT NULL REFERENCES kpis(kpi_id),
    value      REAL NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS dashboard_boards_board_idx ON dashboard_boards(board_id);
CREATE INDEX IF NOT EXISTS board_users_user_idx       ON board_users(user_id);
CREATE INDEX IF NOT EXISTS catalogs_board_idx         ON catalogs(board_id);
CREATE INDEX IF NOT EXISTS kpis_catalog_idx           ON kpis(catalog_id);
CREATE INDEX IF NOT EXISTS records_kpi_idx            ON records(kpi_id, created_at);

PRAGMA user_version = 1;
";
