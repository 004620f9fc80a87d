//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Host tables (customers, settings, state machines,
//! custom fields) are created here too so a standalone database is usable.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Ledger tables
CREATE TABLE IF NOT EXISTS store_credit (
    id TEXT PRIMARY KEY,
    customer_id TEXT NOT NULL UNIQUE,
    balance REAL NOT NULL CHECK (balance >= 0),
    currency_id TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT
);

CREATE TABLE IF NOT EXISTS store_credit_history (
    id TEXT PRIMARY KEY,
    store_credit_id TEXT NOT NULL,
    order_id TEXT,
    amount REAL NOT NULL,
    currency_id TEXT,
    reason TEXT NOT NULL,
    action_type TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (store_credit_id) REFERENCES store_credit(id) ON DELETE CASCADE
);

-- Host tables
CREATE TABLE IF NOT EXISTS customer_group (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    custom_fields TEXT NOT NULL DEFAULT '{}'
);

CREATE TABLE IF NOT EXISTS customer (
    id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    customer_group_id TEXT,
    custom_fields TEXT NOT NULL DEFAULT '{}'
);

CREATE TABLE IF NOT EXISTS system_config (
    configuration_key TEXT PRIMARY KEY,
    configuration_value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS customer_session (
    id TEXT PRIMARY KEY,
    customer_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS state_machine (
    id TEXT PRIMARY KEY,
    technical_name TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS state_machine_state (
    id TEXT PRIMARY KEY,
    state_machine_id TEXT NOT NULL,
    technical_name TEXT NOT NULL,
    name TEXT NOT NULL,
    UNIQUE (state_machine_id, technical_name)
);

CREATE TABLE IF NOT EXISTS state_machine_transition (
    id TEXT PRIMARY KEY,
    state_machine_id TEXT NOT NULL,
    action_name TEXT NOT NULL,
    from_state_id TEXT NOT NULL,
    to_state_id TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS state_machine_history (
    id TEXT PRIMARY KEY,
    state_machine_id TEXT NOT NULL,
    entity_id TEXT NOT NULL,
    from_state_id TEXT NOT NULL,
    to_state_id TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS custom_field_set (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    config TEXT NOT NULL,
    active INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS custom_field (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    type TEXT NOT NULL,
    config TEXT NOT NULL,
    active INTEGER NOT NULL,
    set_id TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS custom_field_set_relation (
    id TEXT PRIMARY KEY,
    set_id TEXT NOT NULL,
    entity_name TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_history_store_credit_id ON store_credit_history(store_credit_id);
CREATE INDEX IF NOT EXISTS idx_history_created_at ON store_credit_history(created_at);
CREATE INDEX IF NOT EXISTS idx_session_customer_id ON customer_session(customer_id);
"#;

/// Seeds the host's order return state machine with `open` and `done`.
pub const SEED_HOST_DEFAULTS: &str = r#"
INSERT OR IGNORE INTO state_machine (id, technical_name, name)
VALUES ('6c1d0a62-6f0b-4d7e-9d53-0f6e2f7c0a01', 'order_return.state', 'Return state');

INSERT OR IGNORE INTO state_machine_state (id, state_machine_id, technical_name, name)
VALUES ('6c1d0a62-6f0b-4d7e-9d53-0f6e2f7c0a02', '6c1d0a62-6f0b-4d7e-9d53-0f6e2f7c0a01', 'open', 'Open');

INSERT OR IGNORE INTO state_machine_state (id, state_machine_id, technical_name, name)
VALUES ('6c1d0a62-6f0b-4d7e-9d53-0f6e2f7c0a03', '6c1d0a62-6f0b-4d7e-9d53-0f6e2f7c0a01', 'done', 'Done');

INSERT OR IGNORE INTO state_machine_transition (id, state_machine_id, action_name, from_state_id, to_state_id)
VALUES ('6c1d0a62-6f0b-4d7e-9d53-0f6e2f7c0a04', '6c1d0a62-6f0b-4d7e-9d53-0f6e2f7c0a01', 'complete',
        '6c1d0a62-6f0b-4d7e-9d53-0f6e2f7c0a02', '6c1d0a62-6f0b-4d7e-9d53-0f6e2f7c0a03');
"#;

// Store credit queries
pub const SELECT_STORE_CREDIT_BY_ID: &str = r#"
SELECT id, customer_id, balance, currency_id, created_at, updated_at
FROM store_credit
WHERE id = ?1
"#;

pub const SELECT_STORE_CREDIT_BY_CUSTOMER: &str = r#"
SELECT id, customer_id, balance, currency_id, created_at, updated_at
FROM store_credit
WHERE customer_id = ?1
"#;

pub const SELECT_STORE_CREDITS: &str = r#"
SELECT id, customer_id, balance, currency_id, created_at, updated_at
FROM store_credit
ORDER BY created_at ASC
"#;

pub const INSERT_STORE_CREDIT: &str = r#"
INSERT INTO store_credit (id, customer_id, balance, currency_id, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

/// Compare-and-swap update: only applies while the balance is unchanged.
pub const UPDATE_STORE_CREDIT_IF_BALANCE: &str = r#"
UPDATE store_credit
SET balance = ?2, currency_id = ?3, updated_at = ?4
WHERE id = ?1 AND balance = ?5
"#;

pub const DELETE_STORE_CREDIT: &str = r#"
DELETE FROM store_credit
WHERE id = ?1
"#;

// History queries
pub const INSERT_HISTORY: &str = r#"
INSERT INTO store_credit_history (id, store_credit_id, order_id, amount, currency_id, reason, action_type, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

pub const SELECT_HISTORY_BY_STORE_CREDIT: &str = r#"
SELECT id, store_credit_id, order_id, amount, currency_id, reason, action_type, created_at
FROM store_credit_history
WHERE store_credit_id = ?1
ORDER BY created_at DESC, rowid DESC
"#;

pub const DELETE_HISTORY_BY_STORE_CREDIT: &str = r#"
DELETE FROM store_credit_history
WHERE store_credit_id = ?1
"#;

// Customer queries
pub const SELECT_CUSTOMER_BY_ID: &str = r#"
SELECT id, first_name, last_name, customer_group_id, custom_fields
FROM customer
WHERE id = ?1
"#;

pub const SELECT_CUSTOMERS: &str = r#"
SELECT id, first_name, last_name, customer_group_id, custom_fields
FROM customer
ORDER BY last_name ASC, first_name ASC
"#;

pub const UPSERT_CUSTOMER: &str = r#"
INSERT INTO customer (id, first_name, last_name, customer_group_id, custom_fields)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT(id) DO UPDATE SET
    first_name = excluded.first_name,
    last_name = excluded.last_name,
    customer_group_id = excluded.customer_group_id,
    custom_fields = excluded.custom_fields
"#;

pub const SELECT_CUSTOMER_GROUP_BY_ID: &str = r#"
SELECT id, name, custom_fields
FROM customer_group
WHERE id = ?1
"#;

pub const UPSERT_CUSTOMER_GROUP: &str = r#"
INSERT INTO customer_group (id, name, custom_fields)
VALUES (?1, ?2, ?3)
ON CONFLICT(id) DO UPDATE SET name = excluded.name, custom_fields = excluded.custom_fields
"#;

// Settings queries
pub const SELECT_SETTING: &str = r#"
SELECT configuration_value
FROM system_config
WHERE configuration_key = ?1
"#;

pub const UPSERT_SETTING: &str = r#"
INSERT INTO system_config (configuration_key, configuration_value)
VALUES (?1, ?2)
ON CONFLICT(configuration_key) DO UPDATE SET configuration_value = excluded.configuration_value
"#;

// Session queries
pub const INSERT_SESSION: &str = r#"
INSERT INTO customer_session (id, customer_id, created_at, expires_at)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const SELECT_SESSION_BY_ID: &str = r#"
SELECT id, customer_id, created_at, expires_at
FROM customer_session
WHERE id = ?1
"#;

// State machine queries
pub const SELECT_STATE_MACHINE_BY_NAME: &str = r#"
SELECT id, technical_name, name
FROM state_machine
WHERE technical_name = ?1
"#;

pub const SELECT_STATE_BY_NAME: &str = r#"
SELECT id, state_machine_id, technical_name, name
FROM state_machine_state
WHERE state_machine_id = ?1 AND technical_name = ?2
"#;

pub const INSERT_STATE: &str = r#"
INSERT INTO state_machine_state (id, state_machine_id, technical_name, name)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const DELETE_STATE: &str = r#"
DELETE FROM state_machine_state
WHERE id = ?1
"#;

pub const SELECT_TRANSITIONS_BY_MACHINE: &str = r#"
SELECT id, state_machine_id, action_name, from_state_id, to_state_id
FROM state_machine_transition
WHERE state_machine_id = ?1
"#;

pub const INSERT_TRANSITION: &str = r#"
INSERT INTO state_machine_transition (id, state_machine_id, action_name, from_state_id, to_state_id)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const DELETE_TRANSITION: &str = r#"
DELETE FROM state_machine_transition
WHERE id = ?1
"#;

pub const SELECT_HISTORY_REFERENCING_STATE: &str = r#"
SELECT id
FROM state_machine_history
WHERE from_state_id = ?1 OR to_state_id = ?1
"#;

pub const DELETE_STATE_HISTORY: &str = r#"
DELETE FROM state_machine_history
WHERE id = ?1
"#;

// Custom field queries
pub const COUNT_CUSTOM_FIELD_TABLES: &str = r#"
SELECT COUNT(*)
FROM sqlite_master
WHERE type = 'table'
  AND name IN ('custom_field_set', 'custom_field', 'custom_field_set_relation')
"#;

pub const SELECT_CUSTOM_FIELD_SET_BY_NAME: &str = r#"
SELECT id, name, config, active, created_at
FROM custom_field_set
WHERE name = ?1
"#;

pub const INSERT_CUSTOM_FIELD_SET: &str = r#"
INSERT INTO custom_field_set (id, name, config, active, created_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_CUSTOM_FIELD_BY_NAME: &str = r#"
SELECT id, name, type, config, active, set_id, created_at
FROM custom_field
WHERE name = ?1
"#;

pub const INSERT_CUSTOM_FIELD: &str = r#"
INSERT INTO custom_field (id, name, type, config, active, set_id, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const COUNT_SET_RELATIONS: &str = r#"
SELECT COUNT(*)
FROM custom_field_set_relation
WHERE set_id = ?1 AND entity_name = ?2
"#;

pub const INSERT_SET_RELATION: &str = r#"
INSERT INTO custom_field_set_relation (id, set_id, entity_name, created_at)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const DELETE_SET_RELATIONS: &str = r#"
DELETE FROM custom_field_set_relation
WHERE set_id = ?1
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_contains_ledger_and_host_tables() {
        for table in [
            "store_credit",
            "store_credit_history",
            "customer",
            "customer_group",
            "system_config",
            "customer_session",
            "state_machine",
            "state_machine_state",
            "state_machine_transition",
            "state_machine_history",
            "custom_field_set",
            "custom_field",
            "custom_field_set_relation",
        ] {
            assert!(
                CREATE_TABLES.contains(&format!("CREATE TABLE IF NOT EXISTS {table} (")),
                "missing table {table}"
            );
        }
    }

    #[test]
    fn test_balance_update_is_guarded() {
        assert!(UPDATE_STORE_CREDIT_IF_BALANCE.contains("AND balance = ?5"));
        assert!(CREATE_TABLES.contains("CHECK (balance >= 0)"));
    }

    #[test]
    fn test_history_is_newest_first() {
        assert!(SELECT_HISTORY_BY_STORE_CREDIT.contains("ORDER BY created_at DESC"));
    }
}
