use scylla::client::session::Session;

use crate::store::errors::StoreError;

// ============================================================================
// Schema bootstrap - idempotent, safe on every startup
// ============================================================================
//
// Money columns are decimal strings so that totals round-trip exactly.
// Order lines live in one partition per order, clustered by position, so
// replacing or cascading an order's lines is a single partition delete.
//
// ============================================================================

const TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS customers (
        id uuid PRIMARY KEY,
        name text,
        email text,
        phone text,
        birth_date date
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id uuid PRIMARY KEY,
        title text,
        description text,
        slug text,
        price text
    )",
    "CREATE TABLE IF NOT EXISTS orders (
        id uuid PRIMARY KEY,
        customer_id uuid,
        created_at timestamp,
        updated_at timestamp
    )",
    "CREATE TABLE IF NOT EXISTS order_lines (
        order_id uuid,
        position int,
        id uuid,
        product_id uuid,
        quantity int,
        total text,
        PRIMARY KEY ((order_id), position)
    )",
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS ON customers (email)",
    "CREATE INDEX IF NOT EXISTS ON orders (customer_id)",
    "CREATE INDEX IF NOT EXISTS ON order_lines (product_id)",
];

/// Create the keyspace, tables and secondary indexes, then switch the
/// session to the keyspace.
pub async fn ensure_schema(session: &Session, keyspace: &str) -> Result<(), StoreError> {
    let create_keyspace = format!(
        "CREATE KEYSPACE IF NOT EXISTS {keyspace} WITH REPLICATION = \
         {{'class': 'SimpleStrategy', 'replication_factor': 1}}"
    );
    session
        .query_unpaged(create_keyspace, ())
        .await
        .map_err(StoreError::database("Failed to create keyspace"))?;

    session
        .use_keyspace(keyspace, false)
        .await
        .map_err(StoreError::database("Failed to switch keyspace"))?;

    for statement in TABLES {
        session
            .query_unpaged(*statement, ())
            .await
            .map_err(StoreError::database("Failed to create table"))?;
    }

    for statement in INDEXES {
        session
            .query_unpaged(*statement, ())
            .await
            .map_err(StoreError::database("Failed to create index"))?;
    }

    tracing::info!(keyspace = %keyspace, "✅ Schema ready");
    Ok(())
}
