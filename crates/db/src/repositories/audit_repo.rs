//! Repository for the `audit_logs` table.
//!
//! Pure append plus filtered reads. Details are redacted before storage and
//! every entry is linked into a SHA-256 integrity hash chain with its
//! predecessor, so tampering is detectable after the fact.

use sqlx::{PgPool, Postgres, Transaction};

use inkstone_core::audit::{canonical_entry_data, compute_integrity_hash, redact_sensitive_fields};
use inkstone_core::types::Timestamp;

use crate::error::StoreError;
use crate::models::audit::{
    AuditLog, AuditLogPage, AuditQuery, CreateAuditLog, IntegrityCheckResult,
};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list for `audit_logs` SELECT queries.
const COLUMNS: &str = "\
    id, user_id, action_type, entity_type, entity_id, \
    details_json, ip_address, user_agent, integrity_hash, created_at";

/// Upper bound on page size for audit queries.
const MAX_PAGE_SIZE: i64 = 500;

/// Advisory lock key serializing appends to the integrity hash chain.
const CHAIN_LOCK_KEY: i64 = 724_001;

// ---------------------------------------------------------------------------
// AuditLogRepo
// ---------------------------------------------------------------------------

/// Provides insert and query operations for audit logs.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append a single audit entry.
    pub async fn insert(pool: &PgPool, entry: &CreateAuditLog) -> Result<AuditLog, StoreError> {
        let mut tx = pool.begin().await?;
        let logged = Self::insert_in_tx(&mut tx, entry).await?;
        tx.commit().await?;
        Ok(logged)
    }

    /// Append a single audit entry inside an existing transaction.
    ///
    /// Used by the restore coordinator so the audit entry commits together
    /// with the restore it records.
    pub async fn insert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        entry: &CreateAuditLog,
    ) -> Result<AuditLog, StoreError> {
        let details = entry.details_json.as_ref().map(redact_sensitive_fields);

        // Serialize chain appends: two concurrent transactions must not
        // read the same predecessor hash. The lock releases on commit.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(CHAIN_LOCK_KEY)
            .execute(&mut **tx)
            .await?;

        // Chain onto the most recent entry's hash.
        let prev_hash: Option<String> = sqlx::query_scalar::<_, Option<String>>(
            "SELECT integrity_hash FROM audit_logs ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&mut **tx)
        .await?
        .flatten();

        let entry_data = canonical_entry_data(
            entry.user_id,
            &entry.action_type,
            entry.entity_type.as_deref(),
            entry.entity_id,
            details.as_ref(),
        );
        let hash = compute_integrity_hash(prev_hash.as_deref(), &entry_data);

        let query = format!(
            "INSERT INTO audit_logs
                (user_id, action_type, entity_type, entity_id, details_json,
                 ip_address, user_agent, integrity_hash)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let logged = sqlx::query_as::<_, AuditLog>(&query)
            .bind(entry.user_id)
            .bind(&entry.action_type)
            .bind(&entry.entity_type)
            .bind(entry.entity_id)
            .bind(&details)
            .bind(&entry.ip_address)
            .bind(&entry.user_agent)
            .bind(&hash)
            .fetch_one(&mut **tx)
            .await?;
        Ok(logged)
    }

    /// Query audit logs with filters, newest first, plus a total count.
    pub async fn query(pool: &PgPool, params: &AuditQuery) -> Result<AuditLogPage, StoreError> {
        let (where_clause, bind_values) = build_audit_filter(params);

        let limit = params.limit.unwrap_or(100).clamp(0, MAX_PAGE_SIZE);
        let offset = params.offset.unwrap_or(0).max(0);
        let limit_idx = bind_values.len() + 1;
        let offset_idx = bind_values.len() + 2;

        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs
             {where_clause}
             ORDER BY created_at DESC, id DESC
             LIMIT ${limit_idx} OFFSET ${offset_idx}"
        );
        let mut q = sqlx::query_as::<_, AuditLog>(&query);
        q = bind_audit_values(q, &bind_values);
        q = q.bind(limit).bind(offset);
        let items = q.fetch_all(pool).await?;

        let count_query = format!("SELECT COUNT(*) FROM audit_logs {where_clause}");
        let mut cq = sqlx::query_scalar::<_, i64>(&count_query);
        cq = bind_audit_values_scalar(cq, &bind_values);
        let total = cq.fetch_one(pool).await?;

        Ok(AuditLogPage { items, total })
    }

    /// Walk the whole chain oldest-first, recomputing every hash.
    pub async fn verify_integrity(pool: &PgPool) -> Result<IntegrityCheckResult, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM audit_logs ORDER BY id ASC");
        let entries = sqlx::query_as::<_, AuditLog>(&query).fetch_all(pool).await?;

        let mut prev_hash: Option<String> = None;
        let mut verified = 0i64;

        for entry in &entries {
            let entry_data = canonical_entry_data(
                entry.user_id,
                &entry.action_type,
                entry.entity_type.as_deref(),
                entry.entity_id,
                entry.details_json.as_ref(),
            );
            let expected = compute_integrity_hash(prev_hash.as_deref(), &entry_data);

            if entry.integrity_hash.as_deref() != Some(expected.as_str()) {
                return Ok(IntegrityCheckResult {
                    verified_entries: verified,
                    chain_valid: false,
                    first_break: Some(entry.id),
                });
            }

            prev_hash = entry.integrity_hash.clone();
            verified += 1;
        }

        Ok(IntegrityCheckResult {
            verified_entries: verified,
            chain_valid: true,
            first_break: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built audit log queries.
enum BindValue {
    BigInt(i64),
    Text(String),
    Timestamp(Timestamp),
}

/// Build a WHERE clause and bind values from `AuditQuery` filter parameters.
///
/// The clause is empty if no filters are active, or starts with `WHERE `.
fn build_audit_filter(params: &AuditQuery) -> (String, Vec<BindValue>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(user_id) = params.user_id {
        conditions.push(format!("user_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(user_id));
    }

    if let Some(ref action_type) = params.action_type {
        conditions.push(format!("action_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(action_type.clone()));
    }

    if let Some(ref entity_type) = params.entity_type {
        conditions.push(format!("entity_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(entity_type.clone()));
    }

    if let Some(entity_id) = params.entity_id {
        conditions.push(format!("entity_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(entity_id));
    }

    if let Some(from) = params.from {
        conditions.push(format!("created_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = params.to {
        conditions.push(format!("created_at <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(to));
    }

    if let Some(ref search_text) = params.search_text {
        conditions.push(format!("details_json::text ILIKE ${bind_idx}"));
        let _ = bind_idx;
        bind_values.push(BindValue::Text(format!(
            "%{}%",
            crate::repositories::escape_like(search_text)
        )));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_audit_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_audit_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}
