//! Keyset listing queries.
//!
//! Every query takes the same [`ObjectFilter`] and an optional inclusive
//! upper bound on the id. Rows always come back newest first.

use mediavault_common::{Error, ObjectId, Result};
use rusqlite::types::Value;
use rusqlite::Connection;

use crate::models::{KindFilter, ObjectFilter, StoredObject};
use crate::queries::objects::{attach_tags, parse_object_row, OBJECT_COLUMNS};

/// Escape LIKE wildcards and wrap the needle for a substring match.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Build the WHERE clause (with leading space) and its positional params.
fn where_clause(filter: &ObjectFilter, upper_bound: Option<ObjectId>) -> (String, Vec<Value>) {
    let mut conditions: Vec<&str> = Vec::new();
    let mut params = Vec::new();

    if let Some(needle) = filter.name_needle() {
        conditions.push("o.name LIKE ? ESCAPE '\\'");
        params.push(Value::Text(like_pattern(needle)));
    }

    match filter.effective_kind() {
        Some(KindFilter::Gallery) => {
            conditions.push("(o.mime LIKE 'image/%' OR o.mime LIKE 'video/%')");
        }
        Some(KindFilter::MimeContains(needle)) => {
            conditions.push("o.mime LIKE ? ESCAPE '\\'");
            params.push(Value::Text(like_pattern(needle)));
        }
        None => {}
    }

    if let Some(bound) = upper_bound {
        conditions.push("o.id <= ?");
        params.push(Value::Integer(bound.get()));
    }

    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), params)
    }
}

/// Fetch up to `limit` matching objects with id at or below `upper_bound`,
/// newest first, tags attached.
///
/// Pass `limit + 1` to find out whether another page follows.
pub fn query_page(
    conn: &Connection,
    filter: &ObjectFilter,
    upper_bound: Option<ObjectId>,
    limit: u32,
) -> Result<Vec<StoredObject>> {
    let (clause, mut params) = where_clause(filter, upper_bound);
    let sql = format!(
        "SELECT {} FROM objects o{} ORDER BY o.id DESC LIMIT ?",
        OBJECT_COLUMNS, clause
    );
    params.push(Value::Integer(i64::from(limit)));

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::database(e.to_string()))?;
    let mut objects = stmt
        .query_map(rusqlite::params_from_iter(params.iter()), parse_object_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::database(e.to_string()))?;

    attach_tags(conn, &mut objects)?;
    Ok(objects)
}

/// Count matching objects with id at or below `upper_bound`.
pub fn count_where(
    conn: &Connection,
    filter: &ObjectFilter,
    upper_bound: Option<ObjectId>,
) -> Result<u64> {
    let (clause, params) = where_clause(filter, upper_bound);
    let sql = format!("SELECT COUNT(*) FROM objects o{}", clause);

    let count: i64 = conn
        .query_row(&sql, rusqlite::params_from_iter(params.iter()), |row| {
            row.get(0)
        })
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(count.max(0) as u64)
}

/// The matching object with the highest id, if any.
pub fn max_id_where(conn: &Connection, filter: &ObjectFilter) -> Result<Option<StoredObject>> {
    let mut page = query_page(conn, filter, None, 1)?;
    Ok(page.pop())
}
