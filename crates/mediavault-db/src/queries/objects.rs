//! Stored object database queries.
//!
//! CRUD for catalog rows and their tags. Name uniqueness is enforced by the
//! schema; a violation surfaces as [`Error::AlreadyExists`] so callers that
//! raced on a generated name can retry with a fresh one.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use mediavault_common::{Error, ObjectId, Result};
use rusqlite::types::{Type, Value};
use rusqlite::Connection;

use crate::models::{NewObject, StoredObject};

/// Column list shared by every object SELECT, in [`parse_object_row`] order.
pub(crate) const OBJECT_COLUMNS: &str = "o.id, o.name, o.path, o.mime, o.description, o.created_at";

/// Parse an object from a database row (tags are attached separately).
pub(crate) fn parse_object_row(row: &rusqlite::Row) -> rusqlite::Result<StoredObject> {
    let created_at: String = row.get(5)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(StoredObject {
        id: ObjectId::new(row.get(0)?),
        name: row.get(1)?,
        path: row.get(2)?,
        mime: row.get(3)?,
        description: row.get(4)?,
        created_at,
        tags: Vec::new(),
    })
}

/// Whether a rusqlite error is a UNIQUE constraint violation.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Map a write error, turning name collisions into `AlreadyExists`.
fn map_write_error(err: rusqlite::Error, name: &str) -> Error {
    if is_unique_violation(&err) {
        Error::already_exists(name)
    } else {
        Error::database(err.to_string())
    }
}

/// Remove duplicate tags, keeping first-seen order.
pub fn dedup_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.into();
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Insert a new object and its tags in one transaction.
///
/// # Returns
///
/// * `Ok(StoredObject)` - The created row, with its assigned id
/// * `Err(Error::AlreadyExists)` - If the name is taken
/// * `Err(Error)` - If another database error occurs
pub fn insert_object(conn: &Connection, object: &NewObject) -> Result<StoredObject> {
    let created_at = Utc::now();
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    tx.execute(
        "INSERT INTO objects (name, path, mime, description, created_at)
         VALUES (:name, :path, :mime, :description, :created_at)",
        rusqlite::named_params! {
            ":name": &object.name,
            ":path": &object.path,
            ":mime": &object.mime,
            ":description": &object.description,
            ":created_at": created_at.to_rfc3339(),
        },
    )
    .map_err(|e| map_write_error(e, &object.name))?;

    let id = ObjectId::new(tx.last_insert_rowid());
    insert_tags(&tx, id, &object.tags)?;

    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    Ok(StoredObject {
        id,
        name: object.name.clone(),
        path: object.path.clone(),
        mime: object.mime.clone(),
        description: object.description.clone(),
        created_at,
        tags: dedup_tags(object.tags.iter().cloned()),
    })
}

fn insert_tags(conn: &Connection, id: ObjectId, tags: &[String]) -> Result<()> {
    let mut stmt = conn
        .prepare_cached("INSERT INTO tags (object_id, value) VALUES (?, ?)")
        .map_err(|e| Error::database(e.to_string()))?;
    for tag in tags {
        stmt.execute(rusqlite::params![id.get(), tag])
            .map_err(|e| Error::database(e.to_string()))?;
    }
    Ok(())
}

/// Load the tags for a set of objects.
///
/// Each list is in insertion order with duplicates removed. Objects without
/// tags have no entry in the map.
pub fn load_tags(conn: &Connection, ids: &[ObjectId]) -> Result<HashMap<ObjectId, Vec<String>>> {
    let mut tags: HashMap<ObjectId, Vec<String>> = HashMap::new();
    if ids.is_empty() {
        return Ok(tags);
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT object_id, value FROM tags WHERE object_id IN ({}) ORDER BY id",
        placeholders
    );
    let params: Vec<Value> = ids.iter().map(|id| Value::Integer(id.get())).collect();

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(params.iter()), |row| {
            Ok((ObjectId::new(row.get(0)?), row.get::<_, String>(1)?))
        })
        .map_err(|e| Error::database(e.to_string()))?;

    for row in rows {
        let (id, value) = row.map_err(|e| Error::database(e.to_string()))?;
        let list = tags.entry(id).or_default();
        if !list.contains(&value) {
            list.push(value);
        }
    }

    Ok(tags)
}

/// Fill in `tags` on each object from the tags table.
pub fn attach_tags(conn: &Connection, objects: &mut [StoredObject]) -> Result<()> {
    let ids: Vec<ObjectId> = objects.iter().map(|o| o.id).collect();
    let mut tags = load_tags(conn, &ids)?;
    for object in objects.iter_mut() {
        object.tags = tags.remove(&object.id).unwrap_or_default();
    }
    Ok(())
}

fn get_one(conn: &Connection, clause: &str, param: Value) -> Result<Option<StoredObject>> {
    let sql = format!("SELECT {} FROM objects o WHERE {}", OBJECT_COLUMNS, clause);
    let result = conn.query_row(&sql, [param], parse_object_row);

    match result {
        Ok(object) => {
            let mut objects = [object];
            attach_tags(conn, &mut objects)?;
            let [object] = objects;
            Ok(Some(object))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get an object (with tags) by its unique name.
pub fn get_object_by_name(conn: &Connection, name: &str) -> Result<Option<StoredObject>> {
    get_one(conn, "o.name = ?", Value::Text(name.to_string()))
}

/// Get an object (with tags) by id.
pub fn get_object(conn: &Connection, id: ObjectId) -> Result<Option<StoredObject>> {
    get_one(conn, "o.id = ?", Value::Integer(id.get()))
}

/// Whether an object with this name exists.
pub fn object_exists(conn: &Connection, name: &str) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM objects WHERE name = ?)",
        [name],
        |row| row.get(0),
    )
    .map_err(|e| Error::database(e.to_string()))
}

/// Rename an object.
///
/// # Returns
///
/// * `Ok(StoredObject)` - The row after the rename
/// * `Err(Error::NotFound)` - If no object has this id
/// * `Err(Error::AlreadyExists)` - If `new_name` is taken
pub fn rename_object(conn: &Connection, id: ObjectId, new_name: &str) -> Result<StoredObject> {
    let rows_affected = conn
        .execute(
            "UPDATE objects SET name = :name WHERE id = :id",
            rusqlite::named_params! { ":name": new_name, ":id": id.get() },
        )
        .map_err(|e| map_write_error(e, new_name))?;

    if rows_affected == 0 {
        return Err(Error::not_found(format!("object {}", id)));
    }

    get_object(conn, id)?.ok_or_else(|| Error::not_found(format!("object {}", id)))
}

/// Replace an object's name, description and full tag list.
pub fn update_object_details(
    conn: &Connection,
    id: ObjectId,
    name: &str,
    description: &str,
    tags: &[String],
) -> Result<StoredObject> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    let rows_affected = tx
        .execute(
            "UPDATE objects SET name = :name, description = :description WHERE id = :id",
            rusqlite::named_params! {
                ":name": name,
                ":description": description,
                ":id": id.get(),
            },
        )
        .map_err(|e| map_write_error(e, name))?;

    if rows_affected == 0 {
        return Err(Error::not_found(format!("object {}", id)));
    }

    tx.execute("DELETE FROM tags WHERE object_id = ?", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    insert_tags(&tx, id, tags)?;

    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    get_object(conn, id)?.ok_or_else(|| Error::not_found(format!("object {}", id)))
}

/// Delete an object and its tags.
///
/// # Returns
///
/// * `Ok(Some(StoredObject))` - The deleted row
/// * `Ok(None)` - If no object has this id
pub fn delete_object(conn: &Connection, id: ObjectId) -> Result<Option<StoredObject>> {
    let Some(object) = get_object(conn, id)? else {
        return Ok(None);
    };

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;
    tx.execute("DELETE FROM tags WHERE object_id = ?", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    let rows_affected = tx
        .execute("DELETE FROM objects WHERE id = ?", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    Ok((rows_affected > 0).then_some(object))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    fn new_object(name: &str, mime: &str, tags: &[&str]) -> NewObject {
        NewObject {
            name: name.to_string(),
            path: format!("2024-01/{name}"),
            mime: mime.to_string(),
            description: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_insert_and_get_by_name() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let created = insert_object(&conn, &new_object("a.png", "image/png", &["a", "b"])).unwrap();
        assert_eq!(created.id, ObjectId::new(1));

        let fetched = get_object_by_name(&conn, "a.png").unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.mime, "image/png");
        assert_eq!(fetched.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        assert!(get_object_by_name(&conn, "nope").unwrap().is_none());
        assert!(get_object(&conn, ObjectId::new(42)).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_name_is_already_exists() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        insert_object(&conn, &new_object("dup.txt", "text/plain", &[])).unwrap();
        let err = insert_object(&conn, &new_object("dup.txt", "text/plain", &["x"])).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(ref name) if name == "dup.txt"));

        // The failed insert must not leave orphan tags behind.
        let tag_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM tags", [], |row| row.get(0))
            .unwrap();
        assert_eq!(tag_count, 0);
    }

    #[test]
    fn test_object_exists() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        assert!(!object_exists(&conn, "x.bin").unwrap());
        insert_object(&conn, &new_object("x.bin", "application/octet-stream", &[])).unwrap();
        assert!(object_exists(&conn, "x.bin").unwrap());
    }

    #[test]
    fn test_tags_are_deduplicated_in_insertion_order() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let created =
            insert_object(&conn, &new_object("t.png", "image/png", &["b", "a", "b", "c"])).unwrap();
        assert_eq!(created.tags, vec!["b", "a", "c"]);

        let fetched = get_object(&conn, created.id).unwrap().unwrap();
        assert_eq!(fetched.tags, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_rename() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let a = insert_object(&conn, &new_object("a.txt", "text/plain", &[])).unwrap();
        insert_object(&conn, &new_object("b.txt", "text/plain", &[])).unwrap();

        let renamed = rename_object(&conn, a.id, "c.txt").unwrap();
        assert_eq!(renamed.name, "c.txt");
        assert!(get_object_by_name(&conn, "a.txt").unwrap().is_none());

        let err = rename_object(&conn, a.id, "b.txt").unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));

        let err = rename_object(&conn, ObjectId::new(99), "z.txt").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_update_details_replaces_tags() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let a = insert_object(&conn, &new_object("a.png", "image/png", &["old"])).unwrap();
        let updated = update_object_details(
            &conn,
            a.id,
            "b.png",
            "a cat",
            &["new".to_string(), "cat".to_string()],
        )
        .unwrap();

        assert_eq!(updated.name, "b.png");
        assert_eq!(updated.description, "a cat");
        assert_eq!(updated.tags, vec!["new", "cat"]);
    }

    #[test]
    fn test_delete_removes_row_and_tags() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let a = insert_object(&conn, &new_object("a.png", "image/png", &["x", "y"])).unwrap();
        let deleted = delete_object(&conn, a.id).unwrap().unwrap();
        assert_eq!(deleted.name, "a.png");
        assert_eq!(deleted.tags, vec!["x", "y"]);

        assert!(get_object(&conn, a.id).unwrap().is_none());
        assert!(delete_object(&conn, a.id).unwrap().is_none());

        let tag_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM tags", [], |row| row.get(0))
            .unwrap();
        assert_eq!(tag_count, 0);
    }

    #[test]
    fn test_dedup_tags() {
        assert_eq!(dedup_tags(["a", "a", "b"]), vec!["a", "b"]);
        assert!(dedup_tags(Vec::<String>::new()).is_empty());
    }
}
