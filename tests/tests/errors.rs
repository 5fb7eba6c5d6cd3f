mod common;

use std::sync::Arc;

use anyhow::Result;
use common::*;

fn failure(err: Error) -> (SqliteErrorKind, String, Option<i32>) {
    match err {
        Error::Sqlite(failure) => (failure.kind, failure.message, failure.code),
        other => panic!("expected a SQLite failure, got {other:?}"),
    }
}

#[test]
fn primary_key_violation_is_a_constraint_failure() -> Result<()> {
    let c = TestCollection::new()?;
    c.insert(1)?;
    let (kind, message, code) = failure(c.db.insert_for_id("insert into notes (id) values (?)", &[1i64.into()]).unwrap_err());
    assert_eq!(kind, SqliteErrorKind::Constraint);
    assert_eq!(code, Some(1555));
    assert!(message.contains("UNIQUE constraint failed: notes.id"), "{message}");
    assert!(!message.starts_with("error while compiling"));
    Ok(())
}

#[test]
fn unique_index_violation_carries_its_extended_code() -> Result<()> {
    let c = TestCollection::new()?;
    c.db.exec_sql("create unique index notes_content on notes (content)", &[])?;
    c.db.insert("notes", Conflict::None, &[("content", "same".into())])?;
    let err = c.db.insert("notes", Conflict::None, &[("content", "same".into())]).unwrap_err();
    assert_eq!(failure(err).2, Some(2067));
    Ok(())
}

#[test]
fn extra_arguments_are_bind_failures() -> Result<()> {
    let c = TestCollection::new()?;
    let err = c.db.query("select * from notes where id = ?", &[1i64.into(), 2i64.into()]).unwrap_err();
    let (kind, message, _) = failure(err);
    assert_eq!(kind, SqliteErrorKind::BindArgument);
    assert_eq!(message, "Cannot bind argument at index 2 because the index is out of range.  The statement has 1 parameters.");
    Ok(())
}

#[test]
fn compile_errors_name_the_statement() -> Result<()> {
    let c = TestCollection::new()?;
    let (kind, message, _) = failure(c.db.query("select * from missing", &[]).unwrap_err());
    assert_eq!(kind, SqliteErrorKind::Generic);
    assert!(message.starts_with("error while compiling: \"select * from missing\": "), "{message}");
    assert!(message.contains("no such table: missing"), "{message}");

    let (kind, _, _) = failure(c.db.execute_update_delete("update missing set x = 1", &[]).unwrap_err());
    assert_eq!(kind, SqliteErrorKind::Generic);
    Ok(())
}

#[test]
fn garbage_files_are_corrupt() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("garbage.anki2");
    std::fs::write(&path, "this is not a database ".repeat(200))?;

    let db = Database::new(Arc::new(SqliteEngine::new(SqliteEngineConfig::default().pragmas(""))), DatabaseConfig::default());
    db.open(path.to_string_lossy())?;
    let (kind, message, _) = failure(db.query("select * from sqlite_master", &[]).unwrap_err());
    assert_eq!(kind, SqliteErrorKind::Corrupt);
    assert!(message.starts_with("error while compiling"), "{message}");
    assert!(!db.is_database_integrity_ok().unwrap_or(false));
    Ok(())
}

#[test]
fn a_competing_writer_reports_locked() -> Result<()> {
    let engine = SqliteEngineConfig::default().pragmas("PRAGMA busy_timeout=0;");
    let c = TestCollection::with_engine(engine.clone())?;
    let other = Database::new(Arc::new(SqliteEngine::new(engine)), DatabaseConfig::default());
    other.open(c.path.to_string_lossy())?;

    c.db.exec_sql("begin exclusive", &[])?;
    let (kind, _, _) = failure(other.query("select * from notes", &[]).unwrap_err());
    assert_eq!(kind, SqliteErrorKind::Locked);
    c.db.exec_sql("rollback", &[])?;

    let mut cursor = other.query("select * from notes", &[])?;
    assert_eq!(cursor.count()?, 0);
    cursor.close()?;
    Ok(())
}

#[test]
fn lifecycle_errors() -> Result<()> {
    let db = Database::new(Arc::new(SqliteEngine::default()), DatabaseConfig::default());
    assert!(matches!(db.query("select 1", &[]), Err(Error::NotOpen)));
    assert!(matches!(db.close(), Err(Error::NotOpen)));

    db.open(":memory:")?;
    assert!(matches!(db.open(":memory:"), Err(Error::AlreadyOpen)));

    db.close_backend()?;
    assert!(!db.is_open());
    assert!(matches!(db.query("select 1", &[]), Err(Error::BackendClosed)));
    assert!(matches!(db.open(":memory:"), Err(Error::BackendClosed)));
    Ok(())
}

#[test]
fn unsupported_operations() -> Result<()> {
    let c = TestCollection::new()?;
    assert!(matches!(c.db.version(), Err(Error::NotImplemented("version"))));
    assert!(matches!(c.db.set_version(2), Err(Error::NotImplemented(_))));
    assert!(matches!(c.db.delete("notes", None, &[]), Err(Error::NotImplemented(_))));
    assert!(matches!(c.db.enable_write_ahead_logging(), Err(Error::NotImplemented(_))));
    assert!(matches!(c.db.update("notes", Conflict::None, &[], None, &[]), Err(Error::InvalidArgument(_))));
    Ok(())
}

#[test]
fn failures_leave_the_connection_usable() -> Result<()> {
    let c = TestCollection::new()?;
    assert!(c.db.query("select * from missing", &[]).is_err());
    assert!(c.db.query("select * from notes where id = ?", &[1i64.into(), 2i64.into()]).is_err());
    c.insert(7)?;
    assert_eq!(c.ids()?, vec![7]);
    Ok(())
}
