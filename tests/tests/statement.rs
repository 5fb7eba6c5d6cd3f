mod common;

use anyhow::Result;
use common::*;

#[test]
fn compiled_statements_run_with_their_bindings() -> Result<()> {
    let c = TestCollection::new()?;
    let mut insert = c.db.compile_statement("insert into notes (id, content) values (?, ?)");
    for id in 1..=3 {
        insert.bind_long(1, id)?;
        insert.bind_string(2, &format!("row {id}"))?;
        assert_eq!(insert.execute_insert()?, id);
    }

    let mut lookup = c.db.compile_statement("select content from notes where id = ?");
    lookup.bind_long(1, 2)?;
    assert_eq!(lookup.simple_query_for_string()?, "row 2");

    let mut update = c.db.compile_statement("update notes set content = ? where id > ?");
    update.bind_null(1)?;
    update.bind_long(2, 1)?;
    assert_eq!(update.execute_update_delete()?, 2);
    assert_eq!(c.db.compile_statement("select count(*) from notes where content is null").simple_query_for_long()?, 2);
    Ok(())
}

#[test]
fn unbound_gaps_are_null() -> Result<()> {
    let c = TestCollection::new()?;
    let mut insert = c.db.compile_statement("insert into notes (content, id) values (?, ?)");
    insert.bind_long(2, 5)?;
    insert.execute()?;
    let mut cursor = c.db.query("select content from notes where id = 5", &[])?;
    assert!(cursor.move_to_first()?);
    assert!(cursor.is_null(0)?);
    Ok(())
}

#[test]
fn bind_index_zero_is_rejected() -> Result<()> {
    let c = TestCollection::new()?;
    let mut statement = c.db.compile_statement("select ?");
    assert_eq!(statement.bind_double(0, 1.0).unwrap_err().sqlite_kind(), Some(SqliteErrorKind::BindArgument));
    statement.bind_blob(1, &[1, 2, 3])?;
    statement.clear_bindings();
    assert!(statement.args().is_empty());
    Ok(())
}

#[test]
fn single_value_queries_need_a_row() -> Result<()> {
    let c = TestCollection::new()?;
    let err = c.db.compile_statement("select id from notes").simple_query_for_long().unwrap_err();
    assert_eq!(err.sqlite_kind(), Some(SqliteErrorKind::Done));
    Ok(())
}

#[test]
fn insert_helper_honours_conflict_algorithms() -> Result<()> {
    let c = TestCollection::new()?;
    c.insert(1)?;

    c.db.insert("notes", Conflict::Ignore, &[("id", 1i64.into()), ("content", "ignored".into())])?;
    assert_eq!(c.db.compile_statement("select content from notes where id = 1").simple_query_for_string()?, "note 1");

    c.db.insert("notes", Conflict::Replace, &[("id", 1i64.into()), ("content", "replaced".into())])?;
    assert_eq!(c.db.compile_statement("select content from notes where id = 1").simple_query_for_string()?, "replaced");

    let err = c.db.insert("notes", Conflict::None, &[("id", 1i64.into())]).unwrap_err();
    assert_eq!(err.sqlite_kind(), Some(SqliteErrorKind::Constraint));

    let err = c.db.insert("notes", Conflict::None, &[]).unwrap_err();
    assert_eq!(err.sqlite_kind(), Some(SqliteErrorKind::Generic));
    assert_eq!(c.count()?, 1);
    Ok(())
}

#[test]
fn update_helper_appends_where_arguments() -> Result<()> {
    let c = TestCollection::new()?;
    for id in 1..=4 {
        c.insert(id)?;
    }
    let changed = c.db.update("notes", Conflict::None, &[("content", "even".into())], Some("id % ? = 0"), &[2i64.into()])?;
    assert_eq!(changed, 2);
    let changed = c.db.update("notes", Conflict::Abort, &[("content", "all".into())], None, &[])?;
    assert_eq!(changed, 4);
    Ok(())
}

#[test]
fn materialized_queries_and_metadata() -> Result<()> {
    let c = TestCollection::new()?;
    for id in 1..=3 {
        c.insert(id)?;
    }
    let mut cursor = c.db.query_in_memory("select id, content from notes order by id desc", &[])?;
    assert_eq!(cursor.count()?, 3);
    assert!(cursor.move_to_last()?);
    assert_eq!(cursor.get_long(0)?, 1);
    assert!(!cursor.move_to_position(10)?);
    assert_eq!(cursor.position(), 3);

    assert_eq!(c.db.column_names("select content, id from notes")?, vec!["content".to_string(), "id".to_string()]);
    assert!(c.db.is_database_integrity_ok()?);
    assert_eq!(c.db.path(), Some(c.path.to_string_lossy().into_owned()));
    Ok(())
}
