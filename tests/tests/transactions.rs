mod common;

use anyhow::Result;
use common::*;

#[test]
fn unmarked_inner_transaction_rolls_back_everything() -> Result<()> {
    let c = TestCollection::new()?;
    c.db.begin_transaction()?;
    c.db.begin_transaction()?;
    c.insert(1)?;
    c.db.end_transaction()?;
    c.insert(2)?;
    c.db.set_transaction_successful()?;
    c.db.end_transaction()?;

    assert_eq!(c.count()?, 0);
    Ok(())
}

#[test]
fn unmarked_outer_transaction_rolls_back_everything() -> Result<()> {
    let c = TestCollection::new()?;
    c.db.begin_transaction()?;
    c.db.begin_transaction()?;
    c.insert(1)?;
    c.db.set_transaction_successful()?;
    c.db.end_transaction()?;
    c.insert(2)?;
    c.db.end_transaction()?;

    assert_eq!(c.count()?, 0);
    Ok(())
}

#[test]
fn all_levels_marked_commits() -> Result<()> {
    let c = TestCollection::new()?;
    c.db.begin_transaction()?;
    c.db.begin_transaction()?;
    c.insert(1)?;
    c.db.set_transaction_successful()?;
    c.db.end_transaction()?;
    c.insert(2)?;
    c.db.set_transaction_successful()?;
    c.db.end_transaction()?;

    assert_eq!(c.ids()?, vec![1, 2]);
    assert!(!c.db.in_transaction());
    Ok(())
}

#[test]
fn single_level_commit_and_rollback() -> Result<()> {
    let c = TestCollection::new()?;
    c.db.begin_transaction()?;
    c.insert(1)?;
    c.db.end_transaction()?;
    assert_eq!(c.count()?, 0);

    c.db.begin_transaction()?;
    c.insert(1)?;
    assert!(c.db.in_transaction());
    c.db.set_transaction_successful()?;
    c.db.end_transaction()?;
    assert_eq!(c.count()?, 1);
    Ok(())
}

#[test]
fn ending_without_a_transaction_fails() -> Result<()> {
    let c = TestCollection::new()?;
    assert!(matches!(c.db.end_transaction(), Err(Error::NotInTransaction)));
    assert!(matches!(c.db.set_transaction_successful(), Err(Error::NotInTransaction)));
    Ok(())
}

#[test]
fn token_transactions_nest() -> Result<()> {
    let c = TestCollection::new()?;
    let outer = c.db.transaction()?;
    {
        let inner = c.db.transaction()?;
        c.insert(1)?;
        inner.mark_successful()?;
        inner.end()?;
    }
    c.insert(2)?;
    outer.mark_successful()?;
    outer.end()?;

    assert_eq!(c.ids()?, vec![1, 2]);
    Ok(())
}

#[test]
fn dropped_token_rolls_back() -> Result<()> {
    let c = TestCollection::new()?;
    {
        let _transaction = c.db.transaction()?;
        c.insert(1)?;
    }
    assert_eq!(c.count()?, 0);
    assert!(!c.db.guard().is_locked());
    Ok(())
}

#[test]
fn failed_statement_does_not_end_the_transaction() -> Result<()> {
    let c = TestCollection::new()?;
    c.db.begin_transaction()?;
    c.insert(1)?;
    assert!(c.insert(1).is_err());
    assert!(c.db.in_transaction());
    c.insert(2)?;
    c.db.set_transaction_successful()?;
    c.db.end_transaction()?;

    assert_eq!(c.ids()?, vec![1, 2]);
    Ok(())
}

#[test]
fn reads_inside_a_transaction_see_its_writes() -> Result<()> {
    let c = TestCollection::new()?;
    c.db.begin_transaction()?;
    c.insert(7)?;
    assert_eq!(c.ids()?, vec![7]);
    c.db.end_transaction()?;
    assert!(c.ids()?.is_empty());
    Ok(())
}

#[test]
fn transactions_survive_reopening() -> Result<()> {
    let c = TestCollection::new()?;
    c.db.begin_transaction()?;
    c.insert(1)?;
    c.db.set_transaction_successful()?;
    c.db.end_transaction()?;

    c.db.close()?;
    assert!(!c.db.is_open());
    c.db.open(c.path.to_string_lossy())?;
    assert_eq!(c.ids()?, vec![1]);
    Ok(())
}
