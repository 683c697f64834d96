mod common;

use common::{text, RecordingAdapter};
use rusqlite::types::Value;
use std::cell::Cell;
use tablerepo_core::{
    BaseRepository, Condition, Delete, Filterable, FromStatementResult, Insert, JoinSpec,
    JoinType, Platform, RepoError, Repository, Select, Sql, StatementResult, TableIdentifier,
    TableRef, Update, Where,
};

/// Row set that keeps only the `name` column.
#[derive(Debug, PartialEq)]
struct Names(Vec<String>);

impl FromStatementResult for Names {
    fn initialize(result: StatementResult) -> Self {
        let index = result.columns().iter().position(|column| column == "name");
        let names = result
            .rows()
            .iter()
            .filter_map(|row| match index.and_then(|index| row.get(index)) {
                Some(Value::Text(name)) => Some(name.clone()),
                _ => None,
            })
            .collect();
        Names(names)
    }
}

#[test]
fn every_operation_fails_without_adapter() {
    let mut repo = BaseRepository::unconfigured();
    assert!(!repo.is_initialized());

    assert!(matches!(repo.initialize(), Err(RepoError::Setup(_))));
    assert!(matches!(repo.select("foo", None), Err(RepoError::Setup(_))));
    assert!(matches!(
        repo.insert("foo", [("foo", text("bar"))]),
        Err(RepoError::Setup(_))
    ));
    assert!(matches!(
        repo.update("foo", [("foo", text("bar"))], None, &[]),
        Err(RepoError::Setup(_))
    ));
    assert!(matches!(
        repo.delete("foo", "id = 1".into()),
        Err(RepoError::Setup(_))
    ));
    assert!(matches!(
        repo.select_with(&mut Select::for_table("foo")),
        Err(RepoError::Setup(_))
    ));
    assert!(matches!(
        repo.delete_with(&mut Delete::for_table("foo")),
        Err(RepoError::Setup(_))
    ));
    assert!(matches!(repo.connection(), Err(RepoError::Setup(_))));

    let err = repo.initialize().unwrap_err();
    assert_eq!(
        err.to_string(),
        "This repository does not have an Adapter setup"
    );
    assert!(repo.sql().is_none());
}

#[test]
fn factory_is_created_lazily_once_adapter_is_set() {
    let adapter = RecordingAdapter::new(1, 1);
    let mut repo = BaseRepository::unconfigured();
    repo.set_adapter(&adapter);
    assert!(repo.sql().is_none());

    repo.initialize().unwrap();
    assert!(repo.is_initialized());
    assert_eq!(repo.sql().unwrap().platform(), &Platform::sqlite());

    repo.initialize().unwrap();
    assert_eq!(repo.connection().unwrap().driver_name(), "recording");
    assert!(repo.adapter().is_some());
}

#[test]
fn constructor_keeps_injected_factory() {
    let adapter = RecordingAdapter::new(1, 1);
    let mut repo = BaseRepository::with_sql(&adapter, Sql::new(Platform::postgres()));
    assert!(repo.is_initialized());

    repo.select("foo", Some(Where::new().equal_to("id", 2_i64).into()))
        .unwrap();
    assert_eq!(adapter.last_sql(), "SELECT * FROM \"foo\" WHERE \"id\" = $1");
}

#[test]
fn select_without_condition_is_unfiltered() {
    let adapter = RecordingAdapter::new(0, 0)
        .with_rows(&["id", "name"], vec![vec![Value::Integer(1), text("ada")]]);
    let mut repo = BaseRepository::new(&adapter);

    let rows = repo.select("foo", None).unwrap();

    assert_eq!(adapter.last_sql(), "SELECT * FROM \"foo\"");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows.first().unwrap().get_text("name"), Some("ada"));
}

#[test]
fn select_applies_string_condition_as_where() {
    let adapter = RecordingAdapter::new(0, 0);
    let mut repo = BaseRepository::new(&adapter);

    repo.select("foo", Some("id = 2".into())).unwrap();

    assert_eq!(adapter.last_sql(), "SELECT * FROM \"foo\" WHERE id = 2");
}

#[test]
fn select_applies_pair_condition_as_where() {
    let adapter = RecordingAdapter::new(0, 0);
    let mut repo = BaseRepository::new(&adapter);

    let condition = Where::from_pairs([("name", text("ada")), ("deleted_at", Value::Null)]);
    repo.select("foo", Some(condition.into())).unwrap();

    let executed = adapter.executed();
    assert_eq!(
        executed[0].sql(),
        "SELECT * FROM \"foo\" WHERE \"name\" = ? AND \"deleted_at\" IS NULL"
    );
    assert_eq!(executed[0].params(), &[text("ada")]);
}

#[test]
fn select_invokes_callable_condition_with_statement() {
    let adapter = RecordingAdapter::new(0, 0);
    let mut repo = BaseRepository::new(&adapter);
    let invoked = Cell::new(false);

    repo.select(
        "foo",
        Some(Condition::customize(|select: &mut Select| {
            invoked.set(true);
            assert_eq!(select.table(), Some(&TableRef::from("foo")));
            select.and_where("id > 3").limit(1);
        })),
    )
    .unwrap();

    assert!(invoked.get());
    assert_eq!(
        adapter.last_sql(),
        "SELECT * FROM \"foo\" WHERE id > 3 LIMIT ?"
    );
}

#[test]
fn wildcard_select_uses_configured_columns() {
    let adapter = RecordingAdapter::new(0, 0);
    let mut repo = BaseRepository::new(&adapter).with_columns(["id", "name"]);

    let mut select = Select::for_table("foo");
    repo.select_with(&mut select).unwrap();

    assert_eq!(adapter.last_sql(), "SELECT \"id\", \"name\" FROM \"foo\"");
    assert_eq!(select.column_names(), ["id".to_string(), "name".to_string()]);
    assert_eq!(repo.columns(), ["id".to_string(), "name".to_string()]);
}

#[test]
fn explicit_select_columns_are_kept() {
    let adapter = RecordingAdapter::new(0, 0);
    let mut repo = BaseRepository::new(&adapter).with_columns(["id", "name"]);

    let mut select = Select::for_table("foo");
    select.columns(["email"]);
    repo.select_with(&mut select).unwrap();

    assert_eq!(adapter.last_sql(), "SELECT \"email\" FROM \"foo\"");
}

#[test]
fn select_as_wraps_rows_in_requested_type() {
    let adapter = RecordingAdapter::new(0, 0).with_rows(
        &["id", "name"],
        vec![
            vec![Value::Integer(1), text("ada")],
            vec![Value::Integer(2), Value::Null],
            vec![Value::Integer(3), text("linus")],
        ],
    );
    let mut repo = BaseRepository::new(&adapter);

    let names: Names = repo
        .select_as("foo", Some(Where::new().greater_than("id", 0_i64).into()))
        .unwrap();

    assert_eq!(names, Names(vec!["ada".to_string(), "linus".to_string()]));
    assert_eq!(adapter.last_sql(), "SELECT * FROM \"foo\" WHERE \"id\" > ?");
}

#[test]
fn select_with_as_applies_configured_columns() {
    let adapter = RecordingAdapter::new(0, 0).with_rows(&["name"], vec![vec![text("grace")]]);
    let mut repo = BaseRepository::new(&adapter).with_columns(["name"]);

    let mut select = Select::for_table("foo");
    let names = repo.select_with_as::<Names>(&mut select).unwrap();

    assert_eq!(names, Names(vec!["grace".to_string()]));
    assert_eq!(adapter.last_sql(), "SELECT \"name\" FROM \"foo\"");
}

#[test]
fn select_as_requires_adapter() {
    let mut repo = BaseRepository::unconfigured();
    let err = repo.select_as::<Names>("foo", None).unwrap_err();
    assert!(matches!(err, RepoError::Setup(_)));
}

#[test]
fn select_keeps_alias() {
    let adapter = RecordingAdapter::new(0, 0);
    let mut repo = BaseRepository::new(&adapter);

    repo.select(("f", "foo"), None).unwrap();

    assert_eq!(adapter.last_sql(), "SELECT * FROM \"foo\" AS \"f\"");
}

#[test]
fn insert_returns_affected_rows_and_records_generated_value() {
    let adapter = RecordingAdapter::new(5, 10);
    let mut repo = BaseRepository::new(&adapter);
    assert_eq!(repo.last_insert_value(), None);

    let affected = repo.insert("foo", [("foo", text("bar"))]).unwrap();

    assert_eq!(affected, 5);
    assert_eq!(repo.last_insert_value(), Some(10));
    let executed = adapter.executed();
    assert_eq!(executed[0].sql(), "INSERT INTO \"foo\" (\"foo\") VALUES (?)");
    assert_eq!(executed[0].params(), &[text("bar")]);
}

#[test]
fn insert_runs_against_unaliased_table_and_restores_alias() {
    let cases = [
        (
            TableRef::aliased("U", "Users"),
            "INSERT INTO \"Users\" (\"foo\") VALUES (?)",
        ),
        (
            TableRef::aliased("U", TableIdentifier::with_schema("Users", "main")),
            "INSERT INTO \"main\".\"Users\" (\"foo\") VALUES (?)",
        ),
    ];

    for (table, expected_sql) in cases {
        let adapter = RecordingAdapter::new(1, 7);
        let mut repo = BaseRepository::new(&adapter);

        let mut insert = Insert::for_table(table.clone());
        insert.values([("foo", text("FOO"))]);
        let affected = repo.insert_with(&mut insert).unwrap();

        assert_eq!(affected, 1);
        assert_eq!(adapter.last_sql(), expected_sql);
        assert_eq!(insert.table(), Some(&table));
        assert!(insert.table().unwrap().is_aliased());
    }
}

#[test]
fn insert_restores_alias_when_execution_fails() {
    let adapter = RecordingAdapter::new(1, 7).failing();
    let mut repo = BaseRepository::new(&adapter);

    let table = TableRef::aliased("U", "Users");
    let mut insert = Insert::for_table(table.clone());
    insert.values([("foo", text("FOO"))]);
    let err = repo.insert_with(&mut insert).unwrap_err();

    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(insert.table(), Some(&table));
    assert_eq!(repo.last_insert_value(), None);
}

#[test]
fn insert_restores_alias_when_rendering_fails() {
    let adapter = RecordingAdapter::new(1, 7);
    let mut repo = BaseRepository::new(&adapter);

    let table = TableRef::aliased("U", "Users");
    let mut insert = Insert::for_table(table.clone());
    let err = repo.insert_with(&mut insert).unwrap_err();

    assert!(matches!(err, RepoError::Sql(_)));
    assert_eq!(insert.table(), Some(&table));
    assert!(adapter.executed().is_empty());
    assert_eq!(repo.last_insert_value(), None);
}

#[test]
fn insert_without_values_is_rejected_before_execution() {
    let adapter = RecordingAdapter::new(1, 1);
    let mut repo = BaseRepository::new(&adapter);

    let err = repo
        .insert("foo", Vec::<(String, Value)>::new())
        .unwrap_err();

    assert!(matches!(err, RepoError::Sql(_)));
    assert!(adapter.executed().is_empty());
}

#[test]
fn update_applies_where_and_returns_affected_rows() {
    let adapter = RecordingAdapter::new(5, 0);
    let mut repo = BaseRepository::new(&adapter);

    let affected = repo
        .update("foo", [("foo", text("bar"))], Some("id = 2".into()), &[])
        .unwrap();

    assert_eq!(affected, 5);
    assert_eq!(adapter.last_sql(), "UPDATE \"foo\" SET \"foo\" = ? WHERE id = 2");
}

#[test]
fn update_with_join_uses_given_type() {
    let adapter = RecordingAdapter::new(5, 0);
    let mut repo = BaseRepository::new(&adapter);
    let joins = [JoinSpec::new("baz", "foo.fooId = baz.fooId").with_kind(JoinType::Left)];

    let affected = repo
        .update(
            "foo",
            [("foo.field", text("bar"))],
            Some("id = 2".into()),
            &joins,
        )
        .unwrap();

    assert_eq!(affected, 5);
    assert_eq!(
        adapter.last_sql(),
        "UPDATE \"foo\" LEFT JOIN \"baz\" ON foo.fooId = baz.fooId \
         SET \"foo\".\"field\" = ? WHERE id = 2"
    );
}

#[test]
fn update_join_defaults_to_inner() {
    let adapter = RecordingAdapter::new(5, 0);
    let mut repo = BaseRepository::new(&adapter);
    let joins = [JoinSpec::new("baz", "foo.fooId = baz.fooId")];

    repo.update("foo", [("foo.field", text("bar"))], Some("id = 2".into()), &joins)
        .unwrap();

    assert!(adapter
        .last_sql()
        .starts_with("UPDATE \"foo\" INNER JOIN \"baz\" ON foo.fooId = baz.fooId SET"));
}

#[test]
fn update_without_criteria_or_joins_is_plain() {
    let adapter = RecordingAdapter::new(5, 0);
    let mut repo = BaseRepository::new(&adapter);

    let affected = repo.update("foo", [("foo", text("bar"))], None, &[]).unwrap();

    assert_eq!(affected, 5);
    assert_eq!(adapter.last_sql(), "UPDATE \"foo\" SET \"foo\" = ?");
    assert!(!adapter.last_sql().contains("JOIN"));
}

#[test]
fn update_accepts_callable_condition() {
    let adapter = RecordingAdapter::new(2, 0);
    let mut repo = BaseRepository::new(&adapter);

    repo.update(
        "foo",
        [("status", text("done"))],
        Some(Condition::customize(|update: &mut Update| {
            update.and_where(Where::new().less_than("priority", 3_i64));
        })),
        &[],
    )
    .unwrap();

    assert_eq!(
        adapter.last_sql(),
        "UPDATE \"foo\" SET \"status\" = ? WHERE \"priority\" < ?"
    );
}

#[test]
fn update_runs_against_unaliased_table_and_restores_alias() {
    let adapter = RecordingAdapter::new(1, 99);
    let mut repo = BaseRepository::new(&adapter);

    let table = TableRef::aliased("U", "Users");
    let mut update = Update::for_table(table.clone());
    update.set([("foo", text("FOO"))]);
    update.and_where(Where::from_pairs([("bar", text("BAR"))]));
    let affected = repo.update_with(&mut update).unwrap();

    assert_eq!(affected, 1);
    assert_eq!(
        adapter.last_sql(),
        "UPDATE \"Users\" SET \"foo\" = ? WHERE \"bar\" = ?"
    );
    assert_eq!(update.table(), Some(&table));
    assert_eq!(repo.last_insert_value(), None);
}

#[test]
fn update_restores_alias_when_execution_fails() {
    let adapter = RecordingAdapter::new(1, 99).failing();
    let mut repo = BaseRepository::new(&adapter);

    let table = TableRef::aliased("U", "Users");
    let mut update = Update::for_table(table.clone());
    update.set([("foo", text("FOO"))]);
    let err = repo.update_with(&mut update).unwrap_err();

    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(adapter.last_sql(), "UPDATE \"Users\" SET \"foo\" = ?");
    assert_eq!(update.table(), Some(&table));
}

#[test]
fn update_restores_alias_when_rendering_fails() {
    let adapter = RecordingAdapter::new(1, 99);
    let mut repo = BaseRepository::new(&adapter);

    let table = TableRef::aliased("U", TableIdentifier::with_schema("Users", "main"));
    let mut update = Update::for_table(table.clone());
    let err = repo.update_with(&mut update).unwrap_err();

    assert!(matches!(err, RepoError::Sql(_)));
    assert_eq!(update.table(), Some(&table));
    assert!(adapter.executed().is_empty());
}

#[test]
fn delete_applies_filter_and_callable_conditions() {
    let adapter = RecordingAdapter::new(5, 0);
    let mut repo = BaseRepository::new(&adapter);

    let affected = repo.delete("foo", "foo".into()).unwrap();
    assert_eq!(affected, 5);
    assert_eq!(adapter.last_sql(), "DELETE FROM \"foo\" WHERE foo");

    repo.delete(
        "foo",
        Condition::customize(|delete: &mut Delete| {
            delete.and_where(Where::new().in_list("id", [1_i64, 2, 3]));
        }),
    )
    .unwrap();
    assert_eq!(
        adapter.last_sql(),
        "DELETE FROM \"foo\" WHERE \"id\" IN (?, ?, ?)"
    );
}

#[test]
fn delete_keeps_alias() {
    let adapter = RecordingAdapter::new(1, 0);
    let mut repo = BaseRepository::new(&adapter);

    let mut delete = Delete::for_table(("f", "foo"));
    delete.and_where("f.id = 1");
    repo.delete_with(&mut delete).unwrap();

    assert_eq!(
        adapter.last_sql(),
        "DELETE FROM \"foo\" AS \"f\" WHERE f.id = 1"
    );
}

#[test]
fn affected_row_counts_pass_through_unchanged() {
    for reported in [0_usize, 1, 42] {
        let adapter = RecordingAdapter::new(reported, 0);
        let mut repo = BaseRepository::new(&adapter);

        assert_eq!(repo.insert("foo", [("a", Value::Integer(1))]).unwrap(), reported);
        assert_eq!(
            repo.update("foo", [("a", Value::Integer(2))], None, &[]).unwrap(),
            reported
        );
        assert_eq!(repo.delete("foo", "a = 2".into()).unwrap(), reported);
    }
}

#[test]
fn driver_errors_propagate_unmodified() {
    let adapter = RecordingAdapter::new(1, 0).failing();
    let mut repo = BaseRepository::new(&adapter);

    let err = repo.delete("foo", "id = 1".into()).unwrap_err();
    match err {
        RepoError::Db(tablerepo_core::DbError::Sqlite(rusqlite::Error::InvalidQuery)) => {}
        other => panic!("unexpected error: {other}"),
    }
}

fn rename_all<R: Repository>(repo: &mut R, from: &str, to: &str) -> usize {
    repo.update(
        "users",
        [("name", text(to))],
        Some(Where::new().equal_to("name", text(from)).into()),
        &[],
    )
    .unwrap()
}

#[test]
fn callers_can_program_against_the_interface() {
    let adapter = RecordingAdapter::new(3, 0);
    let mut repo = BaseRepository::new(&adapter);

    assert_eq!(rename_all(&mut repo, "old", "new"), 3);
    let executed = adapter.executed();
    assert_eq!(
        executed[0].sql(),
        "UPDATE \"users\" SET \"name\" = ? WHERE \"name\" = ?"
    );
    assert_eq!(executed[0].params(), &[text("new"), text("old")]);
}
