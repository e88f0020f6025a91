use super::*;
use crate::condition::Condition;
use crate::mock::MockClient;

fn pg(client: &MockClient) -> StatementBuilder<&MockClient> {
    StatementBuilder::new("t", client, Dialect::Postgres).unwrap()
}

fn my(client: &MockClient) -> StatementBuilder<&MockClient> {
    StatementBuilder::new("t", client, Dialect::MySql).unwrap()
}

#[test]
fn rejects_empty_table_name() {
    let client = MockClient::new();
    let err = StatementBuilder::new("", &client, Dialect::Postgres).unwrap_err();
    assert!(err.is_argument());
}

#[test]
fn select_star_when_no_fields() {
    let client = MockClient::new();
    let mut b = pg(&client);
    b.select_all();
    assert_eq!(b.to_sql(), r#"SELECT * FROM "t""#);

    let mut b = my(&client);
    b.select(Vec::<String>::new());
    assert_eq!(b.to_sql(), "SELECT * FROM `t`");
}

#[test]
fn select_quotes_fields() {
    let client = MockClient::new();
    let mut b = pg(&client);
    b.select(["id", "email"]);
    assert_eq!(b.to_sql(), r#"SELECT "id", "email" FROM "t""#);

    let mut b = my(&client);
    b.select(["id", "email"]);
    assert_eq!(b.to_sql(), "SELECT `id`, `email` FROM `t`");
}

#[test]
fn filter_scalar_and_operator_conditions() {
    let client = MockClient::new();
    let mut b = pg(&client);
    b.select_all().filter(
        &Criteria::new()
            .eq("status", "active")
            .op("age", ">=", 18)
            .with("name", Condition::operator("LIKE", "a%")),
    );

    assert_eq!(
        b.to_sql(),
        r#"SELECT * FROM "t" WHERE "status" = $1 AND "age" >= $2 AND "name" LIKE $3"#
    );
    assert_eq!(
        b.params(),
        &[
            Value::Text("active".into()),
            Value::Int(18),
            Value::Text("a%".into())
        ]
    );
}

#[test]
fn filter_on_mysql_uses_ordinal_placeholders() {
    let client = MockClient::new();
    let mut b = my(&client);
    b.select_all()
        .filter(&Criteria::new().eq("a", 1).op("b", "<>", 2));
    assert_eq!(b.to_sql(), "SELECT * FROM `t` WHERE `a` = ? AND `b` <> ?");
    assert_eq!(b.params(), &[Value::Int(1), Value::Int(2)]);
}

#[test]
fn filter_with_empty_criteria_is_noop() {
    let client = MockClient::new();
    let mut b = pg(&client);
    b.select_all().filter(&Criteria::new());
    assert_eq!(b.to_sql(), r#"SELECT * FROM "t""#);
    assert!(b.params().is_empty());
}

#[test]
fn filter_placeholders_continue_after_bound_values() {
    let client = MockClient::new();
    for prior in 0..4usize {
        let mut b = pg(&client);
        b.update();
        if prior > 0 {
            let set: ColumnValues = (0..prior).map(|i| (format!("c{i}"), i as i64)).collect();
            b.set(&set).unwrap();
        }
        let criteria: Criteria = [("x", 10), ("y", 20), ("z", 30)].into_iter().collect();
        b.filter(&criteria);

        let sql = b.to_sql();
        for n in 1..=3 {
            assert!(sql.contains(&format!("${}", prior + n)), "{sql}");
        }
        assert_eq!(b.params().len(), prior + 3);
        assert_eq!(b.params()[prior], Value::Int(10));
    }
}

#[test]
fn insert_postgres() {
    let client = MockClient::new();
    let mut b = pg(&client);
    b.insert().columns(["a", "b"]).unwrap().values([1, 2]).unwrap();
    assert!(b.to_sql().ends_with(r#"INTO "t" ("a", "b") VALUES ($1, $2)"#));
    assert_eq!(b.to_sql(), r#"INSERT INTO "t" ("a", "b") VALUES ($1, $2)"#);
    assert_eq!(b.params(), &[Value::Int(1), Value::Int(2)]);
}

#[test]
fn insert_mysql() {
    let client = MockClient::new();
    let mut b = my(&client);
    b.insert().columns(["a", "b"]).unwrap().values([1, 2]).unwrap();
    assert_eq!(b.to_sql(), "INSERT INTO `t` (`a`, `b`) VALUES (?, ?)");
    assert_eq!(b.params(), &[Value::Int(1), Value::Int(2)]);
}

#[test]
fn empty_columns_and_values_are_rejected_without_mutation() {
    let client = MockClient::new();
    let mut b = pg(&client);
    b.insert();

    let err = b.columns(Vec::<&str>::new()).unwrap_err();
    assert!(err.is_argument());
    assert_eq!(b.to_sql(), "INSERT");

    let err = b.values(Vec::<Value>::new()).unwrap_err();
    assert!(err.is_argument());
    assert_eq!(b.to_sql(), "INSERT");
    assert!(b.params().is_empty());
}

#[test]
fn values_numbering_restarts_at_first_position() {
    let client = MockClient::new();
    let mut b = pg(&client);
    b.select_all().filter(&Criteria::new().eq("x", 1));
    b.values([2, 3]).unwrap();
    // Permissive ordering: the text is not valid SQL but alignment of the
    // value list is still append-only.
    assert!(b.to_sql().ends_with("VALUES ($1, $2)"));
    assert_eq!(b.params(), &[Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn update_set_then_filter() {
    let client = MockClient::new();
    let mut b = pg(&client);
    b.update()
        .set(&ColumnValues::new().with("name", "bob").with("age", 41))
        .unwrap()
        .filter(&Criteria::new().eq("id", 7));
    assert_eq!(
        b.to_sql(),
        r#"UPDATE "t" SET "name" = $1, "age" = $2 WHERE "id" = $3"#
    );
    assert_eq!(
        b.params(),
        &[Value::Text("bob".into()), Value::Int(41), Value::Int(7)]
    );
}

#[test]
fn set_rejects_empty_assignments() {
    let client = MockClient::new();
    let mut b = pg(&client);
    b.update();
    assert!(b.set(&ColumnValues::new()).unwrap_err().is_argument());
    assert_eq!(b.to_sql(), r#"UPDATE "t""#);
}

#[test]
fn delete_with_filter_mysql() {
    let client = MockClient::new();
    let mut b = my(&client);
    b.delete().filter(&Criteria::new().eq("id", 3));
    assert_eq!(b.to_sql(), "DELETE FROM `t` WHERE `id` = ?");
}

#[test]
fn clauses_are_not_order_checked() {
    let client = MockClient::new();
    let mut b = pg(&client);
    b.filter(&Criteria::new().eq("id", 1)).select_all();
    assert_eq!(b.to_sql(), r#" WHERE "id" = $1SELECT * FROM "t""#);
}

#[test]
fn clear_query_resets_state() {
    let client = MockClient::new();
    let mut b = pg(&client);
    b.select_all().filter(&Criteria::new().eq("id", 1));
    b.clear_query();
    assert!(b.is_empty());
    assert_eq!(b.to_sql(), "");
}

#[tokio::test]
async fn execute_sends_statement_and_resets() {
    let client = MockClient::with_responder(|_, _| Ok(vec![Row::from_pairs([("id", 1)])]));
    let mut b = pg(&client);
    let rows = b
        .select(["id"])
        .filter(&Criteria::new().eq("id", 1))
        .execute()
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert!(b.is_empty());
    assert_eq!(
        client.calls(),
        vec![(
            r#"SELECT "id" FROM "t" WHERE "id" = $1"#.to_string(),
            vec![Value::Int(1)]
        )]
    );
}

#[tokio::test]
async fn execute_resets_and_wraps_on_failure() {
    let client = MockClient::failing("connection reset by peer");
    let mut b = pg(&client);
    let err = b
        .delete()
        .filter(&Criteria::new().eq("id", 1))
        .execute()
        .await
        .unwrap_err();

    assert!(err.is_query_execution());
    assert!(err.to_string().contains("connection reset by peer"));
    assert!(b.is_empty());
    assert_eq!(client.calls().len(), 1);
}

#[tokio::test]
async fn builder_is_reusable_after_failure() {
    let fail_first = std::sync::atomic::AtomicBool::new(true);
    let client = MockClient::with_responder(move |_, _| {
        if fail_first.swap(false, std::sync::atomic::Ordering::SeqCst) {
            Err(RelError::Connection("down".into()))
        } else {
            Ok(Vec::new())
        }
    });
    let mut b = my(&client);

    assert!(b.select_all().execute().await.is_err());
    b.select(["id"]).execute().await.unwrap();

    assert_eq!(client.statements(), ["SELECT * FROM `t`", "SELECT `id` FROM `t`"]);
}

#[tokio::test]
async fn consecutive_statements_are_independent() {
    let client = MockClient::new();
    let mut b = pg(&client);

    b.update()
        .set(&ColumnValues::new().with("a", 1))
        .unwrap()
        .execute()
        .await
        .unwrap();
    b.delete()
        .filter(&Criteria::new().eq("id", 2))
        .execute()
        .await
        .unwrap();

    let calls = client.calls();
    assert_eq!(calls[1].0, r#"DELETE FROM "t" WHERE "id" = $1"#);
    assert_eq!(calls[1].1, vec![Value::Int(2)]);
}
