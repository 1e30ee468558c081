//! End-to-end tests against SQLite.

use oxide_schema::prelude::*;
use sqlx::sqlite::SqliteConnectOptions;

async fn schema(config: ConnectionConfig) -> SchemaBuilder<SqliteAdapter> {
    let adapter = SqliteAdapter::in_memory()
        .await
        .expect("Failed to create in-memory SQLite adapter");
    SchemaBuilder::new(adapter, config).expect("Failed to open schema session")
}

async fn users_and_posts(schema: &mut SchemaBuilder<SqliteAdapter>) {
    schema
        .create("users", |table| {
            table.id();
            table.string("name");
        })
        .await
        .unwrap();
    schema
        .create("posts", |table| {
            table.id();
            table.foreign_id("user_id").constrained("users");
            table.string("title");
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_drop_all_tables_with_foreign_keys() {
    let mut schema = schema(ConnectionConfig::sqlite()).await;
    schema
        .create("table1", |table| {
            table.integer("id").primary();
            table.string("name");
        })
        .await
        .unwrap();
    schema
        .create("table2", |table| {
            table.integer("id");
            table.string("user_id");
            table.foreign("user_id").references("id").on("table1");
        })
        .await
        .unwrap();

    assert!(schema.has_table("table1").await.unwrap());
    assert!(schema.has_table("table2").await.unwrap());

    assert_eq!(schema.drop_all_tables().await.unwrap(), 2);

    assert!(!schema.has_table("table1").await.unwrap());
    assert!(!schema.has_table("table2").await.unwrap());
}

#[tokio::test]
async fn test_drop_all_tables_with_foreign_key_cycle() {
    let mut schema = schema(ConnectionConfig::sqlite()).await;
    // a cycle can only be built by hand: the referenced table must exist
    for sql in [
        "CREATE TABLE a (id INTEGER PRIMARY KEY, b_id INTEGER REFERENCES b (id))",
        "CREATE TABLE b (id INTEGER PRIMARY KEY, a_id INTEGER REFERENCES a (id))",
        "INSERT INTO a (id, b_id) VALUES (1, NULL)",
        "INSERT INTO b (id, a_id) VALUES (1, 1)",
        "UPDATE a SET b_id = 1 WHERE id = 1",
    ] {
        schema.adapter().execute_statement(sql).await.unwrap();
    }

    assert_eq!(schema.drop_all_tables().await.unwrap(), 2);
    assert!(schema.adapter().list_tables().await.unwrap().is_empty());

    // enforcement is back on after the teardown
    let enabled: (i64,) = sqlx::query_as("PRAGMA foreign_keys")
        .fetch_one(schema.adapter().pool())
        .await
        .unwrap();
    assert_eq!(enabled.0, 1);
}

#[tokio::test]
async fn test_drop_all_tables_on_empty_database() {
    let mut schema = schema(ConnectionConfig::sqlite()).await;
    assert_eq!(schema.drop_all_tables().await.unwrap(), 0);
}

#[tokio::test]
async fn test_drop_all_tables_ignores_prefix() {
    let mut schema = schema(ConnectionConfig::sqlite().with_prefix("app_")).await;
    users_and_posts(&mut schema).await;
    schema
        .adapter()
        .execute_statement("CREATE TABLE legacy (id INTEGER PRIMARY KEY)")
        .await
        .unwrap();

    assert_eq!(schema.drop_all_tables().await.unwrap(), 3);
    assert!(schema.adapter().list_tables().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_has_column_with_table_prefix() {
    let mut schema = schema(ConnectionConfig::sqlite().with_prefix("test_")).await;
    schema
        .create("table1", |table| {
            table.integer("id");
            table.string("name");
        })
        .await
        .unwrap();

    assert!(schema.has_column("table1", "name").await.unwrap());
    assert!(schema.has_column("table1", "NAME").await.unwrap());
    assert!(!schema.has_column("table1", "email").await.unwrap());
    assert!(schema.has_columns("table1", &["id", "name"]).await.unwrap());
    assert_eq!(
        schema.adapter().list_tables().await.unwrap(),
        vec!["test_table1"]
    );
}

#[tokio::test]
async fn test_has_index_primary() {
    let mut schema = schema(ConnectionConfig::sqlite().with_prefix("example_")).await;
    schema
        .create("table1", |table| {
            table.integer("id").primary();
            table.string("name");
        })
        .await
        .unwrap();

    assert!(schema.has_index("table1", &["id"], None).await.unwrap());
    assert!(schema.has_index("table1", &["id"], Some("primary")).await.unwrap());
    assert!(!schema.has_index("table1", &["name"], Some("primary")).await.unwrap());
}

#[tokio::test]
async fn test_id_is_the_primary_index() {
    let mut schema = schema(ConnectionConfig::sqlite().with_prefix("test_")).await;
    pandemic_table(&mut schema).await;

    assert!(schema.has_index("pandemic_table", &["id"], Some("primary")).await.unwrap());
    assert!(schema.has_index("pandemic_table", &["id"], None).await.unwrap());
    assert!(!schema
        .has_index("pandemic_table", &["wear_mask"], Some("primary"))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_has_index_fluent_and_composite() {
    let mut schema = schema(ConnectionConfig::sqlite().with_prefix("example_")).await;
    schema
        .create("table1", |table| {
            table.id();
            table.string("name").index();
            table.string("email").unique();
            table.string("first_name");
            table.string("last_name");
            table.unique(["first_name", "last_name"]);
        })
        .await
        .unwrap();

    assert!(schema.has_index("table1", &["name"], None).await.unwrap());
    assert!(schema
        .has_index("table1", &["name"], Some("table1_name_index"))
        .await
        .unwrap());
    assert!(schema
        .has_index("table1", &["email"], Some("table1_email_unique"))
        .await
        .unwrap());
    // column order is irrelevant
    assert!(schema
        .has_index("table1", &["last_name", "first_name"], None)
        .await
        .unwrap());
    assert!(schema
        .has_index(
            "table1",
            &["first_name", "last_name"],
            Some("table1_first_name_last_name_unique")
        )
        .await
        .unwrap());
    assert!(!schema.has_index("table1", &["first_name"], None).await.unwrap());
    assert!(!schema
        .has_index("table1", &["name"], Some("table1_email_unique"))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_index_names_follow_prefix_indexes() {
    for (prefix_indexes, expected) in [
        (true, "example_table1_name_index"),
        (false, "table1_name_index"),
    ] {
        let mut schema = schema(
            ConnectionConfig::sqlite()
                .with_prefix("example_")
                .with_prefix_indexes(prefix_indexes),
        )
        .await;
        schema
            .create("table1", |table| {
                table.id();
                table.string("name").index();
            })
            .await
            .unwrap();

        let names: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 'example_table1'",
        )
        .fetch_all(schema.adapter().pool())
        .await
        .unwrap();
        assert_eq!(names, vec![(expected.to_string(),)]);

        // the logical name resolves either way
        assert!(schema
            .has_index("table1", &["name"], Some("table1_name_index"))
            .await
            .unwrap());
    }
}

#[tokio::test]
async fn test_explicit_index_name() {
    let mut schema = schema(ConnectionConfig::sqlite().with_prefix("app_")).await;
    schema
        .create("posts", |table| {
            table.id();
            table.integer("user_id");
            table.timestamp("created_at");
            table.index(["user_id", "created_at"]).name("posts_recent");
        })
        .await
        .unwrap();

    assert!(schema
        .has_index("posts", &["created_at", "user_id"], Some("posts_recent"))
        .await
        .unwrap());

    schema
        .table("posts", |table| {
            table.drop_index("posts_recent");
        })
        .await
        .unwrap();
    assert!(!schema
        .has_index("posts", &["user_id", "created_at"], None)
        .await
        .unwrap());
}

async fn countries_and_users(prefix: &str) -> SchemaBuilder<SqliteAdapter> {
    let mut schema = schema(ConnectionConfig::sqlite().with_prefix(prefix)).await;
    schema
        .create("images_table", |table| {
            table.id();
        })
        .await
        .unwrap();
    schema
        .create("countries_table", |table| {
            table.id();
            table.integer("image_id").unique();
        })
        .await
        .unwrap();
    schema
        .create("users_table", |table| {
            table.id();
            table.integer("image_id");
            table
                .foreign("image_id")
                .references("image_id")
                .on("countries_table");
        })
        .await
        .unwrap();
    schema
}

#[tokio::test]
async fn test_has_foreign_key_without_prefix() {
    let mut schema = countries_and_users("").await;
    assert!(schema
        .has_foreign_key("users_table", &["image_id"], "countries_table", &["image_id"])
        .await
        .unwrap());
    assert!(!schema
        .has_foreign_key("users_table", &["image_id"], "images_table", &["id"])
        .await
        .unwrap());
}

#[tokio::test]
async fn test_has_foreign_key_with_prefix() {
    let mut schema = countries_and_users("example_").await;
    assert!(schema
        .has_foreign_key("users_table", &["image_id"], "countries_table", &["image_id"])
        .await
        .unwrap());
    assert!(!schema
        .has_foreign_key("users_table", &["image_id"], "images_table", &["id"])
        .await
        .unwrap());
    // the physical name is not a logical table of this session
    assert!(!schema
        .has_foreign_key(
            "users_table",
            &["image_id"],
            "example_countries_table",
            &["image_id"]
        )
        .await
        .unwrap());
}

#[tokio::test]
async fn test_two_foreign_keys_to_one_table_with_prefix() {
    let mut schema = schema(ConnectionConfig::sqlite().with_prefix("test_")).await;
    schema
        .create("images_table", |table| {
            table.id();
            table.string("image_name").index();
        })
        .await
        .unwrap();
    schema
        .create("countries_table", |table| {
            table.id();
            table.string("country_name").index();
            table.big_integer("image_id");
        })
        .await
        .unwrap();
    schema
        .create("users_table", |table| {
            table.id();
            table.string("username").index();
            table
                .foreign_id("country_id")
                .references("id")
                .on("countries_table")
                .cascade_on_delete();
            table
                .foreign_id("image_id")
                .references("image_id")
                .on("countries_table")
                .cascade_on_delete();
        })
        .await
        .unwrap();

    assert!(schema
        .has_foreign_key("users_table", &["country_id"], "countries_table", &["id"])
        .await
        .unwrap());
    assert!(schema
        .has_foreign_key("users_table", &["image_id"], "countries_table", &["image_id"])
        .await
        .unwrap());
    assert!(!schema
        .has_foreign_key("users_table", &["id"], "countries_table", &["image_id"])
        .await
        .unwrap());
    // both keys target countries_table, but not with this pairing
    assert!(!schema
        .has_foreign_key("users_table", &["country_id"], "countries_table", &["image_id"])
        .await
        .unwrap());
    assert!(!schema
        .has_foreign_key("users_table", &["image_id"], "images_table", &["id"])
        .await
        .unwrap());
}

#[tokio::test]
async fn test_has_foreign_key_rejects_malformed_request() {
    let mut schema = countries_and_users("").await;
    let err = schema
        .has_foreign_key("users_table", &["image_id", "id"], "countries_table", &["image_id"])
        .await
        .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_drop_single_column_with_prefix() {
    let mut schema = schema(ConnectionConfig::sqlite().with_prefix("test_")).await;
    schema
        .create("table1", |table| {
            table.integer("id");
            table.string("name");
        })
        .await
        .unwrap();

    schema.drop_columns("table1", "name").await.unwrap();

    assert!(schema.has_column("table1", "id").await.unwrap());
    assert!(!schema.has_column("table1", "name").await.unwrap());
}

#[tokio::test]
async fn test_drop_multiple_columns_with_prefix() {
    let mut schema = schema(ConnectionConfig::sqlite().with_prefix("test_")).await;
    schema
        .create("table1", |table| {
            table.integer("id");
            table.string("name");
            table.string("age");
        })
        .await
        .unwrap();

    schema.drop_columns("table1", ["name", "age"]).await.unwrap();

    assert_eq!(schema.column_listing("table1").await.unwrap(), vec!["id"]);
}

async fn pandemic_table(schema: &mut SchemaBuilder<SqliteAdapter>) {
    schema
        .create("pandemic_table", |table| {
            table.id();
            table.string("stay_home").index();
            table.string("covid19");
            table.string("wear_mask");
            table.unique(["wear_mask", "covid19"]);
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_drop_indexed_columns_with_prefix() {
    let mut schema = schema(ConnectionConfig::sqlite().with_prefix("test_")).await;
    pandemic_table(&mut schema).await;
    assert!(schema.has_index("pandemic_table", &["stay_home"], None).await.unwrap());

    schema.drop_columns("pandemic_table", "stay_home").await.unwrap();
    assert!(!schema.has_column("pandemic_table", "stay_home").await.unwrap());
    assert!(!schema.has_index("pandemic_table", &["stay_home"], None).await.unwrap());

    schema
        .drop_columns("pandemic_table", ["covid19", "wear_mask"])
        .await
        .unwrap();
    assert_eq!(schema.column_listing("pandemic_table").await.unwrap(), vec!["id"]);
    assert!(!schema
        .has_index("pandemic_table", &["wear_mask", "covid19"], None)
        .await
        .unwrap());
    assert!(schema.has_index("pandemic_table", &["id"], Some("primary")).await.unwrap());
}

#[tokio::test]
async fn test_batch_and_sequential_column_drops_agree() {
    let config = ConnectionConfig::sqlite().with_prefix("test_");
    let mut batch = schema(config.clone()).await;
    let mut sequential = schema(config).await;
    pandemic_table(&mut batch).await;
    pandemic_table(&mut sequential).await;

    batch
        .drop_columns("pandemic_table", ["stay_home", "covid19"])
        .await
        .unwrap();
    sequential.drop_columns("pandemic_table", "stay_home").await.unwrap();
    sequential.drop_columns("pandemic_table", "covid19").await.unwrap();

    let a = batch.snapshot(None).await.unwrap();
    let b = sequential.snapshot(None).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(
        batch.column_listing("pandemic_table").await.unwrap(),
        vec!["id", "wear_mask"]
    );
}

#[tokio::test]
async fn test_drop_missing_column_conflicts() {
    let mut schema = schema(ConnectionConfig::sqlite()).await;
    schema
        .create("table1", |table| {
            table.integer("id");
        })
        .await
        .unwrap();

    let err = schema.drop_columns("table1", "name").await.unwrap_err();
    assert!(err.is_conflict());
    assert!(matches!(
        schema.drop_columns("table1", Vec::<String>::new()).await,
        Err(SchemaError::InvalidRequest(_))
    ));
}

#[tokio::test]
async fn test_undeclared_column_is_a_definition_error() {
    let mut schema = schema(ConnectionConfig::sqlite()).await;
    let err = schema
        .create("table1", |table| {
            table.id();
            table.index("missing");
        })
        .await
        .unwrap_err();
    assert!(err.is_definition());
    assert!(!schema.has_table("table1").await.unwrap());
}

#[tokio::test]
async fn test_unprefixed_and_prefixed_sessions_agree() {
    let mut plain = schema(ConnectionConfig::sqlite()).await;
    let mut prefixed = schema(ConnectionConfig::sqlite().with_prefix("app_")).await;
    users_and_posts(&mut plain).await;
    users_and_posts(&mut prefixed).await;

    let a = plain.snapshot(None).await.unwrap();
    let b = prefixed.snapshot(None).await.unwrap();
    assert_eq!(
        a.table_names().collect::<Vec<_>>(),
        b.table_names().collect::<Vec<_>>()
    );
    for name in a.table_names() {
        let (ta, tb) = (a.table(name).unwrap(), b.table(name).unwrap());
        assert_eq!(ta.columns, tb.columns);
        assert_eq!(ta.foreign_keys, tb.foreign_keys);
    }
}

#[tokio::test]
async fn test_sessions_with_different_prefixes_share_a_database() {
    let dir = tempfile::tempdir().unwrap();
    let options = SqliteConnectOptions::new()
        .filename(dir.path().join("schema.db"))
        .create_if_missing(true);

    let mut first = SchemaBuilder::new(
        SqliteAdapter::connect_with(options.clone()).await.unwrap(),
        ConnectionConfig::sqlite().with_prefix("one_"),
    )
    .unwrap();
    let mut second = SchemaBuilder::new(
        SqliteAdapter::connect_with(options).await.unwrap(),
        ConnectionConfig::sqlite().with_prefix("two_"),
    )
    .unwrap();

    users_and_posts(&mut first).await;
    assert!(first.has_table("users").await.unwrap());
    assert!(!second.has_table("users").await.unwrap());
    assert!(second.table_names().await.unwrap().is_empty());

    users_and_posts(&mut second).await;
    assert!(second.has_table("posts").await.unwrap());

    // dropping everything is not scoped by prefix
    assert_eq!(second.drop_all_tables().await.unwrap(), 4);
    assert!(!first.has_table("users").await.unwrap());
}
