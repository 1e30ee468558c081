//! Tests against a live PostgreSQL server.
//!
//! Run with `OXIDE_SCHEMA_PG_URL=postgres://... cargo test -- --ignored`.
//! Each test drops every table of the database's current schema.

use oxide_schema::prelude::*;

async fn schema(prefix: &str) -> SchemaBuilder<PostgresAdapter> {
    let url = std::env::var("OXIDE_SCHEMA_PG_URL").expect("OXIDE_SCHEMA_PG_URL is not set");
    let adapter = PostgresAdapter::connect(&url)
        .await
        .expect("Failed to connect to PostgreSQL");
    let mut schema =
        SchemaBuilder::new(adapter, ConnectionConfig::postgres().with_prefix(prefix)).unwrap();
    schema.drop_all_tables().await.unwrap();
    schema
}

#[tokio::test]
#[ignore = "requires a PostgreSQL server"]
async fn test_postgres_definitions_and_predicates() {
    let mut schema = schema("example_").await;
    schema
        .create("users", |table| {
            table.id();
            table.string("email").unique();
            table.boolean("active").default(true);
        })
        .await
        .unwrap();
    schema
        .create("posts", |table| {
            table.id();
            table.foreign_id("user_id").constrained("users").cascade_on_delete();
            table.string("title").index();
        })
        .await
        .unwrap();

    assert!(schema.has_index("users", &["id"], Some("primary")).await.unwrap());
    assert!(schema
        .has_index("users", &["email"], Some("users_email_unique"))
        .await
        .unwrap());
    assert!(schema
        .has_foreign_key("posts", &["user_id"], "users", &["id"])
        .await
        .unwrap());

    schema.drop_columns("posts", ["title", "user_id"]).await.unwrap();
    assert_eq!(schema.column_listing("posts").await.unwrap(), vec!["id"]);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL server"]
async fn test_postgres_drop_all_with_cycle() {
    let mut schema = schema("").await;
    for sql in [
        "CREATE TABLE a (id SERIAL PRIMARY KEY, b_id INTEGER)",
        "CREATE TABLE b (id SERIAL PRIMARY KEY, a_id INTEGER REFERENCES a (id))",
        "ALTER TABLE a ADD CONSTRAINT a_b_id_foreign FOREIGN KEY (b_id) REFERENCES b (id)",
    ] {
        schema.adapter().execute_statement(sql).await.unwrap();
    }

    assert_eq!(schema.drop_all_tables().await.unwrap(), 2);
    assert!(schema.adapter().list_tables().await.unwrap().is_empty());
}
