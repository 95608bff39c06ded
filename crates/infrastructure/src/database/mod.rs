use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::sql_query;

pub mod schema;
pub use schema::*;

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn new(database_path: &str) -> Self {
        let manager = ConnectionManager::<SqliteConnection>::new(database_path);
        let pool = r2d2::Pool::builder()
            .build(manager)
            .expect("Failed to create SQLite connection pool");
        let database = Database { pool };
        database.ensure_schema();
        database
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the tables on first run. Dates are ISO-8601 text (sorts
    /// chronologically), amounts are fixed-point decimal text, flags are
    /// 0/1 integers; decoding back into domain types happens in the
    /// repository layer.
    fn ensure_schema(&self) {
        let mut conn = self
            .pool
            .get()
            .expect("Failed to get connection for schema setup");

        let statements = [
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY NOT NULL,
                username TEXT NOT NULL UNIQUE,
                display_name TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
            "CREATE TABLE IF NOT EXISTS groups (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                status TEXT NOT NULL,
                max_members INTEGER,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
            "CREATE TABLE IF NOT EXISTS memberships (
                id TEXT PRIMARY KEY NOT NULL,
                user_id TEXT NOT NULL REFERENCES users (id),
                group_id TEXT NOT NULL REFERENCES groups (id),
                joined_on TEXT NOT NULL,
                left_on TEXT
            )",
            "CREATE TABLE IF NOT EXISTS purchases (
                id TEXT PRIMARY KEY NOT NULL,
                user_id TEXT NOT NULL REFERENCES users (id),
                group_id TEXT NOT NULL REFERENCES groups (id),
                purchased_on TEXT NOT NULL,
                amount TEXT NOT NULL,
                store TEXT,
                notes TEXT
            )",
            "CREATE TABLE IF NOT EXISTS incentive_definitions (
                id TEXT PRIMARY KEY NOT NULL,
                group_id TEXT NOT NULL REFERENCES groups (id),
                name TEXT NOT NULL,
                amount TEXT NOT NULL,
                effective_from TEXT NOT NULL,
                effective_until TEXT,
                on_purchase INTEGER NOT NULL DEFAULT 0,
                description TEXT,
                UNIQUE (group_id, name)
            )",
            "CREATE TABLE IF NOT EXISTS incentive_realizations (
                id TEXT PRIMARY KEY NOT NULL,
                user_id TEXT NOT NULL REFERENCES users (id),
                incentive_id TEXT NOT NULL REFERENCES incentive_definitions (id),
                realized_on TEXT NOT NULL,
                notes TEXT
            )",
        ];

        for statement in statements {
            sql_query(statement)
                .execute(&mut conn)
                .expect("Failed to create schema");
        }
    }
}
