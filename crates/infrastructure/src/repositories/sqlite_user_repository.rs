use crate::database::{users, SqlitePool};
use crate::repositories::{decode_id, map_diesel_error, map_pool_error};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use domain::{DomainError, User, UserRepository};
use uuid::Uuid;

// Database model - separate from domain entity
#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct UserModel {
    id: String,
    username: String,
    display_name: String,
    created_at: NaiveDateTime,
}

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        Ok(User::with_id(
            decode_id(&model.id)?,
            model.username,
            model.display_name,
        ))
    }
}

impl From<&User> for UserModel {
    fn from(user: &User) -> Self {
        UserModel {
            id: user.id.to_string(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let result = tokio::task::spawn_blocking(move || {
            users::table
                .filter(users::id.eq(id.to_string()))
                .select(UserModel::as_select())
                .first::<UserModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        result.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let username = username.to_string();
        let result = tokio::task::spawn_blocking(move || {
            users::table
                .filter(users::username.eq(username))
                .select(UserModel::as_select())
                .first::<UserModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        result.map(User::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let keys: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let result = tokio::task::spawn_blocking(move || {
            users::table
                .filter(users::id.eq_any(keys))
                .select(UserModel::as_select())
                .load::<UserModel>(&mut conn)
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        result.into_iter().map(User::try_from).collect()
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let model = UserModel::from(user);
        let id = user.id.to_string();
        let result = tokio::task::spawn_blocking(move || {
            diesel::insert_into(users::table)
                .values(&model)
                .execute(&mut conn)?;

            users::table
                .filter(users::id.eq(id))
                .select(UserModel::as_select())
                .first::<UserModel>(&mut conn)
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        User::try_from(result)
    }
}
