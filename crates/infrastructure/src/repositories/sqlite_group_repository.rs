use crate::database::{groups, SqlitePool};
use crate::repositories::{decode_id, map_diesel_error, map_pool_error};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use domain::{DomainError, Group, GroupRepository, GroupStatus};
use uuid::Uuid;

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct GroupModel {
    id: String,
    name: String,
    status: String,
    max_members: Option<i32>,
    created_at: NaiveDateTime,
}

impl TryFrom<GroupModel> for Group {
    type Error = DomainError;

    fn try_from(model: GroupModel) -> Result<Self, Self::Error> {
        let status = match model.status.as_str() {
            "open" => GroupStatus::Open,
            "locked" => GroupStatus::Locked,
            other => {
                return Err(DomainError::IntegrityError(format!(
                    "Unknown group status: {}",
                    other
                )))
            }
        };

        let max_members = match model.max_members {
            Some(cap) if cap > 0 => Some(cap as u32),
            Some(cap) => {
                return Err(DomainError::IntegrityError(format!(
                    "Invalid member cap: {}",
                    cap
                )))
            }
            None => None,
        };

        Ok(Group::with_id(
            decode_id(&model.id)?,
            model.name,
            status,
            max_members,
            model.created_at,
        ))
    }
}

impl From<&Group> for GroupModel {
    fn from(group: &Group) -> Self {
        let status = match group.status {
            GroupStatus::Open => "open",
            GroupStatus::Locked => "locked",
        };

        GroupModel {
            id: group.id.to_string(),
            name: group.name.clone(),
            status: status.to_string(),
            max_members: group.max_members.map(|cap| cap as i32),
            created_at: group.created_at,
        }
    }
}

pub struct SqliteGroupRepository {
    pool: SqlitePool,
}

impl SqliteGroupRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for SqliteGroupRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let result = tokio::task::spawn_blocking(move || {
            groups::table
                .filter(groups::id.eq(id.to_string()))
                .select(GroupModel::as_select())
                .first::<GroupModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        result.map(Group::try_from).transpose()
    }

    async fn save(&self, group: &Group) -> Result<Group, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let model = GroupModel::from(group);
        let id = group.id.to_string();
        let result = tokio::task::spawn_blocking(move || {
            diesel::insert_into(groups::table)
                .values(&model)
                .execute(&mut conn)?;

            groups::table
                .filter(groups::id.eq(id))
                .select(GroupModel::as_select())
                .first::<GroupModel>(&mut conn)
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        Group::try_from(result)
    }
}
