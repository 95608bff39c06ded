use crate::database::{memberships, SqlitePool};
use crate::repositories::{decode_date, decode_id, encode_date, map_diesel_error, map_pool_error};
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use domain::{DateRange, DomainError, Membership, MembershipRepository};
use uuid::Uuid;

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = memberships)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct MembershipModel {
    id: String,
    user_id: String,
    group_id: String,
    joined_on: String,
    left_on: Option<String>,
}

impl TryFrom<MembershipModel> for Membership {
    type Error = DomainError;

    fn try_from(model: MembershipModel) -> Result<Self, Self::Error> {
        Ok(Membership::with_id(
            decode_id(&model.id)?,
            decode_id(&model.user_id)?,
            decode_id(&model.group_id)?,
            decode_date(&model.joined_on)?,
            model.left_on.as_deref().map(decode_date).transpose()?,
        ))
    }
}

impl From<&Membership> for MembershipModel {
    fn from(membership: &Membership) -> Self {
        MembershipModel {
            id: membership.id.to_string(),
            user_id: membership.user_id.to_string(),
            group_id: membership.group_id.to_string(),
            joined_on: encode_date(membership.joined_on),
            left_on: membership.left_on.map(encode_date),
        }
    }
}

pub struct SqliteMembershipRepository {
    pool: SqlitePool,
}

impl SqliteMembershipRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for SqliteMembershipRepository {
    async fn find_open(
        &self,
        user_id: Uuid,
        group_id: Uuid,
    ) -> Result<Option<Membership>, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let result = tokio::task::spawn_blocking(move || {
            memberships::table
                .filter(memberships::user_id.eq(user_id.to_string()))
                .filter(memberships::group_id.eq(group_id.to_string()))
                .filter(memberships::left_on.is_null())
                .select(MembershipModel::as_select())
                .first::<MembershipModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        result.map(Membership::try_from).transpose()
    }

    async fn find_overlapping(
        &self,
        group_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<Membership>, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let from = encode_date(range.from);
        let to = encode_date(range.to);
        let result = tokio::task::spawn_blocking(move || {
            // joined <= to AND (left is null OR left >= from)
            memberships::table
                .filter(memberships::group_id.eq(group_id.to_string()))
                .filter(memberships::joined_on.le(to))
                .filter(
                    memberships::left_on
                        .is_null()
                        .or(memberships::left_on.ge(from)),
                )
                .order(memberships::joined_on.asc())
                .select(MembershipModel::as_select())
                .load::<MembershipModel>(&mut conn)
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        result.into_iter().map(Membership::try_from).collect()
    }

    async fn count_open(&self, group_id: Uuid) -> Result<usize, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let count = tokio::task::spawn_blocking(move || {
            memberships::table
                .filter(memberships::group_id.eq(group_id.to_string()))
                .filter(memberships::left_on.is_null())
                .count()
                .get_result::<i64>(&mut conn)
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        Ok(count as usize)
    }

    async fn save(&self, membership: &Membership) -> Result<Membership, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let model = MembershipModel::from(membership);
        let id = membership.id.to_string();
        let result = tokio::task::spawn_blocking(move || {
            diesel::insert_into(memberships::table)
                .values(&model)
                .execute(&mut conn)?;

            memberships::table
                .filter(memberships::id.eq(id))
                .select(MembershipModel::as_select())
                .first::<MembershipModel>(&mut conn)
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        Membership::try_from(result)
    }

    async fn close(
        &self,
        membership_id: Uuid,
        left_on: NaiveDate,
    ) -> Result<Membership, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let id = membership_id.to_string();
        let left = encode_date(left_on);
        let result = tokio::task::spawn_blocking(move || {
            diesel::update(memberships::table.filter(memberships::id.eq(id.clone())))
                .set(memberships::left_on.eq(left))
                .execute(&mut conn)?;

            memberships::table
                .filter(memberships::id.eq(id))
                .select(MembershipModel::as_select())
                .first::<MembershipModel>(&mut conn)
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        Membership::try_from(result)
    }
}
