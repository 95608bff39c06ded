use crate::database::{purchases, SqlitePool};
use crate::repositories::{
    decode_amount, decode_date, decode_id, encode_date, map_diesel_error, map_pool_error,
};
use async_trait::async_trait;
use diesel::prelude::*;
use domain::{DateRange, DomainError, Purchase, PurchaseRepository};
use uuid::Uuid;

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = purchases)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct PurchaseModel {
    id: String,
    user_id: String,
    group_id: String,
    purchased_on: String,
    amount: String,
    store: Option<String>,
    notes: Option<String>,
}

impl TryFrom<PurchaseModel> for Purchase {
    type Error = DomainError;

    fn try_from(model: PurchaseModel) -> Result<Self, Self::Error> {
        Ok(Purchase {
            id: decode_id(&model.id)?,
            user_id: decode_id(&model.user_id)?,
            group_id: decode_id(&model.group_id)?,
            purchased_on: decode_date(&model.purchased_on)?,
            amount: decode_amount(&model.amount)?,
            store: model.store,
            notes: model.notes,
        })
    }
}

impl From<&Purchase> for PurchaseModel {
    fn from(purchase: &Purchase) -> Self {
        PurchaseModel {
            id: purchase.id.to_string(),
            user_id: purchase.user_id.to_string(),
            group_id: purchase.group_id.to_string(),
            purchased_on: encode_date(purchase.purchased_on),
            amount: purchase.amount.to_string(),
            store: purchase.store.clone(),
            notes: purchase.notes.clone(),
        }
    }
}

pub struct SqlitePurchaseRepository {
    pool: SqlitePool,
}

impl SqlitePurchaseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PurchaseRepository for SqlitePurchaseRepository {
    async fn save(&self, purchase: &Purchase) -> Result<Purchase, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let model = PurchaseModel::from(purchase);
        let id = purchase.id.to_string();
        let result = tokio::task::spawn_blocking(move || {
            diesel::insert_into(purchases::table)
                .values(&model)
                .execute(&mut conn)?;

            purchases::table
                .filter(purchases::id.eq(id))
                .select(PurchaseModel::as_select())
                .first::<PurchaseModel>(&mut conn)
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        Purchase::try_from(result)
    }

    async fn find_in_range(
        &self,
        group_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<Purchase>, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let from = encode_date(range.from);
        let to = encode_date(range.to);
        let result = tokio::task::spawn_blocking(move || {
            purchases::table
                .filter(purchases::group_id.eq(group_id.to_string()))
                .filter(purchases::purchased_on.ge(from))
                .filter(purchases::purchased_on.le(to))
                .order(purchases::purchased_on.asc())
                .select(PurchaseModel::as_select())
                .load::<PurchaseModel>(&mut conn)
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        result.into_iter().map(Purchase::try_from).collect()
    }
}
