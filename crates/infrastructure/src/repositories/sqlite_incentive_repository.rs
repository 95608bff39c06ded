use crate::database::{incentive_definitions, incentive_realizations, SqlitePool};
use crate::repositories::{
    decode_amount, decode_date, decode_id, encode_date, map_diesel_error, map_pool_error,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use domain::{
    DateRange, DomainError, IncentiveDefinition, IncentiveRealization, IncentiveRepository,
    RealizedIncentive,
};
use uuid::Uuid;

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = incentive_definitions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct DefinitionModel {
    id: String,
    group_id: String,
    name: String,
    amount: String,
    effective_from: String,
    effective_until: Option<String>,
    on_purchase: i32,
    description: Option<String>,
}

impl TryFrom<DefinitionModel> for IncentiveDefinition {
    type Error = DomainError;

    fn try_from(model: DefinitionModel) -> Result<Self, Self::Error> {
        Ok(IncentiveDefinition {
            id: decode_id(&model.id)?,
            group_id: decode_id(&model.group_id)?,
            name: model.name,
            amount: decode_amount(&model.amount)?,
            effective_from: decode_date(&model.effective_from)?,
            effective_until: model.effective_until.as_deref().map(decode_date).transpose()?,
            // the store keeps booleans as 0/1 integers
            on_purchase: model.on_purchase != 0,
            description: model.description,
        })
    }
}

impl From<&IncentiveDefinition> for DefinitionModel {
    fn from(definition: &IncentiveDefinition) -> Self {
        DefinitionModel {
            id: definition.id.to_string(),
            group_id: definition.group_id.to_string(),
            name: definition.name.clone(),
            amount: definition.amount.to_string(),
            effective_from: encode_date(definition.effective_from),
            effective_until: definition.effective_until.map(encode_date),
            on_purchase: i32::from(definition.on_purchase),
            description: definition.description.clone(),
        }
    }
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = incentive_realizations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct RealizationModel {
    id: String,
    user_id: String,
    incentive_id: String,
    realized_on: String,
    notes: Option<String>,
}

impl TryFrom<RealizationModel> for IncentiveRealization {
    type Error = DomainError;

    fn try_from(model: RealizationModel) -> Result<Self, Self::Error> {
        Ok(IncentiveRealization {
            id: decode_id(&model.id)?,
            user_id: decode_id(&model.user_id)?,
            incentive_id: decode_id(&model.incentive_id)?,
            realized_on: decode_date(&model.realized_on)?,
            notes: model.notes,
        })
    }
}

impl From<&IncentiveRealization> for RealizationModel {
    fn from(realization: &IncentiveRealization) -> Self {
        RealizationModel {
            id: realization.id.to_string(),
            user_id: realization.user_id.to_string(),
            incentive_id: realization.incentive_id.to_string(),
            realized_on: encode_date(realization.realized_on),
            notes: realization.notes.clone(),
        }
    }
}

pub struct SqliteIncentiveRepository {
    pool: SqlitePool,
}

impl SqliteIncentiveRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IncentiveRepository for SqliteIncentiveRepository {
    async fn find_definition(
        &self,
        id: Uuid,
    ) -> Result<Option<IncentiveDefinition>, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let result = tokio::task::spawn_blocking(move || {
            incentive_definitions::table
                .filter(incentive_definitions::id.eq(id.to_string()))
                .select(DefinitionModel::as_select())
                .first::<DefinitionModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        result.map(IncentiveDefinition::try_from).transpose()
    }

    async fn find_definition_by_name(
        &self,
        group_id: Uuid,
        name: &str,
    ) -> Result<Option<IncentiveDefinition>, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let name = name.to_string();
        let result = tokio::task::spawn_blocking(move || {
            incentive_definitions::table
                .filter(incentive_definitions::group_id.eq(group_id.to_string()))
                .filter(incentive_definitions::name.eq(name))
                .select(DefinitionModel::as_select())
                .first::<DefinitionModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        result.map(IncentiveDefinition::try_from).transpose()
    }

    async fn find_definitions(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<IncentiveDefinition>, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let result = tokio::task::spawn_blocking(move || {
            incentive_definitions::table
                .filter(incentive_definitions::group_id.eq(group_id.to_string()))
                .order(incentive_definitions::name.asc())
                .select(DefinitionModel::as_select())
                .load::<DefinitionModel>(&mut conn)
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        result
            .into_iter()
            .map(IncentiveDefinition::try_from)
            .collect()
    }

    async fn find_on_purchase_effective(
        &self,
        group_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<IncentiveDefinition>, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let today = encode_date(date);
        let result = tokio::task::spawn_blocking(move || {
            // effective_from <= today AND (until is null OR until > today)
            incentive_definitions::table
                .filter(incentive_definitions::group_id.eq(group_id.to_string()))
                .filter(incentive_definitions::on_purchase.eq(1))
                .filter(incentive_definitions::effective_from.le(today.clone()))
                .filter(
                    incentive_definitions::effective_until
                        .is_null()
                        .or(incentive_definitions::effective_until.gt(today)),
                )
                .order(incentive_definitions::name.asc())
                .select(DefinitionModel::as_select())
                .load::<DefinitionModel>(&mut conn)
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        result
            .into_iter()
            .map(IncentiveDefinition::try_from)
            .collect()
    }

    async fn save_definition(
        &self,
        definition: &IncentiveDefinition,
    ) -> Result<IncentiveDefinition, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let model = DefinitionModel::from(definition);
        let id = definition.id.to_string();
        let result = tokio::task::spawn_blocking(move || {
            diesel::insert_into(incentive_definitions::table)
                .values(&model)
                .execute(&mut conn)?;

            incentive_definitions::table
                .filter(incentive_definitions::id.eq(id))
                .select(DefinitionModel::as_select())
                .first::<DefinitionModel>(&mut conn)
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        IncentiveDefinition::try_from(result)
    }

    async fn save_realization(
        &self,
        realization: &IncentiveRealization,
    ) -> Result<IncentiveRealization, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let model = RealizationModel::from(realization);
        let id = realization.id.to_string();
        let result = tokio::task::spawn_blocking(move || {
            diesel::insert_into(incentive_realizations::table)
                .values(&model)
                .execute(&mut conn)?;

            incentive_realizations::table
                .filter(incentive_realizations::id.eq(id))
                .select(RealizationModel::as_select())
                .first::<RealizationModel>(&mut conn)
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        IncentiveRealization::try_from(result)
    }

    async fn find_realized_in_range(
        &self,
        group_id: Uuid,
        range: &DateRange,
    ) -> Result<Vec<RealizedIncentive>, DomainError> {
        let mut conn = self.pool.get().map_err(map_pool_error)?;

        let from = encode_date(range.from);
        let to = encode_date(range.to);
        let rows = tokio::task::spawn_blocking(move || {
            incentive_realizations::table
                .inner_join(incentive_definitions::table)
                .filter(incentive_definitions::group_id.eq(group_id.to_string()))
                .filter(incentive_realizations::realized_on.ge(from))
                .filter(incentive_realizations::realized_on.le(to))
                .order(incentive_realizations::realized_on.asc())
                .select((
                    RealizationModel::as_select(),
                    incentive_definitions::name,
                    incentive_definitions::amount,
                ))
                .load::<(RealizationModel, String, String)>(&mut conn)
        })
        .await
        .map_err(map_pool_error)?
        .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(model, name, amount)| {
                Ok(RealizedIncentive {
                    realization: IncentiveRealization::try_from(model)?,
                    incentive_name: name,
                    amount: decode_amount(&amount)?,
                })
            })
            .collect()
    }
}
