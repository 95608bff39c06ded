use domain::*;
use infrastructure::*;
use std::sync::Arc;

/// Ledger Application - wires the persistence adapters into the engine.
pub struct LedgerApp {
    pub ledger_service: Arc<LedgerService>,
}

impl LedgerApp {
    pub fn new(database_path: &str) -> Self {
        // Infrastructure layer - database setup
        let database = Database::new(database_path);
        let pool = database.get_pool().clone();

        // Create repository implementations
        let user_repository: Arc<dyn UserRepository> =
            Arc::new(SqliteUserRepository::new(pool.clone()));
        let group_repository: Arc<dyn GroupRepository> =
            Arc::new(SqliteGroupRepository::new(pool.clone()));
        let membership_repository: Arc<dyn MembershipRepository> =
            Arc::new(SqliteMembershipRepository::new(pool.clone()));
        let purchase_repository: Arc<dyn PurchaseRepository> =
            Arc::new(SqlitePurchaseRepository::new(pool.clone()));
        let incentive_repository: Arc<dyn IncentiveRepository> =
            Arc::new(SqliteIncentiveRepository::new(pool));

        let ledger_service = Arc::new(LedgerService::new(
            user_repository,
            group_repository,
            membership_repository,
            purchase_repository,
            incentive_repository,
        ));

        Self { ledger_service }
    }
}
