pub mod group_repository;
pub mod incentive_repository;
pub mod membership_repository;
pub mod purchase_repository;
pub mod user_repository;

pub use group_repository::GroupRepository;
pub use incentive_repository::IncentiveRepository;
pub use membership_repository::MembershipRepository;
pub use purchase_repository::PurchaseRepository;
pub use user_repository::UserRepository;
