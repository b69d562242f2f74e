//! Diesel/PostgreSQL persistence adapters.
//!
//! One adapter per engine port. Every state-mutating port method runs in
//! exactly one database transaction; the shared `*_ops` modules carry the
//! wallet, inventory, and mission writes that several transactions embed.

mod diesel_adventure_store;
mod diesel_goal_store;
mod diesel_mission_store;
mod diesel_profile_store;
mod diesel_shop_store;
mod diesel_tamagotchi_store;
mod diesel_user_repository;
mod diesel_wallet_store;
mod error_mapping;
mod inventory_ops;
mod mission_ops;
mod models;
pub mod pool;
pub mod schema;
mod wallet_ops;

pub use diesel_adventure_store::DieselAdventureStore;
pub use diesel_goal_store::DieselGoalStore;
pub use diesel_mission_store::DieselMissionStore;
pub use diesel_profile_store::DieselProfileStore;
pub use diesel_shop_store::DieselShopStore;
pub use diesel_tamagotchi_store::DieselTamagotchiStore;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_wallet_store::DieselWalletStore;
pub use pool::{DbPool, PoolConfig, PoolError};
