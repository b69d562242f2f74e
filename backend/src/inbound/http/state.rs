//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data`, so they depend only on
//! domain services and stay testable with fixture ports.

use std::sync::Arc;

use crate::domain::adventure_service::AdventureService;
use crate::domain::auth_service::AuthService;
use crate::domain::goal_service::GoalService;
use crate::domain::mission_service::MissionService;
use crate::domain::ports::TokenService;
use crate::domain::profile_service::ProfileService;
use crate::domain::shop_service::ShopService;
use crate::domain::tamagotchi_service::TamagotchiService;
use crate::domain::wallet_service::WalletService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: AuthService,
    pub profiles: ProfileService,
    pub wallet: WalletService,
    pub shop: ShopService,
    pub missions: MissionService,
    pub tamagotchi: TamagotchiService,
    pub goals: GoalService,
    pub adventures: AdventureService,
    /// Resolves bearer credentials for the auth gate extractor.
    pub tokens: Arc<dyn TokenService>,
}

impl HttpState {
    /// State wired entirely to fixture ports, for handler tests.
    pub fn fixtures() -> Self {
        use crate::domain::ports::fixtures::{
            FixtureAdventureSource, FixtureAdventureStore, FixtureGoalStore, FixtureMissionStore,
            FixturePasswordHasher, FixtureProfileStore, FixtureShopStore, FixtureTamagotchiStore,
            FixtureTokenService, FixtureUserRepository, FixtureWalletStore,
        };

        let tokens: Arc<dyn TokenService> = Arc::new(FixtureTokenService);
        Self {
            auth: AuthService::new(
                Arc::new(FixtureUserRepository),
                Arc::new(FixturePasswordHasher),
                tokens.clone(),
            ),
            profiles: ProfileService::new(Arc::new(FixtureProfileStore), Arc::new(FixtureShopStore)),
            wallet: WalletService::new(Arc::new(FixtureWalletStore), Arc::new(FixtureProfileStore)),
            shop: ShopService::new(Arc::new(FixtureShopStore)),
            missions: MissionService::new(Arc::new(FixtureMissionStore)),
            tamagotchi: TamagotchiService::new(Arc::new(FixtureTamagotchiStore)),
            goals: GoalService::new(Arc::new(FixtureGoalStore)),
            adventures: AdventureService::new(
                Arc::new(FixtureAdventureStore),
                Arc::new(FixtureProfileStore),
                Arc::new(FixtureGoalStore),
                Arc::new(FixtureAdventureSource),
            ),
            tokens,
        }
    }
}
