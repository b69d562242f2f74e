//! Server assembly: adapter wiring and the HTTP application factory.

pub mod config;

use std::sync::Arc;

use actix_web::{web, App, HttpServer, Scope};
use tracing::info;

use crate::domain::adventure_service::AdventureService;
use crate::domain::auth_service::AuthService;
use crate::domain::goal_service::GoalService;
use crate::domain::mission_service::MissionService;
use crate::domain::profile_service::ProfileService;
use crate::domain::shop_service::ShopService;
use crate::domain::tamagotchi_service::TamagotchiService;
use crate::domain::wallet_service::WalletService;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{
    adventure, characters, goals, health, missions, profile, shop, tamagotchi, users, wallet,
};
use crate::middleware::RequestTrace;
use crate::outbound::ai::AdventureHttpSource;
use crate::outbound::persistence::{
    DbPool, DieselAdventureStore, DieselGoalStore, DieselMissionStore, DieselProfileStore,
    DieselShopStore, DieselTamagotchiStore, DieselUserRepository, DieselWalletStore, PoolConfig,
};
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenService};

use self::config::AppConfig;

/// Wire the production adapters into the handler state.
pub fn build_state(pool: DbPool, config: &AppConfig) -> Result<HttpState, reqwest::Error> {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let profiles = Arc::new(DieselProfileStore::new(pool.clone()));
    let wallets = Arc::new(DieselWalletStore::new(pool.clone()));
    let shop_store = Arc::new(DieselShopStore::new(pool.clone()));
    let mission_store = Arc::new(DieselMissionStore::new(pool.clone()));
    let tamagotchi_store = Arc::new(DieselTamagotchiStore::new(pool.clone()));
    let goal_store = Arc::new(DieselGoalStore::new(pool.clone()));
    let adventure_store = Arc::new(DieselAdventureStore::new(pool));

    let tokens = Arc::new(JwtTokenService::new(
        &config.jwt.secret,
        config.jwt.expiration_seconds,
    ));
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let ai_source = Arc::new(AdventureHttpSource::new(config.ai.clone())?);

    Ok(HttpState {
        auth: AuthService::new(users, hasher, tokens.clone()),
        profiles: ProfileService::new(profiles.clone(), shop_store.clone()),
        wallet: WalletService::new(wallets, profiles.clone()),
        shop: ShopService::new(shop_store),
        missions: MissionService::new(mission_store),
        tamagotchi: TamagotchiService::new(tamagotchi_store),
        goals: GoalService::new(goal_store.clone()),
        adventures: AdventureService::new(adventure_store, profiles, goal_store, ai_source),
        tokens,
    })
}

/// The full REST surface under the configured prefix.
pub fn api_scope(prefix: &str) -> Scope {
    web::scope(prefix)
        .service(users::register)
        .service(users::login)
        .service(profile::create_profile)
        .service(profile::get_profile)
        .service(characters::list_starters)
        .service(characters::choose_starter)
        .service(wallet::get_wallet)
        .service(wallet::wallet_history)
        .service(shop::list_characters)
        .service(shop::list_foods)
        .service(shop::inventory)
        .service(shop::buy)
        .service(missions::todays_mission)
        .service(missions::log_expense)
        .service(missions::log_saving)
        .service(missions::list_expenses)
        .service(missions::list_savings)
        .service(tamagotchi::get_tamagotchi)
        .service(tamagotchi::feed)
        .service(tamagotchi::rename)
        .service(goals::create_goal)
        .service(goals::list_goals)
        .service(goals::list_active_goals)
        .service(goals::list_completed_goals)
        .service(goals::add_progress)
        .service(goals::delete_goal)
        .service(adventure::generate)
        .service(adventure::submit_choice)
        .service(adventure::history)
        .service(adventure::get_adventure)
}

/// Build the pool, wire the state, and serve until shutdown.
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    let pool_config = PoolConfig::new(config.db.url())
        .with_max_size(config.db.pool_max)
        .with_min_idle(Some(config.db.pool_min))
        .with_connection_timeout(config.db.connect_timeout)
        .with_idle_timeout(Some(config.db.idle_timeout));
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|err| std::io::Error::other(format!("database pool: {err}")))?;

    let state = build_state(pool, &config)
        .map_err(|err| std::io::Error::other(format!("AI client: {err}")))?;

    let prefix = config.http.api_prefix.clone();
    let bind_addr = ("0.0.0.0", config.http.port);
    info!(port = config.http.port, prefix = %prefix, "starting server");

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(RequestTrace)
            .service(api_scope(&prefix))
            .service(health::health);

        #[cfg(feature = "metrics")]
        let app = app.wrap(make_metrics());

        app
    })
    .bind(bind_addr)?;

    server.run().await
}

#[cfg(feature = "metrics")]
fn make_metrics() -> actix_web_prom::PrometheusMetrics {
    actix_web_prom::PrometheusMetricsBuilder::new("saverfox")
        .endpoint("/metrics")
        .build()
        .expect("configure Prometheus metrics")
}
