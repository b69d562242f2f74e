//! Onboarding endpoints: starter characters and the starter choice.
//!
//! ```text
//! GET  /api/characters/starter
//! POST /api/characters/choose
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::schemas::CharacterBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_uuid;
use crate::inbound::http::ApiResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StarterCharactersBody {
    pub characters: Vec<CharacterBody>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChooseStarterRequest {
    pub character_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StarterChosenBody {
    pub tamagotchi_id: String,
    pub character: CharacterBody,
    pub tamagotchi: StarterVitalsBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct StarterVitalsBody {
    pub hunger: i32,
    pub happiness: i32,
    pub health: i32,
}

/// List characters eligible as the first tamagotchi.
#[get("/characters/starter")]
pub async fn list_starters(
    state: web::Data<HttpState>,
    _auth: AuthContext,
) -> ApiResult<web::Json<StarterCharactersBody>> {
    let characters = state.profiles.list_starter_characters().await?;
    Ok(web::Json(StarterCharactersBody {
        characters: characters.into_iter().map(CharacterBody::from).collect(),
    }))
}

/// Pick the starter character and bootstrap the tamagotchi.
#[post("/characters/choose")]
pub async fn choose_starter(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<ChooseStarterRequest>,
) -> ApiResult<HttpResponse> {
    let character_id = parse_uuid(&payload.character_id, "characterId")?;
    let selection = state
        .profiles
        .choose_starter(auth.user_id(), character_id)
        .await?;

    let vitals = selection.tamagotchi.vitals;
    Ok(HttpResponse::Created().json(StarterChosenBody {
        tamagotchi_id: selection.tamagotchi.id.to_string(),
        character: CharacterBody::from(selection.character),
        tamagotchi: StarterVitalsBody {
            hunger: vitals.hunger(),
            happiness: vitals.happiness(),
            health: vitals.health(),
        },
    }))
}
