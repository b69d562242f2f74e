//! Tamagotchi pet state and the feed formula.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::Error;

pub const STAT_MIN: i32 = 0;
pub const STAT_MAX: i32 = 100;
pub const NAME_MAX_LEN: usize = 50;

/// Hunger threshold below which feeding also recovers health.
const WELL_FED_HUNGER: i32 = 30;
/// Health recovered per feed while the pet is well fed.
const HEALTH_RECOVERY: i32 = 5;

/// The integer stat triple, each within `[0, 100]`.
///
/// Constructed only through [`Vitals::try_new`] or the feed transition, so
/// a value of this type always satisfies the range invariant. Storage CHECK
/// constraints mirror the same bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vitals {
    hunger: i32,
    happiness: i32,
    health: i32,
}

/// Raised when persisted stats fall outside `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stat} must be within [{STAT_MIN}, {STAT_MAX}], got {value}")]
pub struct VitalsRangeError {
    pub stat: &'static str,
    pub value: i32,
}

impl Vitals {
    /// Stats for a freshly created pet.
    pub fn initial() -> Self {
        Self {
            hunger: 50,
            happiness: 50,
            health: 100,
        }
    }

    /// Validate a stat triple read back from storage.
    pub fn try_new(hunger: i32, happiness: i32, health: i32) -> Result<Self, VitalsRangeError> {
        for (stat, value) in [
            ("hunger", hunger),
            ("happiness", happiness),
            ("health", health),
        ] {
            if !(STAT_MIN..=STAT_MAX).contains(&value) {
                return Err(VitalsRangeError { stat, value });
            }
        }
        Ok(Self {
            hunger,
            happiness,
            health,
        })
    }

    pub fn hunger(&self) -> i32 {
        self.hunger
    }

    pub fn happiness(&self) -> i32 {
        self.happiness
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    /// Apply one feeding with the given nutrition value.
    ///
    /// Hunger drops by the nutrition value, happiness rises by half of it,
    /// and health recovers a little once the pet is no longer hungry. All
    /// stats stay clamped to `[0, 100]`.
    pub fn feed(self, nutrition_value: i32) -> Self {
        let nutrition = nutrition_value.max(0);
        let hunger = (self.hunger - nutrition).max(STAT_MIN);
        let happiness = (self.happiness + nutrition / 2).min(STAT_MAX);
        let health = if hunger < WELL_FED_HUNGER {
            (self.health + HEALTH_RECOVERY).min(STAT_MAX)
        } else {
            self.health
        };
        Self {
            hunger,
            happiness,
            health,
        }
    }
}

/// Virtual pet, one per user, created when the starter character is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tamagotchi {
    pub id: Uuid,
    pub user_id: Uuid,
    pub character_id: Uuid,
    pub name: String,
    pub vitals: Vitals,
    pub last_fed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validate a rename request.
pub fn validate_name(raw: &str) -> Result<String, Error> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(Error::validation_field("name", "must not be empty"));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(Error::validation_field(
            "name",
            format!("must be at most {NAME_MAX_LEN} characters"),
        ));
    }
    Ok(name.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn initial_vitals_match_onboarding_contract() {
        let v = Vitals::initial();
        assert_eq!((v.hunger(), v.happiness(), v.health()), (50, 50, 100));
    }

    #[rstest]
    // Nutrition 10 from 50/50/100: hunger 40, happiness +5, no health change.
    #[case(Vitals::initial(), 10, (40, 55, 100))]
    // Hunger floors at zero and still increments happiness.
    #[case(Vitals::try_new(0, 60, 80).unwrap(), 8, (0, 64, 85))]
    // Dropping below the well-fed threshold recovers health.
    #[case(Vitals::try_new(35, 50, 90).unwrap(), 10, (25, 55, 95))]
    // At the threshold exactly, no recovery.
    #[case(Vitals::try_new(40, 50, 90).unwrap(), 10, (30, 55, 90))]
    // Happiness and health cap at 100.
    #[case(Vitals::try_new(10, 99, 98).unwrap(), 20, (0, 100, 100))]
    fn feed_transitions(
        #[case] start: Vitals,
        #[case] nutrition: i32,
        #[case] expected: (i32, i32, i32),
    ) {
        let fed = start.feed(nutrition);
        assert_eq!((fed.hunger(), fed.happiness(), fed.health()), expected);
    }

    #[rstest]
    #[case(-1, 50, 50, "hunger")]
    #[case(50, 101, 50, "happiness")]
    #[case(50, 50, -10, "health")]
    fn try_new_rejects_out_of_range_stats(
        #[case] hunger: i32,
        #[case] happiness: i32,
        #[case] health: i32,
        #[case] stat: &str,
    ) {
        let err = Vitals::try_new(hunger, happiness, health).expect_err("out of range");
        assert_eq!(err.stat, stat);
    }

    #[rstest]
    fn rename_rejects_empty_and_oversized_names() {
        validate_name("  ").expect_err("empty");
        validate_name(&"x".repeat(NAME_MAX_LEN + 1)).expect_err("too long");
        assert_eq!(validate_name("  Foxy  ").expect("valid"), "Foxy");
    }
}
