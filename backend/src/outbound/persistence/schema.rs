//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.
//! Monetary columns are `NUMERIC(10,2)`. CHECK constraints (non-negative
//! wallet balance, tamagotchi stats in `[0,100]`) and the cascading foreign
//! keys from `users` live in the migrations.

diesel::table! {
    /// Registered accounts. `username` and `email` carry unique indexes.
    users (id) {
        id -> Uuid,
        #[max_length = 50]
        username -> Varchar,
        #[max_length = 255]
        email -> Varchar,
        password_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Player profiles, one per user.
    profiles (id) {
        id -> Uuid,
        user_id -> Uuid,
        age -> Int4,
        allowance -> Numeric,
        #[max_length = 3]
        currency -> Varchar,
        onboarding_completed -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Character catalog, seeded externally.
    characters (id) {
        id -> Uuid,
        #[max_length = 100]
        name -> Varchar,
        image_url -> Nullable<Text>,
        is_starter -> Bool,
        price -> Numeric,
    }
}

diesel::table! {
    /// Food catalog, seeded externally.
    foods (id) {
        id -> Uuid,
        #[max_length = 100]
        name -> Varchar,
        nutrition_value -> Int4,
        price -> Numeric,
        image_url -> Nullable<Text>,
    }
}

diesel::table! {
    /// Virtual pets, one per user.
    tamagotchis (id) {
        id -> Uuid,
        user_id -> Uuid,
        character_id -> Uuid,
        #[max_length = 50]
        name -> Varchar,
        hunger -> Int4,
        happiness -> Int4,
        health -> Int4,
        last_fed_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Coin wallets, one per user, created lazily.
    wallets (id) {
        id -> Uuid,
        user_id -> Uuid,
        balance -> Numeric,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only ledger; signed amounts sum to the wallet balance.
    wallet_transactions (id) {
        id -> Uuid,
        wallet_id -> Uuid,
        amount -> Numeric,
        #[max_length = 50]
        transaction_type -> Varchar,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Owned items; unique per (user_id, item_type, item_id).
    user_inventory (id) {
        id -> Uuid,
        user_id -> Uuid,
        #[max_length = 20]
        item_type -> Varchar,
        item_id -> Uuid,
        quantity -> Int4,
        acquired_at -> Timestamptz,
    }
}

diesel::table! {
    /// Mission catalog; one mission per active UTC date.
    missions (id) {
        id -> Uuid,
        #[max_length = 200]
        title -> Varchar,
        description -> Text,
        #[max_length = 50]
        mission_type -> Varchar,
        requirements -> Jsonb,
        reward_coins -> Numeric,
        active_date -> Date,
    }
}

diesel::table! {
    /// Per-user mission progress; unique per (user_id, mission_id).
    user_missions (id) {
        id -> Uuid,
        user_id -> Uuid,
        mission_id -> Uuid,
        progress -> Jsonb,
        completed -> Bool,
        completed_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only expense activity ledger.
    expenses (id) {
        id -> Uuid,
        user_id -> Uuid,
        amount -> Numeric,
        #[max_length = 100]
        category -> Varchar,
        description -> Nullable<Text>,
        logged_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only saving activity ledger.
    savings (id) {
        id -> Uuid,
        user_id -> Uuid,
        amount -> Numeric,
        #[max_length = 100]
        source -> Nullable<Varchar>,
        logged_at -> Timestamptz,
    }
}

diesel::table! {
    /// Savings goals.
    goals (id) {
        id -> Uuid,
        user_id -> Uuid,
        #[max_length = 200]
        title -> Varchar,
        description -> Nullable<Text>,
        target_amount -> Numeric,
        current_amount -> Numeric,
        completed -> Bool,
        completed_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Two-phase adventure records with their AI trace ids.
    adventures (id) {
        id -> Uuid,
        user_id -> Uuid,
        scenario -> Text,
        choices -> Jsonb,
        selected_choice_index -> Nullable<Int4>,
        feedback -> Nullable<Text>,
        scores -> Nullable<Jsonb>,
        #[max_length = 100]
        generation_trace_id -> Varchar,
        #[max_length = 100]
        evaluation_trace_id -> Nullable<Varchar>,
        created_at -> Timestamptz,
        evaluated_at -> Nullable<Timestamptz>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    users,
    profiles,
    characters,
    foods,
    tamagotchis,
    wallets,
    wallet_transactions,
    user_inventory,
    missions,
    user_missions,
    expenses,
    savings,
    goals,
    adventures,
);
