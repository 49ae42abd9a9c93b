//! Diesel table definitions.
//!
//! Must mirror `backend/migrations`. Regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Pet profiles, one row per pet, scoped by owner.
    pets (id) {
        id -> Uuid,
        /// Owning user; every query filters on it.
        user_id -> Uuid,
        name -> Text,
        /// Non-negative, enforced by `pets_age_check`.
        age -> Int4,
        breed -> Text,
        /// `Dog` or `Cat`, nullable.
        kind -> Nullable<Text>,
        /// `<user_id>/<id>/avatar` once an avatar is linked.
        avatar_path -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Daycare reservations referencing a pet of the same owner.
    reservations (id) {
        id -> Uuid,
        user_id -> Uuid,
        pet_id -> Uuid,
        name -> Text,
        date -> Date,
        time -> Time,
        /// `daycare`, `grooming` or `boarding`.
        service -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(reservations -> pets (pet_id));
diesel::allow_tables_to_appear_in_same_query!(pets, reservations);
