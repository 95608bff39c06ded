// Database schema for the group ledger. Calendar dates are stored as
// ISO-8601 text so lexicographic range filters are chronological; amounts
// are fixed-point decimal text; flags are 0/1 integers.
diesel::table! {
    users (id) {
        id -> Text,
        username -> Text,
        display_name -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    groups (id) {
        id -> Text,
        name -> Text,
        status -> Text,            // open, locked
        max_members -> Nullable<Integer>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    memberships (id) {
        id -> Text,
        user_id -> Text,
        group_id -> Text,
        joined_on -> Text,
        left_on -> Nullable<Text>, // null while the interval is open
    }
}

diesel::table! {
    purchases (id) {
        id -> Text,
        user_id -> Text,
        group_id -> Text,
        purchased_on -> Text,
        amount -> Text,            // fixed-point decimal, 2 fractional digits
        store -> Nullable<Text>,
        notes -> Nullable<Text>,
    }
}

diesel::table! {
    incentive_definitions (id) {
        id -> Text,
        group_id -> Text,
        name -> Text,
        amount -> Text,
        effective_from -> Text,
        effective_until -> Nullable<Text>,
        on_purchase -> Integer,    // 0/1 flag
        description -> Nullable<Text>,
    }
}

diesel::table! {
    incentive_realizations (id) {
        id -> Text,
        user_id -> Text,
        incentive_id -> Text,
        realized_on -> Text,
        notes -> Nullable<Text>,
    }
}

diesel::joinable!(memberships -> users (user_id));
diesel::joinable!(memberships -> groups (group_id));
diesel::joinable!(purchases -> users (user_id));
diesel::joinable!(purchases -> groups (group_id));
diesel::joinable!(incentive_definitions -> groups (group_id));
diesel::joinable!(incentive_realizations -> users (user_id));
diesel::joinable!(incentive_realizations -> incentive_definitions (incentive_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    groups,
    memberships,
    purchases,
    incentive_definitions,
    incentive_realizations,
);
