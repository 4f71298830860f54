diesel::table! {
    users (user_id) {
        user_id -> Text,
        email -> Nullable<Text>,
        username -> Nullable<Text>,
        location -> Nullable<Text>,
        fcm_token -> Nullable<Text>,
        daily_reminders -> Bool,
        food_updates -> Bool,
        test_notifications -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
