table! {
    use crate::datastore::structs::AccountTypeMapping;
    #[allow(unused_imports)]
    use diesel::sql_types::*;
    users (id) {
        id -> Uuid,
        created_at -> Timestamptz,
        username -> Text,
        email -> Text,
        first_name -> Nullable<Text>,
        last_name -> Nullable<Text>,
        biography -> Nullable<Text>,
        profile_photo -> Nullable<Text>,
        account_type -> AccountTypeMapping,
        admin -> Bool,
    }
}

table! {
    posts (id) {
        id -> Uuid,
        posted_on -> Timestamptz,
        text -> Text,
        posted_by -> Uuid,
    }
}

table! {
    bookmarks (bookmarked_by, bookmarked_tuit) {
        bookmarked_by -> Uuid,
        bookmarked_tuit -> Uuid,
        created_at -> Timestamptz,
    }
}

table! {
    likes (liked_by, tuit) {
        liked_by -> Uuid,
        tuit -> Uuid,
        created_at -> Timestamptz,
    }
}

table! {
    follows (user_following, user_followed) {
        user_following -> Uuid,
        user_followed -> Uuid,
        created_at -> Timestamptz,
    }
}

joinable!(posts -> users (posted_by));
joinable!(bookmarks -> posts (bookmarked_tuit));
joinable!(likes -> posts (tuit));

allow_tables_to_appear_in_same_query!(users, posts, bookmarks, likes, follows);
