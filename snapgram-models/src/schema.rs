table! {
    comment (id) {
        id -> Int4,
        comment_text -> Varchar,
        author_id -> Int4,
        post_id -> Int4,
    }
}

table! {
    follower (user_from_id, user_to_id) {
        user_from_id -> Int4,
        user_to_id -> Int4,
    }
}

table! {
    media (media_id) {
        media_id -> Int4,
        #[sql_name = "type"]
        type_ -> Varchar,
        url -> Varchar,
        post_id -> Int4,
    }
}

table! {
    post (id) {
        id -> Int4,
        poster_id -> Int4,
    }
}

table! {
    user (id) {
        id -> Int4,
        email -> Varchar,
        password -> Varchar,
        is_active -> Bool,
    }
}

joinable!(comment -> post (post_id));
joinable!(comment -> user (author_id));
joinable!(media -> post (post_id));
joinable!(post -> user (poster_id));

allow_tables_to_appear_in_same_query!(comment, follower, media, post, user,);
