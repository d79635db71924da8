table! {
    categories (id) {
        id -> Int4,
        title -> Varchar,
        description -> Text,
        slug -> Varchar,
        is_published -> Bool,
        creation_date -> Timestamp,
    }
}

table! {
    comments (id) {
        id -> Int4,
        content -> Text,
        creation_date -> Timestamp,
        post_id -> Int4,
        author_id -> Int4,
    }
}

table! {
    locations (id) {
        id -> Int4,
        name -> Varchar,
        is_published -> Bool,
        creation_date -> Timestamp,
    }
}

table! {
    posts (id) {
        id -> Int4,
        title -> Varchar,
        content -> Text,
        pub_date -> Timestamp,
        is_published -> Bool,
        creation_date -> Timestamp,
        image -> Nullable<Varchar>,
        author_id -> Int4,
        location_id -> Nullable<Int4>,
        category_id -> Nullable<Int4>,
    }
}

table! {
    users (id) {
        id -> Int4,
        username -> Varchar,
        email -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        hashed_password -> Nullable<Text>,
        creation_date -> Timestamp,
    }
}

joinable!(comments -> posts (post_id));
joinable!(comments -> users (author_id));
joinable!(posts -> categories (category_id));
joinable!(posts -> locations (location_id));
joinable!(posts -> users (author_id));

allow_tables_to_appear_in_same_query!(categories, comments, locations, posts, users,);
