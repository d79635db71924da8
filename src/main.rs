#![feature(decl_macro, proc_macro_hygiene)]

#[macro_use]
extern crate diesel_migrations;
#[macro_use]
extern crate rocket;
#[macro_use]
extern crate serde_json;
#[macro_use]
extern crate shrinkwraprs;

use blogicum_models::{
    db_conn::{DbPool, PragmaForeignKey},
    Connection, CONFIG,
};
use diesel::r2d2::ConnectionManager;
use rocket_contrib::templates::Template;

mod routes;
mod utils;

#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
embed_migrations!("migrations/sqlite");
#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
embed_migrations!("migrations/postgres");

/// Initializes a database pool.
fn init_pool(database_url: &str) -> Option<DbPool> {
    let manager = ConnectionManager::<Connection>::new(database_url);
    DbPool::builder()
        .connection_customizer(Box::new(PragmaForeignKey))
        .build(manager)
        .ok()
}

fn rocket_app(pool: DbPool) -> rocket::Rocket {
    rocket::custom(CONFIG.rocket.clone().expect("Error while loading Rocket config"))
        .mount(
            "/",
            routes![
                routes::static_files,
                routes::media_files,
                routes::posts::index,
                routes::posts::category,
                routes::posts::details,
                routes::posts::new,
                routes::posts::new_auth,
                routes::posts::create,
                routes::posts::create_auth,
                routes::posts::edit,
                routes::posts::edit_auth,
                routes::posts::update,
                routes::posts::update_auth,
                routes::posts::delete,
                routes::posts::delete_auth,
                routes::comments::create,
                routes::comments::create_auth,
                routes::comments::edit,
                routes::comments::edit_auth,
                routes::comments::update,
                routes::comments::update_auth,
                routes::comments::delete,
                routes::comments::delete_auth,
                routes::user::details,
                routes::user::edit,
                routes::user::edit_auth,
                routes::user::update,
                routes::user::update_auth,
                routes::user::new,
                routes::user::create,
                routes::session::new,
                routes::session::create,
                routes::session::delete,
            ],
        )
        .register(catchers![
            routes::errors::not_found,
            routes::errors::server_error,
        ])
        .manage(pool)
        .attach(Template::fairing())
}

fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let pool =
        init_pool(CONFIG.database_url.as_str()).expect("main: database pool initialization error");
    let conn = pool.get().expect("main: database connection error");
    embedded_migrations::run_with_output(&*conn, &mut std::io::stdout())
        .expect("main: migration error");
    drop(conn);

    rocket_app(pool).launch();
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogicum_models::{
        comments::Comment,
        posts::{NewPost, Post},
        safe_string::SafeString,
        users::{NewUser, User, AUTH_COOKIE},
    };
    use chrono::{Duration, Utc};
    use rocket::{
        http::{ContentType, Cookie, Status},
        local::Client,
    };
    use std::sync::atomic::{AtomicU32, Ordering};

    static DB_COUNT: AtomicU32 = AtomicU32::new(0);

    // Each test gets its own throwaway SQLite file, so they can run
    // in parallel.
    fn client() -> (Client, DbPool) {
        let path = std::env::temp_dir().join(format!(
            "blogicum-test-{}-{}.sqlite3",
            std::process::id(),
            DB_COUNT.fetch_add(1, Ordering::SeqCst)
        ));
        let _ = std::fs::remove_file(&path);
        let url = path.to_str().expect("temp database path").to_owned();
        let pool = init_pool(&url).expect("test: database pool");
        {
            let conn = pool.get().expect("test: database connection");
            embedded_migrations::run(&*conn).expect("test: migrations");
        }
        let client = Client::new(rocket_app(pool.clone())).expect("test: rocket client");
        (client, pool)
    }

    fn create_user(pool: &DbPool, name: &str) -> User {
        let conn = pool.get().expect("test: database connection");
        NewUser::new_local(
            &conn,
            name.to_owned(),
            format!("{}@example.com", name),
            String::new(),
            String::new(),
            "invalid_password",
        )
        .expect("test: user")
    }

    fn create_post(pool: &DbPool, author: &User, title: &str, published: bool) -> Post {
        let conn = pool.get().expect("test: database connection");
        Post::insert(
            &conn,
            NewPost {
                title: title.to_owned(),
                content: SafeString::new("Some content"),
                pub_date: Utc::now().naive_utc() - Duration::hours(1),
                is_published: published,
                creation_date: None,
                image: None,
                author_id: author.id,
                location_id: None,
                category_id: None,
            },
        )
        .expect("test: post")
    }

    fn auth_cookie(user: &User) -> Cookie<'static> {
        Cookie::new(AUTH_COOKIE, user.id.to_string())
    }

    #[test]
    fn feed_only_shows_visible_posts() {
        let (client, pool) = client();
        let alice = create_user(&pool, "alice");
        create_post(&pool, &alice, "A public post", true);
        create_post(&pool, &alice, "A secret draft", false);
        {
            let conn = pool.get().expect("test: database connection");
            Post::insert(
                &conn,
                NewPost {
                    title: "From the future".to_owned(),
                    content: SafeString::new("Soon"),
                    pub_date: Utc::now().naive_utc() + Duration::days(2),
                    is_published: true,
                    creation_date: None,
                    image: None,
                    author_id: alice.id,
                    location_id: None,
                    category_id: None,
                },
            )
            .expect("test: post");
        }

        let mut response = client.get("/").dispatch();
        assert_eq!(Status::Ok, response.status());
        let body = response.body_string().expect("test: body");
        assert!(body.contains("A public post"));
        assert!(!body.contains("A secret draft"));
        assert!(!body.contains("From the future"));
    }

    #[test]
    fn hidden_post_is_not_found_for_strangers() {
        let (client, pool) = client();
        let alice = create_user(&pool, "alice");
        let bob = create_user(&pool, "bob");
        let draft = create_post(&pool, &alice, "A secret draft", false);

        let response = client.get(format!("/posts/{}", draft.id)).dispatch();
        assert_eq!(Status::NotFound, response.status());

        let response = client
            .get(format!("/posts/{}", draft.id))
            .private_cookie(auth_cookie(&bob))
            .dispatch();
        assert_eq!(Status::NotFound, response.status());

        // but it is a perfectly normal page for its author
        let response = client
            .get(format!("/posts/{}", draft.id))
            .private_cookie(auth_cookie(&alice))
            .dispatch();
        assert_eq!(Status::Ok, response.status());
    }

    #[test]
    fn profile_owner_sees_drafts() {
        let (client, pool) = client();
        let alice = create_user(&pool, "alice");
        create_post(&pool, &alice, "A secret draft", false);

        let mut response = client.get("/profile/alice").dispatch();
        assert_eq!(Status::Ok, response.status());
        assert!(!response
            .body_string()
            .expect("test: body")
            .contains("A secret draft"));

        let mut response = client
            .get("/profile/alice")
            .private_cookie(auth_cookie(&alice))
            .dispatch();
        assert_eq!(Status::Ok, response.status());
        assert!(response
            .body_string()
            .expect("test: body")
            .contains("A secret draft"));
    }

    #[test]
    fn anonymous_editor_is_redirected_to_login() {
        let (client, _pool) = client();
        let response = client.get("/posts/create").dispatch();
        assert_eq!(Status::SeeOther, response.status());
        let location = response.headers().get_one("Location").expect("test: location");
        assert!(location.starts_with("/auth/login"));
    }

    #[test]
    fn anonymous_mutations_are_redirected_to_login() {
        let (client, pool) = client();
        let alice = create_user(&pool, "alice");
        let post = create_post(&pool, &alice, "A public post", true);

        let urls = vec![
            "/posts/create".to_owned(),
            format!("/posts/{}/comment", post.id),
            format!("/posts/{}/edit", post.id),
            format!("/posts/{}/delete", post.id),
            "/profile/alice/edit".to_owned(),
        ];
        for url in urls {
            let response = client
                .post(url.clone())
                .header(ContentType::Form)
                .body("content=whatever")
                .dispatch();
            assert_eq!(Status::SeeOther, response.status(), "{}", url);
            let location = response
                .headers()
                .get_one("Location")
                .expect("test: location")
                .to_owned();
            assert!(location.starts_with("/auth/login"), "{}", url);
        }

        // nothing was written along the way
        let conn = pool.get().expect("test: database connection");
        assert!(Comment::for_post(&conn, post.id)
            .expect("test: comments")
            .is_empty());
        assert_eq!("A public post", Post::get(&conn, post.id).expect("test: post").title);
    }

    #[test]
    fn absurd_page_numbers_yield_an_empty_page() {
        let (client, pool) = client();
        let alice = create_user(&pool, "alice");
        create_post(&pool, &alice, "A public post", true);

        let mut response = client.get("/?page=2147483647").dispatch();
        assert_eq!(Status::Ok, response.status());
        assert!(!response
            .body_string()
            .expect("test: body")
            .contains("A public post"));
    }

    #[test]
    fn commenting_requires_a_visible_post() {
        let (client, pool) = client();
        let alice = create_user(&pool, "alice");
        let bob = create_user(&pool, "bob");
        let post = create_post(&pool, &alice, "A public post", true);
        let draft = create_post(&pool, &alice, "A secret draft", false);

        let response = client
            .post(format!("/posts/{}/comment", post.id))
            .header(ContentType::Form)
            .body("content=Interesting")
            .private_cookie(auth_cookie(&bob))
            .dispatch();
        assert_eq!(Status::SeeOther, response.status());
        assert_eq!(
            Some(format!("/posts/{}", post.id).as_str()),
            response.headers().get_one("Location")
        );

        let response = client
            .post(format!("/posts/{}/comment", draft.id))
            .header(ContentType::Form)
            .body("content=Sneaky")
            .private_cookie(auth_cookie(&bob))
            .dispatch();
        assert_eq!(Status::NotFound, response.status());

        let conn = pool.get().expect("test: database connection");
        assert_eq!(1, Comment::for_post(&conn, post.id).expect("test: comments").len());
        assert!(Comment::for_post(&conn, draft.id)
            .expect("test: comments")
            .is_empty());
    }

    #[test]
    fn only_the_author_can_delete_a_post() {
        let (client, pool) = client();
        let alice = create_user(&pool, "alice");
        let bob = create_user(&pool, "bob");
        let post = create_post(&pool, &alice, "A public post", true);

        let response = client
            .post(format!("/posts/{}/delete", post.id))
            .private_cookie(auth_cookie(&bob))
            .dispatch();
        assert_eq!(Status::NotFound, response.status());
        {
            let conn = pool.get().expect("test: database connection");
            assert!(Post::get(&conn, post.id).is_ok());
        }

        let response = client
            .post(format!("/posts/{}/delete", post.id))
            .private_cookie(auth_cookie(&alice))
            .dispatch();
        assert_eq!(Status::SeeOther, response.status());
        let conn = pool.get().expect("test: database connection");
        assert!(Post::get(&conn, post.id).is_err());
    }

    #[test]
    fn registration_creates_an_account() {
        let (client, pool) = client();
        let response = client
            .post("/auth/registration")
            .header(ContentType::Form)
            .body(
                "username=carol&email=carol%40example.com&first_name=Carol&last_name=Doe\
                 &password=verystrongpass&password_confirmation=verystrongpass",
            )
            .dispatch();
        assert_eq!(Status::SeeOther, response.status());

        let conn = pool.get().expect("test: database connection");
        let carol = User::find_by_name(&conn, "carol").expect("test: user");
        assert!(carol.auth("verystrongpass"));
    }

    #[test]
    fn login_and_logout() {
        let (client, pool) = client();
        create_user(&pool, "alice");

        let response = client
            .post("/auth/login")
            .header(ContentType::Form)
            .body("email_or_name=alice&password=invalid_password")
            .dispatch();
        assert_eq!(Status::SeeOther, response.status());
        assert!(response
            .cookies()
            .iter()
            .any(|cookie| cookie.name() == AUTH_COOKIE));

        let mut response = client
            .post("/auth/login")
            .header(ContentType::Form)
            .body("email_or_name=alice&password=wrong")
            .dispatch();
        assert_eq!(Status::Ok, response.status());
        assert!(response
            .body_string()
            .expect("test: body")
            .contains("Invalid username, or password"));

        let response = client.get("/auth/logout").dispatch();
        assert_eq!(Status::SeeOther, response.status());
        assert_eq!(Some("/"), response.headers().get_one("Location"));
    }

    #[test]
    fn unknown_page_renders_the_404_template() {
        let (client, _pool) = client();
        let mut response = client.get("/posts/99999").dispatch();
        assert_eq!(Status::NotFound, response.status());
        assert!(response
            .body_string()
            .expect("test: body")
            .contains("Page not found"));
    }
}
