use crate::{
    routes::{comments::CommentForm, errors::ErrorPage, Page},
    utils,
};
use blogicum_models::{
    categories::Category,
    comments::Comment,
    db_conn::DbConn,
    locations::Location,
    ownership::{can_modify, Target},
    posts::{AnnotatedPost, NewPost, Post},
    safe_string::SafeString,
    users::User,
    Error,
};
use chrono::{NaiveDateTime, Utc};
use rocket::{
    request::LenientForm,
    response::{Flash, Redirect},
};
use rocket_contrib::templates::Template;
use serde::Serialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

#[get("/?<page>")]
pub fn index(conn: DbConn, account: Option<User>, page: Option<Page>) -> Result<Template, ErrorPage> {
    let page = page.unwrap_or_default();
    let posts = AnnotatedPost::from_posts(&conn, Post::visible_page(&conn, page.limits())?)?;
    Ok(Template::render(
        "posts/index",
        json!({
            "account": account,
            "posts": posts,
            "page": *page,
            "n_pages": Page::total(Post::count_visible(&conn)? as i32),
        }),
    ))
}

#[get("/category/<slug>?<page>")]
pub fn category(
    slug: String,
    page: Option<Page>,
    conn: DbConn,
    account: Option<User>,
) -> Result<Template, ErrorPage> {
    let category = Category::find_published_by_slug(&conn, &slug)?;
    let page = page.unwrap_or_default();
    let posts =
        AnnotatedPost::from_posts(&conn, Post::category_page(&conn, &category, page.limits())?)?;
    Ok(Template::render(
        "posts/category",
        json!({
            "account": account,
            "category": category,
            "posts": posts,
            "page": *page,
            "n_pages": Page::total(Post::count_for_category(&conn, &category)? as i32),
        }),
    ))
}

#[get("/posts/<id>")]
pub fn details(id: i32, conn: DbConn, account: Option<User>) -> Result<Template, ErrorPage> {
    let post = Post::get(&conn, id)?;
    let is_author = account
        .as_ref()
        .map(|user| can_modify(user, Target::Post(&post)))
        .unwrap_or(false);
    // drafts, scheduled posts and posts in hidden categories only exist
    // for their author
    if !is_author && !post.is_visible(&conn)? {
        return Err(Error::NotFound.into());
    }
    render_details(&conn, account, post, None, &ValidationErrors::new())
}

pub(crate) fn render_details(
    conn: &DbConn,
    account: Option<User>,
    post: Post,
    comment_form: Option<&CommentForm>,
    errors: &ValidationErrors,
) -> Result<Template, ErrorPage> {
    let is_author = account
        .as_ref()
        .map(|user| can_modify(user, Target::Post(&post)))
        .unwrap_or(false);
    let author = post.get_author(conn)?;
    let category = post.get_category(conn)?;
    let location = post.get_location(conn)?;
    let comments = Comment::for_post_with_authors(conn, post.id)?;
    Ok(Template::render(
        "posts/detail",
        json!({
            "account": account,
            "post": post,
            "author": author,
            "category": category,
            "location": location,
            "comments": comments,
            "is_author": is_author,
            "comment_form": comment_form,
            "errors": errors,
        }),
    ))
}

#[derive(Default, FromForm, Serialize, Validate)]
pub struct NewPostForm {
    #[validate(length(min = 1, max = 256, message = "Your post needs a title"))]
    pub title: String,
    #[validate(length(min = 1, message = "Your post can't be empty"))]
    pub content: String,
    pub pub_date: String,
    pub is_published: Option<bool>,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub image: Option<String>,
}

impl NewPostForm {
    fn from_post(post: &Post) -> NewPostForm {
        NewPostForm {
            title: post.title.clone(),
            content: post.content.get().clone(),
            pub_date: post.pub_date.format("%Y-%m-%dT%H:%M:%S").to_string(),
            is_published: Some(post.is_published),
            category_id: post.category_id,
            location_id: post.location_id,
            image: post.image.clone(),
        }
    }
}

/// An empty date means "now"; anything else has to be a valid
/// HTML `datetime-local` value.
fn parse_pub_date(raw: &str) -> Option<NaiveDateTime> {
    if raw.is_empty() {
        return Some(Utc::now().naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

fn invalid_date() -> ValidationError {
    ValidationError {
        code: Cow::from("pub_date"),
        message: Some(Cow::from("Invalid publication date")),
        params: std::collections::HashMap::new(),
    }
}

fn render_editor(
    conn: &DbConn,
    account: User,
    editing: Option<&Post>,
    form: &NewPostForm,
    errors: &ValidationErrors,
) -> Result<Template, ErrorPage> {
    Ok(Template::render(
        "posts/editor",
        json!({
            "account": account,
            "editing": editing,
            "form": form,
            "errors": errors,
            "categories": Category::list_published(conn)?,
            "locations": Location::list_published(conn)?,
        }),
    ))
}

#[get("/posts/create")]
pub fn new(user: User, conn: DbConn) -> Result<Template, ErrorPage> {
    render_editor(&conn, user, None, &NewPostForm::default(), &ValidationErrors::new())
}

#[get("/posts/create", rank = 2)]
pub fn new_auth() -> Flash<Redirect> {
    utils::requires_login("You need to be logged in to write a new post", uri!(new))
}

#[post("/posts/create", rank = 2)]
pub fn create_auth() -> Flash<Redirect> {
    utils::requires_login("You need to be logged in to write a new post", uri!(new))
}

#[post("/posts/create", data = "<form>")]
pub fn create(
    conn: DbConn,
    form: LenientForm<NewPostForm>,
    user: User,
) -> Result<Result<Redirect, Template>, ErrorPage> {
    let mut errors = match form.validate() {
        Ok(_) => ValidationErrors::new(),
        Err(e) => e,
    };
    let pub_date = parse_pub_date(&form.pub_date);
    if pub_date.is_none() {
        errors.add("pub_date", invalid_date());
    }
    if !errors.is_empty() {
        return Ok(Err(render_editor(&conn, user, None, &form, &errors)?));
    }

    Post::insert(
        &conn,
        NewPost {
            title: form.title.clone(),
            content: SafeString::new(&form.content),
            pub_date: pub_date.unwrap_or_else(|| Utc::now().naive_utc()),
            is_published: form.is_published.unwrap_or(false),
            creation_date: None,
            image: form.image.clone().filter(|i| !i.is_empty()),
            author_id: user.id,
            location_id: form.location_id,
            category_id: form.category_id,
        },
    )?;
    Ok(Ok(Redirect::to(uri!(
        super::user::details: name = user.username,
        page = _
    ))))
}

#[get("/posts/<id>/edit")]
pub fn edit(id: i32, user: User, conn: DbConn) -> Result<Template, ErrorPage> {
    let post = Post::get(&conn, id)?;
    if !can_modify(&user, Target::Post(&post)) {
        return Err(Error::NotFound.into());
    }
    let form = NewPostForm::from_post(&post);
    render_editor(&conn, user, Some(&post), &form, &ValidationErrors::new())
}

#[get("/posts/<id>/edit", rank = 2)]
pub fn edit_auth(id: i32) -> Flash<Redirect> {
    utils::requires_login("You need to be logged in to edit your post", uri!(edit: id = id))
}

#[post("/posts/<id>/edit", rank = 2)]
pub fn update_auth(id: i32) -> Flash<Redirect> {
    utils::requires_login("You need to be logged in to edit your post", uri!(edit: id = id))
}

#[post("/posts/<id>/edit", data = "<form>")]
pub fn update(
    id: i32,
    conn: DbConn,
    form: LenientForm<NewPostForm>,
    user: User,
) -> Result<Result<Redirect, Template>, ErrorPage> {
    let mut post = Post::get(&conn, id)?;
    if !can_modify(&user, Target::Post(&post)) {
        return Err(Error::NotFound.into());
    }

    let mut errors = match form.validate() {
        Ok(_) => ValidationErrors::new(),
        Err(e) => e,
    };
    let pub_date = parse_pub_date(&form.pub_date);
    if pub_date.is_none() {
        errors.add("pub_date", invalid_date());
    }
    if !errors.is_empty() {
        return Ok(Err(render_editor(&conn, user, Some(&post), &form, &errors)?));
    }

    post.title = form.title.clone();
    post.content = SafeString::new(&form.content);
    post.pub_date = pub_date.unwrap_or(post.pub_date);
    post.is_published = form.is_published.unwrap_or(false);
    post.image = form.image.clone().filter(|i| !i.is_empty());
    post.category_id = form.category_id;
    post.location_id = form.location_id;
    let post = post.update(&conn)?;
    Ok(Ok(Redirect::to(uri!(details: id = post.id))))
}

#[post("/posts/<id>/delete", rank = 2)]
pub fn delete_auth(id: i32) -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in to delete your post",
        uri!(details: id = id),
    )
}

#[post("/posts/<id>/delete")]
pub fn delete(id: i32, conn: DbConn, user: User) -> Result<Redirect, ErrorPage> {
    let post = Post::get(&conn, id)?;
    if !can_modify(&user, Target::Post(&post)) {
        return Err(Error::NotFound.into());
    }
    post.delete(&conn)?;
    tracing::info!("{} deleted post {}", user.username, post.id);
    Ok(Redirect::to(uri!(index: page = _)))
}
