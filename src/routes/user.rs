use crate::{
    routes::{errors::ErrorPage, Page},
    utils,
};
use blogicum_models::{
    db_conn::DbConn,
    posts::{AnnotatedPost, Post},
    users::{NewUser, User},
    Error,
};
use rocket::{
    request::LenientForm,
    response::{Flash, Redirect},
};
use rocket_contrib::templates::Template;
use serde::Serialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

#[get("/profile/<name>?<page>")]
pub fn details(
    name: String,
    page: Option<Page>,
    conn: DbConn,
    account: Option<User>,
) -> Result<Template, ErrorPage> {
    let user = User::find_by_name(&conn, &name)?;
    let is_self = account.as_ref().map(|a| a.id == user.id).unwrap_or(false);
    let page = page.unwrap_or_default();
    // the owner also sees their drafts and scheduled posts
    let (posts, n_posts) = if is_self {
        (
            Post::all_by_author(&conn, &user, page.limits())?,
            Post::count_by_author(&conn, &user)?,
        )
    } else {
        (
            Post::visible_by_author(&conn, &user, page.limits())?,
            Post::count_visible_by_author(&conn, &user)?,
        )
    };
    Ok(Template::render(
        "users/details",
        json!({
            "account": account,
            "user": user,
            "is_self": is_self,
            "posts": AnnotatedPost::from_posts(&conn, posts)?,
            "page": *page,
            "n_pages": Page::total(n_posts as i32),
        }),
    ))
}

#[get("/profile/<name>/edit")]
pub fn edit(name: String, user: User) -> Result<Template, ErrorPage> {
    if user.username != name {
        // someone else's settings page does not exist for you
        return Err(Error::Unauthorized.into());
    }
    Ok(render_edit(&user, &UpdateProfileForm::from_user(&user), &ValidationErrors::new()))
}

#[get("/profile/<name>/edit", rank = 2)]
pub fn edit_auth(name: String) -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in to edit your profile",
        uri!(edit: name = name),
    )
}

#[derive(Default, FromForm, Serialize, Validate)]
pub struct UpdateProfileForm {
    #[validate(length(min = 1, message = "Username can't be empty"))]
    pub username: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl UpdateProfileForm {
    fn from_user(user: &User) -> UpdateProfileForm {
        UpdateProfileForm {
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

fn render_edit(account: &User, form: &UpdateProfileForm, errors: &ValidationErrors) -> Template {
    Template::render(
        "users/edit",
        json!({
            "account": account,
            "form": form,
            "errors": errors,
        }),
    )
}

#[post("/profile/<name>/edit", rank = 2)]
pub fn update_auth(name: String) -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in to edit your profile",
        uri!(edit: name = name),
    )
}

#[post("/profile/<name>/edit", data = "<form>")]
pub fn update(
    name: String,
    conn: DbConn,
    user: User,
    form: LenientForm<UpdateProfileForm>,
) -> Result<Result<Redirect, Template>, ErrorPage> {
    if user.username != name {
        return Err(Error::Unauthorized.into());
    }

    let mut errors = match form.validate() {
        Ok(_) => ValidationErrors::new(),
        Err(e) => e,
    };
    if form.username != user.username && User::find_by_name(&conn, &form.username).is_ok() {
        errors.add("username", taken_username());
    }
    if !errors.is_empty() {
        return Ok(Err(render_edit(&user, &form, &errors)));
    }

    let updated = user.update(
        &conn,
        form.username.clone(),
        form.email.clone(),
        form.first_name.clone(),
        form.last_name.clone(),
    )?;
    Ok(Ok(Redirect::to(uri!(
        details: name = updated.username,
        page = _
    ))))
}

#[get("/auth/registration")]
pub fn new(user: Option<User>) -> Template {
    Template::render(
        "users/new",
        json!({
            "account": user,
            "form": NewUserForm::default(),
            "errors": ValidationErrors::new(),
        }),
    )
}

#[derive(Default, FromForm, Serialize, Validate)]
#[validate(schema(
    function = "passwords_match",
    skip_on_field_errors = false,
    message = "Passwords are not matching"
))]
pub struct NewUserForm {
    #[validate(
        length(min = 1, message = "Username can't be empty"),
        custom(
            function = "validate_username",
            message = "Username can't contain spaces or special characters"
        )
    )]
    pub username: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[validate(length(min = 8, message = "Password should be at least 8 characters long"))]
    pub password: String,
    pub password_confirmation: String,
}

pub fn passwords_match(form: &NewUserForm) -> Result<(), ValidationError> {
    if form.password != form.password_confirmation {
        Err(ValidationError::new("password_match"))
    } else {
        Ok(())
    }
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .any(|c| !(c.is_alphanumeric() || c == '.' || c == '_' || c == '-'))
    {
        Err(ValidationError::new("username_illegal_char"))
    } else {
        Ok(())
    }
}

fn taken_username() -> ValidationError {
    ValidationError {
        code: Cow::from("username_taken"),
        message: Some(Cow::from("This username is already taken")),
        params: std::collections::HashMap::new(),
    }
}

#[post("/auth/registration", data = "<form>")]
pub fn create(
    conn: DbConn,
    form: LenientForm<NewUserForm>,
) -> Result<Result<Redirect, Template>, ErrorPage> {
    let mut errors = match form.validate() {
        Ok(_) => ValidationErrors::new(),
        Err(e) => e,
    };
    if User::find_by_name(&conn, &form.username).is_ok() {
        errors.add("username", taken_username());
    }
    if !errors.is_empty() {
        return Ok(Err(Template::render(
            "users/new",
            json!({
                "account": null,
                "form": &*form,
                "errors": errors,
            }),
        )));
    }

    let user = NewUser::new_local(
        &conn,
        form.username.clone(),
        form.email.clone(),
        form.first_name.clone(),
        form.last_name.clone(),
        &form.password,
    )?;
    tracing::info!("new account: {}", user.username);
    Ok(Ok(Redirect::to(uri!(super::posts::index: page = _))))
}
