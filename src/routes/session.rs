use blogicum_models::{
    db_conn::DbConn,
    users::{User, AUTH_COOKIE},
};
use rocket::{
    http::{Cookie, Cookies},
    request::{FlashMessage, LenientForm},
    response::Redirect,
};
use rocket_contrib::templates::Template;
use serde::Serialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

#[get("/auth/login?<m>")]
pub fn new(user: Option<User>, m: Option<String>) -> Template {
    Template::render(
        "session/login",
        json!({
            "account": user,
            "message": m,
            "form": CredentialsForm::default(),
            "errors": ValidationErrors::new(),
        }),
    )
}

#[derive(Default, FromForm, Serialize, Validate)]
pub struct CredentialsForm {
    #[validate(length(min = 1, message = "Please enter your username or email"))]
    pub email_or_name: String,
    #[validate(length(min = 1, message = "Please enter your password"))]
    pub password: String,
}

#[post("/auth/login", data = "<form>")]
pub fn create(
    conn: DbConn,
    form: LenientForm<CredentialsForm>,
    flash: Option<FlashMessage<'_, '_>>,
    mut cookies: Cookies<'_>,
) -> Result<Redirect, Template> {
    let mut errors = match form.validate() {
        Ok(_) => ValidationErrors::new(),
        Err(e) => e,
    };

    if errors.is_empty() {
        if let Ok(user) = User::login(&conn, &form.email_or_name, &form.password) {
            cookies.add_private(Cookie::new(AUTH_COOKIE, user.id.to_string()));
            let destination = flash
                .filter(|f| f.name() == "callback")
                .map(|f| f.msg().to_owned())
                .unwrap_or_else(|| "/".to_owned());
            return Ok(Redirect::to(destination));
        }
        errors.add(
            "email_or_name",
            ValidationError {
                code: Cow::from("invalid_login"),
                message: Some(Cow::from("Invalid username, or password")),
                params: std::collections::HashMap::new(),
            },
        );
    }

    Err(Template::render(
        "session/login",
        json!({
            "account": null,
            "message": null,
            "form": &*form,
            "errors": errors,
        }),
    ))
}

#[get("/auth/logout")]
pub fn delete(mut cookies: Cookies<'_>) -> Redirect {
    if let Some(cookie) = cookies.get_private(AUTH_COOKIE) {
        cookies.remove_private(cookie);
    }
    Redirect::to("/")
}
