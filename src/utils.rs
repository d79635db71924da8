use rocket::{
    http::uri::Uri,
    response::{Flash, Redirect},
};

/// Sends a guest to the login page, remembering where they wanted to go.
pub fn requires_login<T: Into<Uri<'static>>>(message: &str, url: T) -> Flash<Redirect> {
    Flash::new(
        Redirect::to(format!("/auth/login?m={}", Uri::percent_encode(message))),
        "callback",
        url.into().to_string(),
    )
}
