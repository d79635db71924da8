use blogicum_models::{users::User, Error};
use rocket::{
    http::Status,
    request::{FromRequest, Request},
    response::{self, Responder},
};
use rocket_contrib::templates::Template;

#[derive(Debug)]
pub struct ErrorPage(Error);

impl From<Error> for ErrorPage {
    fn from(err: Error) -> ErrorPage {
        ErrorPage(err)
    }
}

/// Forwards to the matching catcher. Unauthorized deliberately responds
/// like NotFound, so URLs never reveal whether a hidden resource exists.
impl<'r> Responder<'r> for ErrorPage {
    fn respond_to(self, _req: &Request<'_>) -> response::Result<'r> {
        match self.0 {
            Error::NotFound | Error::Unauthorized => Err(Status::NotFound),
            err => {
                tracing::error!("unexpected error: {:?}", err);
                Err(Status::InternalServerError)
            }
        }
    }
}

#[catch(404)]
pub fn not_found(req: &Request<'_>) -> Template {
    let user = User::from_request(req).succeeded();
    Template::render(
        "errors/404",
        json!({
            "account": user,
        }),
    )
}

#[catch(500)]
pub fn server_error(req: &Request<'_>) -> Template {
    let user = User::from_request(req).succeeded();
    Template::render(
        "errors/500",
        json!({
            "account": user,
        }),
    )
}
