use crate::{
    routes::{errors::ErrorPage, posts::render_details},
    utils,
};
use blogicum_models::{
    comments::{Comment, NewComment},
    db_conn::DbConn,
    ownership::{can_modify, Target},
    posts::Post,
    safe_string::SafeString,
    users::User,
    Error,
};
use rocket::{
    request::LenientForm,
    response::{Flash, Redirect},
};
use rocket_contrib::templates::Template;
use serde::Serialize;
use validator::{Validate, ValidationErrors};

#[derive(Default, FromForm, Serialize, Validate)]
pub struct CommentForm {
    #[validate(length(min = 1, message = "Your comment can't be empty"))]
    pub content: String,
}

#[post("/posts/<id>/comment", rank = 2)]
pub fn create_auth(id: i32) -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in to leave a comment",
        uri!(super::posts::details: id = id),
    )
}

#[post("/posts/<id>/comment", data = "<form>")]
pub fn create(
    id: i32,
    conn: DbConn,
    form: LenientForm<CommentForm>,
    user: User,
) -> Result<Result<Redirect, Template>, ErrorPage> {
    let post = Post::get(&conn, id)?;
    let is_author = can_modify(&user, Target::Post(&post));
    if !is_author && !post.is_visible(&conn)? {
        return Err(Error::NotFound.into());
    }

    match form.validate() {
        Ok(_) => {
            Comment::insert(
                &conn,
                NewComment {
                    content: SafeString::new(&form.content),
                    creation_date: None,
                    post_id: post.id,
                    author_id: user.id,
                },
            )?;
            Ok(Ok(Redirect::to(uri!(super::posts::details: id = id))))
        }
        Err(errors) => Ok(Err(render_details(
            &conn,
            Some(user),
            post,
            Some(&form),
            &errors,
        )?)),
    }
}

#[get("/posts/<id>/comment/<comment_id>/edit")]
pub fn edit(id: i32, comment_id: i32, user: User, conn: DbConn) -> Result<Template, ErrorPage> {
    let comment = Comment::find_for_post(&conn, id, comment_id)?;
    if !can_modify(&user, Target::Comment(&comment)) {
        return Err(Error::NotFound.into());
    }
    Ok(render_edit(&user, &comment, &CommentForm {
        content: comment.content.get().clone(),
    }, &ValidationErrors::new()))
}

#[get("/posts/<id>/comment/<comment_id>/edit", rank = 2)]
pub fn edit_auth(id: i32, comment_id: i32) -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in to edit your comment",
        uri!(edit: id = id, comment_id = comment_id),
    )
}

fn render_edit(
    account: &User,
    comment: &Comment,
    form: &CommentForm,
    errors: &ValidationErrors,
) -> Template {
    Template::render(
        "comments/edit",
        json!({
            "account": account,
            "comment": comment,
            "form": form,
            "errors": errors,
        }),
    )
}

#[post("/posts/<id>/comment/<comment_id>/edit", rank = 2)]
pub fn update_auth(id: i32, comment_id: i32) -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in to edit your comment",
        uri!(edit: id = id, comment_id = comment_id),
    )
}

#[post("/posts/<id>/comment/<comment_id>/edit", data = "<form>")]
pub fn update(
    id: i32,
    comment_id: i32,
    conn: DbConn,
    form: LenientForm<CommentForm>,
    user: User,
) -> Result<Result<Redirect, Template>, ErrorPage> {
    let mut comment = Comment::find_for_post(&conn, id, comment_id)?;
    if !can_modify(&user, Target::Comment(&comment)) {
        return Err(Error::NotFound.into());
    }

    match form.validate() {
        Ok(_) => {
            comment.content = SafeString::new(&form.content);
            comment.update(&conn)?;
            Ok(Ok(Redirect::to(uri!(super::posts::details: id = id))))
        }
        Err(errors) => Ok(Err(render_edit(&user, &comment, &form, &errors))),
    }
}

#[post("/posts/<id>/comment/<_comment_id>/delete", rank = 2)]
pub fn delete_auth(id: i32, _comment_id: i32) -> Flash<Redirect> {
    utils::requires_login(
        "You need to be logged in to delete your comment",
        uri!(super::posts::details: id = id),
    )
}

#[post("/posts/<id>/comment/<comment_id>/delete")]
pub fn delete(
    id: i32,
    comment_id: i32,
    conn: DbConn,
    user: User,
) -> Result<Redirect, ErrorPage> {
    let comment = Comment::find_for_post(&conn, id, comment_id)?;
    if !can_modify(&user, Target::Comment(&comment)) {
        return Err(Error::NotFound.into());
    }
    comment.delete(&conn)?;
    Ok(Redirect::to(uri!(super::posts::details: id = id)))
}
