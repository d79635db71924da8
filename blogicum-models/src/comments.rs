use crate::{
    safe_string::SafeString,
    schema::{comments, users},
    users::User,
    Connection, Error, Result,
};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

#[derive(Queryable, Identifiable, Serialize, Clone, AsChangeset, PartialEq, Debug)]
pub struct Comment {
    pub id: i32,
    pub content: SafeString,
    pub creation_date: NaiveDateTime,
    pub post_id: i32,
    pub author_id: i32,
}

#[derive(Insertable)]
#[table_name = "comments"]
pub struct NewComment {
    pub content: SafeString,
    pub creation_date: Option<NaiveDateTime>,
    pub post_id: i32,
    pub author_id: i32,
}

/// A comment with its author, as the detail page shows it.
#[derive(Serialize, Debug)]
pub struct AnnotatedComment {
    pub comment: Comment,
    pub author: User,
}

impl Comment {
    insert!(comments, NewComment);
    get!(comments);
    update!(comments);

    /// Looks a comment up under a given post. A comment reached through
    /// the wrong post URL does not exist.
    pub fn find_for_post(conn: &Connection, post_id: i32, id: i32) -> Result<Comment> {
        let comment = Comment::get(conn, id)?;
        if comment.post_id == post_id {
            Ok(comment)
        } else {
            Err(Error::NotFound)
        }
    }

    pub fn for_post(conn: &Connection, post_id: i32) -> Result<Vec<Comment>> {
        comments::table
            .filter(comments::post_id.eq(post_id))
            .order(comments::creation_date.asc())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn for_post_with_authors(conn: &Connection, post_id: i32) -> Result<Vec<AnnotatedComment>> {
        comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(post_id))
            .order(comments::creation_date.asc())
            .load::<(Comment, User)>(conn)
            .map_err(Error::from)
            .map(|list| {
                list.into_iter()
                    .map(|(comment, author)| AnnotatedComment { comment, author })
                    .collect()
            })
    }

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.author_id)
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        posts::{tests::new_post, Post},
        tests::db,
        users::tests as user_tests,
        Connection as Conn,
    };
    use chrono::{Duration, Utc};
    use diesel::Connection;

    fn fill_database(conn: &Conn) -> (Post, Vec<User>) {
        let users = user_tests::fill_database(conn);
        let post = Post::insert(conn, new_post(users[0].id, "Commented")).unwrap();
        (post, users)
    }

    #[test]
    fn ordered_oldest_first() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (post, users) = fill_database(&conn);
            for (i, text) in ["First", "Second", "Third"].iter().enumerate() {
                Comment::insert(
                    &conn,
                    NewComment {
                        content: SafeString::new(text),
                        creation_date: Some(
                            Utc::now().naive_utc() - Duration::hours(5 - i as i64),
                        ),
                        post_id: post.id,
                        author_id: users[1].id,
                    },
                )
                .unwrap();
            }

            let contents = Comment::for_post(&conn, post.id)
                .unwrap()
                .into_iter()
                .map(|c| c.content.get().clone())
                .collect::<Vec<_>>();
            assert_eq!(vec!["First", "Second", "Third"], contents);

            let annotated = Comment::for_post_with_authors(&conn, post.id).unwrap();
            assert_eq!(3, annotated.len());
            assert_eq!("bob", annotated[0].author.username);
            Ok(())
        });
    }

    #[test]
    fn find_for_post_checks_the_pair() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (post, users) = fill_database(&conn);
            let other = Post::insert(&conn, new_post(users[0].id, "Other")).unwrap();
            let comment = Comment::insert(
                &conn,
                NewComment {
                    content: SafeString::new("Hi"),
                    creation_date: None,
                    post_id: post.id,
                    author_id: users[1].id,
                },
            )
            .unwrap();

            assert_eq!(
                comment,
                Comment::find_for_post(&conn, post.id, comment.id).unwrap()
            );
            assert!(matches!(
                Comment::find_for_post(&conn, other.id, comment.id),
                Err(Error::NotFound)
            ));
            Ok(())
        });
    }
}
