use crate::{
    categories::Category,
    locations::Location,
    safe_string::SafeString,
    schema::{categories, comments, locations, posts, users},
    users::User,
    Connection, Error, Result,
};
use chrono::{NaiveDateTime, Utc};
use diesel::{
    self, BoolExpressionMethods, ExpressionMethods, NullableExpressionMethods, QueryDsl,
    RunQueryDsl,
};
use std::collections::HashMap;

/// The feed-visibility predicate: published, publication instant reached,
/// and the category (if any) published too. Nothing else ever decides
/// whether a non-author may read a post.
macro_rules! visible {
    () => {
        posts::table
            .filter(posts::is_published.eq(true))
            .filter(posts::pub_date.le(Utc::now().naive_utc()))
            .filter(
                posts::category_id.is_null().or(posts::category_id.eq_any(
                    categories::table
                        .filter(categories::is_published.eq(true))
                        .select(categories::id.nullable()),
                )),
            )
    };
}

#[derive(Queryable, Identifiable, Serialize, Clone, AsChangeset, PartialEq, Debug)]
#[changeset_options(treat_none_as_null = "true")]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: SafeString,
    pub pub_date: NaiveDateTime,
    pub is_published: bool,
    pub creation_date: NaiveDateTime,
    pub image: Option<String>,
    pub author_id: i32,
    pub location_id: Option<i32>,
    pub category_id: Option<i32>,
}

#[derive(Insertable)]
#[table_name = "posts"]
pub struct NewPost {
    pub title: String,
    pub content: SafeString,
    pub pub_date: NaiveDateTime,
    pub is_published: bool,
    pub creation_date: Option<NaiveDateTime>,
    pub image: Option<String>,
    pub author_id: i32,
    pub location_id: Option<i32>,
    pub category_id: Option<i32>,
}

impl Post {
    insert!(posts, NewPost);
    get!(posts);
    update!(posts);

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }

    /// Single-row version of the `visible!` filter, for the detail view.
    pub fn is_visible(&self, conn: &Connection) -> Result<bool> {
        if !self.is_published || self.pub_date > Utc::now().naive_utc() {
            return Ok(false);
        }
        match self.category_id {
            Some(id) => Ok(Category::get(conn, id)?.is_published),
            None => Ok(true),
        }
    }

    pub fn count_visible(conn: &Connection) -> Result<i64> {
        visible!().count().get_result(conn).map_err(Error::from)
    }

    pub fn visible_page(conn: &Connection, (min, max): (i32, i32)) -> Result<Vec<Post>> {
        visible!()
            .order(posts::pub_date.desc())
            .offset(min.into())
            .limit((max - min).into())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn count_for_category(conn: &Connection, category: &Category) -> Result<i64> {
        visible!()
            .filter(posts::category_id.eq(category.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn category_page(
        conn: &Connection,
        category: &Category,
        (min, max): (i32, i32),
    ) -> Result<Vec<Post>> {
        visible!()
            .filter(posts::category_id.eq(category.id))
            .order(posts::pub_date.desc())
            .offset(min.into())
            .limit((max - min).into())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn count_visible_by_author(conn: &Connection, author: &User) -> Result<i64> {
        visible!()
            .filter(posts::author_id.eq(author.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    /// What anyone but the profile owner sees on a profile page.
    pub fn visible_by_author(
        conn: &Connection,
        author: &User,
        (min, max): (i32, i32),
    ) -> Result<Vec<Post>> {
        visible!()
            .filter(posts::author_id.eq(author.id))
            .order(posts::pub_date.desc())
            .offset(min.into())
            .limit((max - min).into())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn count_by_author(conn: &Connection, author: &User) -> Result<i64> {
        posts::table
            .filter(posts::author_id.eq(author.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    /// What the profile owner sees: drafts and scheduled posts included.
    pub fn all_by_author(
        conn: &Connection,
        author: &User,
        (min, max): (i32, i32),
    ) -> Result<Vec<Post>> {
        posts::table
            .filter(posts::author_id.eq(author.id))
            .order(posts::pub_date.desc())
            .offset(min.into())
            .limit((max - min).into())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.author_id)
    }

    pub fn get_category(&self, conn: &Connection) -> Result<Option<Category>> {
        self.category_id.map(|id| Category::get(conn, id)).transpose()
    }

    pub fn get_location(&self, conn: &Connection) -> Result<Option<Location>> {
        self.location_id.map(|id| Location::get(conn, id)).transpose()
    }

    pub fn count_comments(&self, conn: &Connection) -> Result<i64> {
        comments::table
            .filter(comments::post_id.eq(self.id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }
}

/// A post bundled with everything the list templates show about it.
/// `comment_count` is computed, never stored.
#[derive(Serialize, Debug)]
pub struct AnnotatedPost {
    pub post: Post,
    pub author: User,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: i64,
}

impl AnnotatedPost {
    /// Annotates a page of posts with a bounded number of queries,
    /// whatever the page size.
    pub fn from_posts(conn: &Connection, posts: Vec<Post>) -> Result<Vec<AnnotatedPost>> {
        let post_ids = posts.iter().map(|p| p.id).collect::<Vec<_>>();

        let mut comment_counts: HashMap<i32, i64> = HashMap::new();
        for post_id in comments::table
            .filter(comments::post_id.eq_any(post_ids))
            .select(comments::post_id)
            .load::<i32>(conn)?
        {
            *comment_counts.entry(post_id).or_insert(0) += 1;
        }

        let authors = users::table
            .filter(users::id.eq_any(posts.iter().map(|p| p.author_id).collect::<Vec<_>>()))
            .load::<User>(conn)?
            .into_iter()
            .map(|u| (u.id, u))
            .collect::<HashMap<_, _>>();
        let cats = categories::table
            .filter(
                categories::id
                    .eq_any(posts.iter().filter_map(|p| p.category_id).collect::<Vec<_>>()),
            )
            .load::<Category>(conn)?
            .into_iter()
            .map(|c| (c.id, c))
            .collect::<HashMap<_, _>>();
        let locs = locations::table
            .filter(
                locations::id
                    .eq_any(posts.iter().filter_map(|p| p.location_id).collect::<Vec<_>>()),
            )
            .load::<Location>(conn)?
            .into_iter()
            .map(|l| (l.id, l))
            .collect::<HashMap<_, _>>();

        posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned().ok_or(Error::NotFound)?;
                let category = post.category_id.and_then(|id| cats.get(&id).cloned());
                let location = post.location_id.and_then(|id| locs.get(&id).cloned());
                let comment_count = comment_counts.get(&post.id).copied().unwrap_or(0);
                Ok(AnnotatedPost {
                    post,
                    author,
                    category,
                    location,
                    comment_count,
                })
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        categories::tests as category_tests,
        comments::{Comment, NewComment},
        tests::db,
        users::tests as user_tests,
        Connection as Conn, ITEMS_PER_PAGE,
    };
    use chrono::Duration;
    use diesel::Connection;

    pub(crate) fn new_post(author_id: i32, title: &str) -> NewPost {
        NewPost {
            title: title.to_owned(),
            content: SafeString::new("Hello"),
            pub_date: Utc::now().naive_utc() - Duration::hours(1),
            is_published: true,
            creation_date: None,
            image: None,
            author_id,
            location_id: None,
            category_id: None,
        }
    }

    /// alice gets one post of every visibility kind; bob gets none.
    fn fill_database(conn: &Conn) -> (Vec<Post>, Vec<User>, Vec<Category>) {
        let users = user_tests::fill_database(conn);
        let categories = category_tests::fill_database(conn);
        let alice = &users[0];

        let visible = Post::insert(conn, new_post(alice.id, "Visible")).unwrap();
        let in_category = Post::insert(
            conn,
            NewPost {
                category_id: Some(categories[0].id),
                ..new_post(alice.id, "In a category")
            },
        )
        .unwrap();
        let draft = Post::insert(
            conn,
            NewPost {
                is_published: false,
                ..new_post(alice.id, "Draft")
            },
        )
        .unwrap();
        let scheduled = Post::insert(
            conn,
            NewPost {
                pub_date: Utc::now().naive_utc() + Duration::days(3),
                ..new_post(alice.id, "Scheduled")
            },
        )
        .unwrap();
        let hidden_category = Post::insert(
            conn,
            NewPost {
                category_id: Some(categories[1].id),
                ..new_post(alice.id, "In a hidden category")
            },
        )
        .unwrap();

        (
            vec![visible, in_category, draft, scheduled, hidden_category],
            users,
            categories,
        )
    }

    #[test]
    fn visibility() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (posts, _, _) = fill_database(&conn);

            assert_eq!(2, Post::count_visible(&conn).unwrap());
            let titles = Post::visible_page(&conn, (0, ITEMS_PER_PAGE))
                .unwrap()
                .into_iter()
                .map(|p| p.title)
                .collect::<Vec<_>>();
            assert!(titles.contains(&"Visible".to_owned()));
            assert!(titles.contains(&"In a category".to_owned()));

            assert!(posts[0].is_visible(&conn).unwrap());
            assert!(posts[1].is_visible(&conn).unwrap());
            assert!(!posts[2].is_visible(&conn).unwrap());
            assert!(!posts[3].is_visible(&conn).unwrap());
            assert!(!posts[4].is_visible(&conn).unwrap());
            Ok(())
        });
    }

    #[test]
    fn ordering_is_newest_first() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = user_tests::fill_database(&conn);
            for (i, title) in ["Oldest", "Middle", "Newest"].iter().enumerate() {
                Post::insert(
                    &conn,
                    NewPost {
                        pub_date: Utc::now().naive_utc() - Duration::days(7 - i as i64),
                        ..new_post(users[0].id, title)
                    },
                )
                .unwrap();
            }

            let titles = Post::visible_page(&conn, (0, ITEMS_PER_PAGE))
                .unwrap()
                .into_iter()
                .map(|p| p.title)
                .collect::<Vec<_>>();
            assert_eq!(vec!["Newest", "Middle", "Oldest"], titles);
            Ok(())
        });
    }

    #[test]
    fn pagination() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = user_tests::fill_database(&conn);
            for i in 0..(ITEMS_PER_PAGE + 3) {
                Post::insert(&conn, new_post(users[0].id, &format!("Post {}", i))).unwrap();
            }

            assert_eq!(
                ITEMS_PER_PAGE as usize,
                Post::visible_page(&conn, (0, ITEMS_PER_PAGE)).unwrap().len()
            );
            assert_eq!(
                3,
                Post::visible_page(&conn, (ITEMS_PER_PAGE, 2 * ITEMS_PER_PAGE))
                    .unwrap()
                    .len()
            );
            // out of range pages are empty, not an error
            assert!(Post::visible_page(&conn, (10 * ITEMS_PER_PAGE, 11 * ITEMS_PER_PAGE))
                .unwrap()
                .is_empty());
            Ok(())
        });
    }

    #[test]
    fn category_page_only_shows_that_category() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (_, _, categories) = fill_database(&conn);

            let posts = Post::category_page(&conn, &categories[0], (0, ITEMS_PER_PAGE)).unwrap();
            assert_eq!(1, posts.len());
            assert_eq!("In a category", posts[0].title);
            assert_eq!(1, Post::count_for_category(&conn, &categories[0]).unwrap());
            Ok(())
        });
    }

    #[test]
    fn profile_pages() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (_, users, _) = fill_database(&conn);
            let alice = &users[0];
            let bob = &users[1];

            // the owner sees drafts and scheduled posts, others don't
            assert_eq!(5, Post::count_by_author(&conn, alice).unwrap());
            assert_eq!(2, Post::count_visible_by_author(&conn, alice).unwrap());
            assert_eq!(
                5,
                Post::all_by_author(&conn, alice, (0, ITEMS_PER_PAGE)).unwrap().len()
            );
            assert_eq!(
                2,
                Post::visible_by_author(&conn, alice, (0, ITEMS_PER_PAGE))
                    .unwrap()
                    .len()
            );
            assert_eq!(0, Post::count_by_author(&conn, bob).unwrap());
            Ok(())
        });
    }

    #[test]
    fn annotation() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (posts, users, categories) = fill_database(&conn);
            for _ in 0..3 {
                Comment::insert(
                    &conn,
                    NewComment {
                        content: SafeString::new("Nice one"),
                        creation_date: None,
                        post_id: posts[1].id,
                        author_id: users[1].id,
                    },
                )
                .unwrap();
            }

            let annotated =
                AnnotatedPost::from_posts(&conn, Post::visible_page(&conn, (0, ITEMS_PER_PAGE)).unwrap())
                    .unwrap();
            let with_category = annotated
                .iter()
                .find(|a| a.post.title == "In a category")
                .unwrap();
            assert_eq!(3, with_category.comment_count);
            assert_eq!(Some(categories[0].clone()), with_category.category);
            assert_eq!("alice", with_category.author.username);

            let plain = annotated.iter().find(|a| a.post.title == "Visible").unwrap();
            assert_eq!(0, plain.comment_count);
            assert_eq!(None, plain.category);
            Ok(())
        });
    }

    #[test]
    fn deleting_a_category_detaches_posts() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (posts, _, categories) = fill_database(&conn);

            categories[0].delete(&conn).unwrap();
            let post = Post::get(&conn, posts[1].id).unwrap();
            assert_eq!(None, post.category_id);
            // a post with no category is visible again
            assert!(post.is_visible(&conn).unwrap());
            Ok(())
        });
    }

    #[test]
    fn deleting_a_post_deletes_its_comments() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (posts, users, _) = fill_database(&conn);
            let comment = Comment::insert(
                &conn,
                NewComment {
                    content: SafeString::new("Gone soon"),
                    creation_date: None,
                    post_id: posts[0].id,
                    author_id: users[1].id,
                },
            )
            .unwrap();

            posts[0].delete(&conn).unwrap();
            assert!(matches!(Comment::get(&conn, comment.id), Err(Error::NotFound)));
            Ok(())
        });
    }

    #[test]
    fn deleting_a_user_deletes_their_posts_and_comments() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let (posts, users, _) = fill_database(&conn);
            let comment = Comment::insert(
                &conn,
                NewComment {
                    content: SafeString::new("By alice"),
                    creation_date: None,
                    post_id: posts[0].id,
                    author_id: users[0].id,
                },
            )
            .unwrap();

            users[0].delete(&conn).unwrap();
            assert!(matches!(Post::get(&conn, posts[0].id), Err(Error::NotFound)));
            assert!(matches!(Comment::get(&conn, comment.id), Err(Error::NotFound)));
            Ok(())
        });
    }
}
