use crate::{comments::Comment, posts::Post, users::User};

/// Anything a user can own and therefore edit or delete.
pub enum Target<'a> {
    Post(&'a Post),
    Comment(&'a Comment),
}

impl<'a> Target<'a> {
    pub fn owner(&self) -> i32 {
        match self {
            Target::Post(post) => post.author_id,
            Target::Comment(comment) => comment.author_id,
        }
    }
}

/// The whole authorization policy: authors may touch what they wrote,
/// nobody else may touch anything.
pub fn can_modify(user: &User, target: Target<'_>) -> bool {
    user.id == target.owner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safe_string::SafeString;
    use chrono::Utc;

    fn user(id: i32) -> User {
        User {
            id,
            username: format!("user{}", id),
            email: format!("user{}@example.com", id),
            first_name: String::new(),
            last_name: String::new(),
            hashed_password: None,
            creation_date: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn only_the_author_can_modify() {
        let author = user(1);
        let stranger = user(2);
        let post = Post {
            id: 1,
            title: "Mine".to_owned(),
            content: SafeString::new("Body"),
            pub_date: Utc::now().naive_utc(),
            is_published: true,
            creation_date: Utc::now().naive_utc(),
            image: None,
            author_id: author.id,
            location_id: None,
            category_id: None,
        };
        let comment = Comment {
            id: 1,
            content: SafeString::new("Hi"),
            creation_date: Utc::now().naive_utc(),
            post_id: post.id,
            author_id: stranger.id,
        };

        assert!(can_modify(&author, Target::Post(&post)));
        assert!(!can_modify(&stranger, Target::Post(&post)));
        assert!(can_modify(&stranger, Target::Comment(&comment)));
        assert!(!can_modify(&author, Target::Comment(&comment)));
    }
}
