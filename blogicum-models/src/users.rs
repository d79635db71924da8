use crate::{db_conn::DbConn, schema::users, Connection, Error, Result};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};
use rocket::{
    outcome::IntoOutcome,
    request::{self, FromRequest, Request},
};

pub const AUTH_COOKIE: &str = "user_id";

#[derive(Queryable, Identifiable, Serialize, Clone, Debug)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub hashed_password: Option<String>,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "users"]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub hashed_password: Option<String>,
}

impl User {
    insert!(users, NewUser);
    get!(users);
    find_by!(users, find_by_name, username as &str);
    find_by!(users, find_by_email, email as &str);

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self).execute(conn)?;
        Ok(())
    }

    pub fn update(
        &self,
        conn: &Connection,
        username: String,
        email: String,
        first_name: String,
        last_name: String,
    ) -> Result<User> {
        diesel::update(self)
            .set((
                users::username.eq(username),
                users::email.eq(email),
                users::first_name.eq(first_name),
                users::last_name.eq(last_name),
            ))
            .execute(conn)?;
        User::get(conn, self.id)
    }

    pub fn hash_pass(pass: &str) -> Result<String> {
        bcrypt::hash(pass, 10).map_err(|_| Error::InvalidValue)
    }

    pub fn login(conn: &Connection, ident: &str, password: &str) -> Result<User> {
        let user = match User::find_by_email(conn, ident) {
            Ok(user) => Ok(user),
            _ => User::find_by_name(conn, ident),
        };

        match user {
            Ok(user) => {
                let hash = user.hashed_password.clone().ok_or(Error::NotFound)?;
                if bcrypt::verify(password, &hash).unwrap_or(false) {
                    Ok(user)
                } else {
                    tracing::warn!("rejected login for {}", ident);
                    Err(Error::NotFound)
                }
            }
            Err(e) => {
                // If no user was found, hash the password anyway, so that a
                // miss costs about as much as a hit.
                let _ = User::hash_pass(password);
                Err(e)
            }
        }
    }

    pub fn auth(&self, password: &str) -> bool {
        self.hashed_password
            .as_ref()
            .map(|hash| bcrypt::verify(password, hash).unwrap_or(false))
            .unwrap_or(false)
    }

    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        if name.trim().is_empty() {
            self.username.clone()
        } else {
            name.trim().to_owned()
        }
    }
}

impl NewUser {
    pub fn new_local(
        conn: &Connection,
        username: String,
        email: String,
        first_name: String,
        last_name: String,
        password: &str,
    ) -> Result<User> {
        User::insert(
            conn,
            NewUser {
                username,
                email,
                first_name,
                last_name,
                hashed_password: Some(User::hash_pass(password)?),
            },
        )
    }
}

impl<'a, 'r> FromRequest<'a, 'r> for User {
    type Error = ();

    fn from_request(request: &'a Request<'r>) -> request::Outcome<User, ()> {
        let conn = request.guard::<DbConn>()?;
        request
            .cookies()
            .get_private(AUTH_COOKIE)
            .and_then(|cookie| cookie.value().parse().ok())
            .and_then(|id| User::get(&*conn, id).ok())
            .or_forward(())
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{tests::db, Connection as Conn};
    use diesel::Connection;

    pub(crate) fn fill_database(conn: &Conn) -> Vec<User> {
        let alice = NewUser::new_local(
            conn,
            "alice".to_owned(),
            "alice@example.com".to_owned(),
            "Alice".to_owned(),
            "Martin".to_owned(),
            "invalid_alice_password",
        )
        .unwrap();
        let bob = NewUser::new_local(
            conn,
            "bob".to_owned(),
            "bob@example.com".to_owned(),
            "".to_owned(),
            "".to_owned(),
            "invalid_bob_password",
        )
        .unwrap();

        vec![alice, bob]
    }

    #[test]
    fn find_by() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);

            assert_eq!(users[0], User::find_by_name(&conn, "alice").unwrap());
            assert_eq!(users[1], User::find_by_email(&conn, "bob@example.com").unwrap());
            assert!(User::find_by_name(&conn, "nobody").is_err());
            Ok(())
        });
    }

    #[test]
    fn login() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            fill_database(&conn);

            assert!(User::login(&conn, "alice", "invalid_alice_password").is_ok());
            assert!(User::login(&conn, "alice@example.com", "invalid_alice_password").is_ok());
            assert!(User::login(&conn, "alice", "wrong").is_err());
            assert!(User::login(&conn, "nobody", "invalid_alice_password").is_err());
            Ok(())
        });
    }

    #[test]
    fn update() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let updated = users[0]
                .update(
                    &conn,
                    "alice".to_owned(),
                    "new@example.com".to_owned(),
                    "Alice".to_owned(),
                    "Moreau".to_owned(),
                )
                .unwrap();

            assert_eq!("new@example.com", updated.email);
            assert_eq!("Alice Moreau", updated.full_name());
            Ok(())
        });
    }
}
