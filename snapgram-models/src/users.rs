use crate::{
    comments::Comment,
    posts::Post,
    schema::{comment, follower, user},
    Connection, Error, Result,
};
use diesel::{
    self, BoolExpressionMethods, Connection as _, ExpressionMethods, QueryDsl, RunQueryDsl,
};
use snapgram_api::users::UserView;
use std::fmt;
use tracing::{debug, warn};

#[derive(Queryable, Identifiable, Clone)]
#[table_name = "user"]
pub struct User {
    pub id: i32,
    pub email: String,
    /// Stored as given, and never serialized.
    pub password: String,
    pub is_active: bool,
}

#[derive(Default, Insertable)]
#[table_name = "user"]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub is_active: bool,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("is_active", &self.is_active)
            .finish()
    }
}

impl User {
    insert!(user, NewUser);
    get!(user);
    find_by!(user, find_by_email, email as &str);

    pub fn list(conn: &Connection) -> Result<Vec<User>> {
        user::table
            .order(user::id.asc())
            .load::<User>(conn)
            .map_err(Error::from)
    }

    pub fn get_posts(&self, conn: &Connection) -> Result<Vec<Post>> {
        Post::list_by_poster(conn, self.id)
    }

    pub fn get_comments(&self, conn: &Connection) -> Result<Vec<Comment>> {
        Comment::list_by_author(conn, self.id)
    }

    /// Users following this one
    pub fn get_followers(&self, conn: &Connection) -> Result<Vec<User>> {
        let followers = follower::table
            .filter(follower::user_to_id.eq(self.id))
            .select(follower::user_from_id);
        user::table
            .filter(user::id.eq_any(followers))
            .order(user::id.asc())
            .load::<User>(conn)
            .map_err(Error::from)
    }

    /// Users this one follows
    pub fn get_followed(&self, conn: &Connection) -> Result<Vec<User>> {
        let followed = follower::table
            .filter(follower::user_from_id.eq(self.id))
            .select(follower::user_to_id);
        user::table
            .filter(user::id.eq_any(followed))
            .order(user::id.asc())
            .load::<User>(conn)
            .map_err(Error::from)
    }

    pub fn is_following(&self, conn: &Connection, other_id: i32) -> Result<bool> {
        follower::table
            .filter(follower::user_from_id.eq(self.id))
            .filter(follower::user_to_id.eq(other_id))
            .count()
            .get_result::<i64>(conn)
            .map_err(Error::from)
            .map(|r| r > 0)
    }

    /// Deletes this user, their posts (with everything attached to them) and
    /// their comments. Follower edges are not removed: as long as one exists,
    /// the database refuses the deletion and nothing is deleted.
    pub fn delete(&self, conn: &Connection) -> Result<()> {
        conn.transaction(|| {
            for post in self.get_posts(conn)? {
                post.delete(conn)?;
            }
            let comments = diesel::delete(comment::table.filter(comment::author_id.eq(self.id)))
                .execute(conn)?;
            debug!("Deleted {} comments of user {}", comments, self.id);

            let edges = follower::table
                .filter(
                    follower::user_from_id
                        .eq(self.id)
                        .or(follower::user_to_id.eq(self.id)),
                )
                .count()
                .get_result::<i64>(conn)?;
            if edges > 0 {
                warn!(
                    "User {} is still part of {} follower edges, deletion will be refused",
                    self.id, edges
                );
            }

            diesel::delete(self)
                .execute(conn)
                .map(|_| ())
                .map_err(Error::from)
        })
    }

    pub fn serialize(&self) -> UserView {
        UserView {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        comments::NewComment,
        followers::{Follower, NewFollower},
        medias::{Media, MediaType, NewMedia},
        posts::NewPost,
        tests::db,
        Connection as Conn,
    };
    use assert_json_diff::assert_json_eq;
    use diesel::Connection;
    use serde_json::{json, to_value};

    pub(crate) fn fill_database(conn: &Conn) -> Vec<User> {
        vec![
            ("admin@example.com", "invalid_admin_password", true),
            ("user@example.com", "invalid_user_password", true),
            ("other@example.com", "invalid_other_password", false),
        ]
        .into_iter()
        .map(|(email, password, is_active)| {
            User::insert(
                conn,
                NewUser {
                    email: email.to_owned(),
                    password: password.to_owned(),
                    is_active,
                },
            )
            .unwrap()
        })
        .collect()
    }

    #[test]
    fn find_by() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            assert_eq!(
                users[1].id,
                User::find_by_email(&conn, "user@example.com").unwrap().id
            );
            let other = User::get(&conn, users[2].id).unwrap();
            assert_eq!(other.email, "other@example.com");
            assert_eq!(other.password, "invalid_other_password");
            assert!(!other.is_active);
            assert_eq!(User::list(&conn).unwrap().len(), 3);
            Ok(())
        });
    }

    #[test]
    fn not_found() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            fill_database(&conn);
            assert!(matches!(
                User::find_by_email(&conn, "nobody@example.com"),
                Err(Error::NotFound)
            ));
            assert!(User::get(&conn, -1).ok().is_none());
            Ok(())
        });
    }

    #[test]
    fn serialize_has_no_password() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            for user in fill_database(&conn) {
                let value = to_value(user.serialize()).unwrap();
                assert!(value.get("password").is_none());
                assert_json_eq!(value, json!({ "id": user.id, "email": user.email }));
                assert!(!format!("{:?}", user).contains(&user.password));
            }
            Ok(())
        });
    }

    #[test]
    fn unique_email() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            fill_database(&conn);
            let res = User::insert(
                &conn,
                NewUser {
                    email: "user@example.com".to_owned(),
                    password: "something else".to_owned(),
                    is_active: true,
                },
            );
            assert!(matches!(res, Err(Error::UniqueViolation(_))));
            assert_eq!(User::list(&conn).unwrap().len(), 3);
            Ok(())
        });
    }

    #[test]
    fn followers() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            for (from, to) in &[(1, 0), (2, 0), (0, 2)] {
                Follower::insert(
                    &conn,
                    NewFollower {
                        user_from_id: users[*from].id,
                        user_to_id: users[*to].id,
                    },
                )
                .unwrap();
            }

            let followers = users[0].get_followers(&conn).unwrap();
            assert_eq!(
                followers.iter().map(|u| u.id).collect::<Vec<_>>(),
                vec![users[1].id, users[2].id]
            );
            let followed = users[0].get_followed(&conn).unwrap();
            assert_eq!(followed.len(), 1);
            assert_eq!(followed[0].id, users[2].id);

            assert!(users[1].is_following(&conn, users[0].id).unwrap());
            assert!(!users[0].is_following(&conn, users[1].id).unwrap());
            Ok(())
        });
    }

    #[test]
    fn delete() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let (author, other) = (&users[0], &users[1]);

            let mut own_posts = vec![];
            for i in 0..2 {
                let post = Post::insert(&conn, NewPost { poster_id: author.id }).unwrap();
                Media::insert(
                    &conn,
                    NewMedia {
                        media_type: MediaType::Picture,
                        url: format!("https://example.com/{}.png", i),
                        post_id: post.id,
                    },
                )
                .unwrap();
                // comments from someone else go away with the post
                Comment::insert(
                    &conn,
                    NewComment {
                        comment_text: "Nice".to_owned(),
                        author_id: other.id,
                        post_id: post.id,
                    },
                )
                .unwrap();
                own_posts.push(post);
            }

            let other_post = Post::insert(&conn, NewPost { poster_id: other.id }).unwrap();
            let own_comment = Comment::insert(
                &conn,
                NewComment {
                    comment_text: "Mine".to_owned(),
                    author_id: author.id,
                    post_id: other_post.id,
                },
            )
            .unwrap();
            let kept_comment = Comment::insert(
                &conn,
                NewComment {
                    comment_text: "Theirs".to_owned(),
                    author_id: other.id,
                    post_id: other_post.id,
                },
            )
            .unwrap();

            author.delete(&conn).unwrap();

            assert!(User::get(&conn, author.id).is_err());
            for post in &own_posts {
                assert!(Post::get(&conn, post.id).is_err());
                assert!(Media::list_by_post(&conn, post.id).unwrap().is_empty());
                assert!(Comment::list_by_post(&conn, post.id).unwrap().is_empty());
            }
            assert!(Comment::get(&conn, own_comment.id).is_err());
            assert!(Comment::list_by_author(&conn, author.id).unwrap().is_empty());

            assert!(Post::get(&conn, other_post.id).is_ok());
            let remaining = Comment::list_by_post(&conn, other_post.id).unwrap();
            assert_eq!(remaining.len(), 1);
            assert_eq!(remaining[0].id, kept_comment.id);
            assert!(User::get(&conn, other.id).is_ok());
            Ok(())
        });
    }

    #[test]
    fn delete_with_follower_edges() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let post = Post::insert(&conn, NewPost { poster_id: users[0].id }).unwrap();
            Follower::insert(
                &conn,
                NewFollower {
                    user_from_id: users[1].id,
                    user_to_id: users[0].id,
                },
            )
            .unwrap();

            assert!(users[0].delete(&conn).is_err());
            // nothing was deleted
            assert!(User::get(&conn, users[0].id).is_ok());
            assert!(Post::get(&conn, post.id).is_ok());

            Follower::delete_for_user(&conn, users[0].id).unwrap();
            users[0].delete(&conn).unwrap();
            assert!(User::get(&conn, users[0].id).is_err());
            assert!(Post::get(&conn, post.id).is_err());
            Ok(())
        });
    }
}
