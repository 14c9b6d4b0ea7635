use crate::{schema::follower, users::User, Connection, Error, Result};
use diesel::{
    self, BoolExpressionMethods, Connection as _, ExpressionMethods, QueryDsl, RunQueryDsl,
};
use snapgram_api::followers::FollowerView;
use tracing::debug;

/// `user_from` follows `user_to`
#[derive(Clone, Debug, PartialEq, Eq, Queryable)]
pub struct Follower {
    pub user_from_id: i32,
    pub user_to_id: i32,
}

#[derive(Insertable)]
#[table_name = "follower"]
pub struct NewFollower {
    pub user_from_id: i32,
    pub user_to_id: i32,
}

impl Follower {
    pub fn insert(conn: &Connection, new: NewFollower) -> Result<Follower> {
        conn.transaction(|| {
            diesel::insert_into(follower::table)
                .values(&new)
                .execute(conn)?;
            Follower::find(conn, new.user_from_id, new.user_to_id)
        })
    }

    pub fn find(conn: &Connection, from: i32, to: i32) -> Result<Follower> {
        follower::table
            .filter(follower::user_from_id.eq(from))
            .filter(follower::user_to_id.eq(to))
            .get_result(conn)
            .map_err(Error::from)
    }

    /// Edges going out of a user, that is who they follow
    pub fn list_from(conn: &Connection, user_from_id: i32) -> Result<Vec<Follower>> {
        follower::table
            .filter(follower::user_from_id.eq(user_from_id))
            .order(follower::user_to_id.asc())
            .load::<Follower>(conn)
            .map_err(Error::from)
    }

    /// Edges pointing to a user, that is who follows them
    pub fn list_to(conn: &Connection, user_to_id: i32) -> Result<Vec<Follower>> {
        follower::table
            .filter(follower::user_to_id.eq(user_to_id))
            .order(follower::user_from_id.asc())
            .load::<Follower>(conn)
            .map_err(Error::from)
    }

    pub fn get_user_from(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.user_from_id)
    }

    pub fn get_user_to(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.user_to_id)
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(
            follower::table
                .filter(follower::user_from_id.eq(self.user_from_id))
                .filter(follower::user_to_id.eq(self.user_to_id)),
        )
        .execute(conn)
        .map(|_| ())
        .map_err(Error::from)
    }

    /// Removes every edge a user is part of, in either direction. Returns how
    /// many were removed.
    pub fn delete_for_user(conn: &Connection, user_id: i32) -> Result<usize> {
        let count = diesel::delete(
            follower::table.filter(
                follower::user_from_id
                    .eq(user_id)
                    .or(follower::user_to_id.eq(user_id)),
            ),
        )
        .execute(conn)?;
        debug!("Deleted {} follower edges of user {}", count, user_id);
        Ok(count)
    }

    pub fn serialize(&self, conn: &Connection) -> Result<FollowerView> {
        Ok(FollowerView {
            user_from: self.get_user_from(conn)?.serialize(),
            user_to: self.get_user_to(conn)?.serialize(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::db, users::tests as user_tests, Connection as Conn};
    use assert_json_diff::assert_json_eq;
    use diesel::Connection;
    use serde_json::{json, to_value};

    fn follow(conn: &Conn, from: &User, to: &User) -> Follower {
        Follower::insert(
            conn,
            NewFollower {
                user_from_id: from.id,
                user_to_id: to.id,
            },
        )
        .unwrap()
    }

    #[test]
    fn insert_and_find() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = user_tests::fill_database(&conn);
            let edge = follow(&conn, &users[0], &users[1]);
            assert_eq!(edge.user_from_id, users[0].id);
            assert_eq!(edge.user_to_id, users[1].id);
            assert_eq!(Follower::find(&conn, users[0].id, users[1].id).unwrap(), edge);
            // edges are directed
            assert!(matches!(
                Follower::find(&conn, users[1].id, users[0].id),
                Err(Error::NotFound)
            ));
            Ok(())
        });
    }

    #[test]
    fn no_duplicate_edge() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = user_tests::fill_database(&conn);
            follow(&conn, &users[0], &users[1]);
            assert!(Follower::insert(
                &conn,
                NewFollower {
                    user_from_id: users[0].id,
                    user_to_id: users[1].id,
                },
            )
            .is_err());
            Ok(())
        });
    }

    #[test]
    fn users_must_exist() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = user_tests::fill_database(&conn);
            let missing = users.iter().map(|u| u.id).max().unwrap() + 100;
            assert!(Follower::insert(
                &conn,
                NewFollower {
                    user_from_id: users[0].id,
                    user_to_id: missing,
                },
            )
            .is_err());
            Ok(())
        });
    }

    #[test]
    fn list() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = user_tests::fill_database(&conn);
            follow(&conn, &users[1], &users[0]);
            follow(&conn, &users[2], &users[0]);
            follow(&conn, &users[0], &users[2]);

            let to_admin = Follower::list_to(&conn, users[0].id).unwrap();
            assert_eq!(
                to_admin.iter().map(|f| f.user_from_id).collect::<Vec<_>>(),
                vec![users[1].id, users[2].id]
            );
            let from_admin = Follower::list_from(&conn, users[0].id).unwrap();
            assert_eq!(from_admin.len(), 1);
            assert_eq!(from_admin[0].get_user_to(&conn).unwrap().id, users[2].id);
            Ok(())
        });
    }

    #[test]
    fn list_unknown_user() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = user_tests::fill_database(&conn);
            follow(&conn, &users[0], &users[1]);
            let missing = users.iter().map(|u| u.id).max().unwrap() + 100;
            assert!(Follower::list_from(&conn, missing).unwrap().is_empty());
            assert!(Follower::list_to(&conn, missing).unwrap().is_empty());
            Ok(())
        });
    }

    #[test]
    fn serialize() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = user_tests::fill_database(&conn);
            let edge = follow(&conn, &users[0], &users[1]);
            let value = to_value(edge.serialize(&conn).unwrap()).unwrap();
            assert_json_eq!(
                value,
                json!({
                    "user_from": {"id": users[0].id, "email": "admin@example.com"},
                    "user_to": {"id": users[1].id, "email": "user@example.com"}
                })
            );
            assert!(!value.to_string().contains("password"));
            Ok(())
        });
    }

    #[test]
    fn delete() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = user_tests::fill_database(&conn);
            let edge = follow(&conn, &users[0], &users[1]);
            follow(&conn, &users[1], &users[0]);
            follow(&conn, &users[2], &users[1]);

            edge.delete(&conn).unwrap();
            assert!(Follower::find(&conn, users[0].id, users[1].id).is_err());
            assert!(Follower::find(&conn, users[1].id, users[0].id).is_ok());

            assert_eq!(Follower::delete_for_user(&conn, users[1].id).unwrap(), 2);
            assert!(Follower::list_to(&conn, users[1].id).unwrap().is_empty());
            assert!(Follower::list_from(&conn, users[1].id).unwrap().is_empty());
            Ok(())
        });
    }
}
