use crate::{posts::Post, schema::comment, users::User, Connection, Error, Result};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};
use snapgram_api::comments::CommentView;

#[derive(Queryable, Identifiable, Associations, Clone, Debug)]
#[belongs_to(Post)]
#[belongs_to(User, foreign_key = "author_id")]
#[table_name = "comment"]
pub struct Comment {
    pub id: i32,
    pub comment_text: String,
    pub author_id: i32,
    pub post_id: i32,
}

#[derive(Insertable)]
#[table_name = "comment"]
pub struct NewComment {
    pub comment_text: String,
    pub author_id: i32,
    pub post_id: i32,
}

impl Comment {
    insert!(comment, NewComment);
    get!(comment);
    list_by!(comment, list_by_post, id, post_id as i32);
    list_by!(comment, list_by_author, id, author_id as i32);

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.author_id)
    }

    pub fn get_post(&self, conn: &Connection) -> Result<Post> {
        Post::get(conn, self.post_id)
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self)
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    pub fn serialize(&self, conn: &Connection) -> Result<CommentView> {
        Ok(CommentView {
            id: self.id,
            comment_text: self.comment_text.clone(),
            author: self.get_author(conn)?.serialize(),
            post_id: self.post_id,
        })
    }
}
