use crate::{
    comments::Comment,
    medias::Media,
    schema::{comment, media, post},
    users::User,
    Connection, Error, Result,
};
use diesel::{self, BelongingToDsl, Connection as _, ExpressionMethods, QueryDsl, RunQueryDsl};
use snapgram_api::posts::PostView;
use tracing::debug;

#[derive(Queryable, Identifiable, Associations, Clone, Debug)]
#[belongs_to(User, foreign_key = "poster_id")]
#[table_name = "post"]
pub struct Post {
    pub id: i32,
    pub poster_id: i32,
}

#[derive(Insertable)]
#[table_name = "post"]
pub struct NewPost {
    pub poster_id: i32,
}

impl Post {
    insert!(post, NewPost);
    get!(post);
    list_by!(post, list_by_poster, id, poster_id as i32);

    pub fn get_poster(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.poster_id)
    }

    pub fn get_media_items(&self, conn: &Connection) -> Result<Vec<Media>> {
        Media::belonging_to(self)
            .order(media::media_id.asc())
            .load::<Media>(conn)
            .map_err(Error::from)
    }

    pub fn get_comments(&self, conn: &Connection) -> Result<Vec<Comment>> {
        Comment::belonging_to(self)
            .order(comment::id.asc())
            .load::<Comment>(conn)
            .map_err(Error::from)
    }

    /// Deletes the post along with its media and comments.
    pub fn delete(&self, conn: &Connection) -> Result<()> {
        conn.transaction(|| {
            let medias = diesel::delete(media::table.filter(media::post_id.eq(self.id)))
                .execute(conn)?;
            let comments = diesel::delete(comment::table.filter(comment::post_id.eq(self.id)))
                .execute(conn)?;
            debug!(
                "Deleting post {} with {} media and {} comments",
                self.id, medias, comments
            );
            diesel::delete(self)
                .execute(conn)
                .map(|_| ())
                .map_err(Error::from)
        })
    }

    /// Expands the poster, the attachments and the comments (with their
    /// authors).
    pub fn serialize(&self, conn: &Connection) -> Result<PostView> {
        Ok(PostView {
            post_id: self.id,
            poster: self.get_poster(conn)?.serialize(),
            media_items: self
                .get_media_items(conn)?
                .iter()
                .map(Media::serialize)
                .collect(),
            comments: self
                .get_comments(conn)?
                .iter()
                .map(|c| c.serialize(conn))
                .collect::<Result<Vec<_>>>()?,
        })
    }
}
