use crate::{posts::Post, schema::media, Connection, Error, Result};
use diesel::{
    self,
    backend::Backend,
    deserialize::{self, FromSql},
    serialize::{self, Output, ToSql},
    sql_types::Text,
    ExpressionMethods, QueryDsl, RunQueryDsl,
};
use snapgram_api::medias::MediaView;
use std::{fmt, io::Write, str::FromStr};

/// What a media points to. Stored as its name.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, AsExpression, FromSqlRow)]
#[sql_type = "Text"]
pub enum MediaType {
    Picture,
    URL,
    Video,
    Text,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match *self {
            MediaType::Picture => "Picture",
            MediaType::URL => "URL",
            MediaType::Video => "Video",
            MediaType::Text => "Text",
        }
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Picture" => Ok(MediaType::Picture),
            "URL" => Ok(MediaType::URL),
            "Video" => Ok(MediaType::Video),
            "Text" => Ok(MediaType::Text),
            _ => Err(Error::InvalidValue),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<DB> ToSql<Text, DB> for MediaType
where
    DB: Backend,
    str: ToSql<Text, DB>,
{
    fn to_sql<W: Write>(&self, out: &mut Output<W, DB>) -> serialize::Result {
        str::to_sql(self.as_str(), out)
    }
}

impl<DB> FromSql<Text, DB> for MediaType
where
    DB: Backend,
    String: FromSql<Text, DB>,
{
    fn from_sql(bytes: Option<&DB::RawValue>) -> deserialize::Result<Self> {
        let value = String::from_sql(bytes)?;
        value
            .parse()
            .map_err(|_| format!("Unknown media type: {}", value).into())
    }
}

#[derive(Queryable, Identifiable, Associations, Clone, Debug)]
#[belongs_to(Post)]
#[primary_key(media_id)]
#[table_name = "media"]
pub struct Media {
    pub media_id: i32,
    pub media_type: MediaType,
    pub url: String,
    pub post_id: i32,
}

#[derive(Insertable)]
#[table_name = "media"]
pub struct NewMedia {
    #[column_name = "type_"]
    pub media_type: MediaType,
    pub url: String,
    pub post_id: i32,
}

impl Media {
    insert!(media, NewMedia, media_id);
    get!(media, media_id);
    find_by!(media, find_by_url, url as &str);
    list_by!(media, list_by_post, media_id, post_id as i32);

    pub fn get_post(&self, conn: &Connection) -> Result<Post> {
        Post::get(conn, self.post_id)
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self)
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    /// The post is only referenced by its id.
    pub fn serialize(&self) -> MediaView {
        MediaView {
            media_id: self.media_id,
            media_type: self.media_type.to_string(),
            url: self.url.clone(),
            post_id: self.post_id,
        }
    }
}
