use crate::{comments::CommentView, medias::MediaView, users::UserView};

/// A post with its whole subgraph: poster, attachments and comments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub post_id: i32,
    pub poster: UserView,
    pub media_items: Vec<MediaView>,
    pub comments: Vec<CommentView>,
}
