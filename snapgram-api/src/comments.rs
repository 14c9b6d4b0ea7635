use crate::users::UserView;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: i32,
    pub comment_text: String,
    pub author: UserView,
    pub post_id: i32,
}
