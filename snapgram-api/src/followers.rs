use crate::users::UserView;

/// A "follows" edge with both ends expanded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerView {
    pub user_from: UserView,
    pub user_to: UserView,
}
