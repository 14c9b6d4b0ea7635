#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaView {
    pub media_id: i32,
    /// One of `Picture`, `URL`, `Video` or `Text`
    #[serde(rename = "type")]
    pub media_type: String,
    pub url: String,
    pub post_id: i32,
}
