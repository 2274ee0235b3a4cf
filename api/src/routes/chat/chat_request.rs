use serde::Deserialize;

/// Form payload for `POST /get`.
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    /// User question.
    pub msg: String,
}
