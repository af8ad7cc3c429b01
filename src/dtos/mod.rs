use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SignUp {
    pub username: String,
    pub avatar: String,
}

/// Body of both `POST /tweets` and `PUT /tweets/:id`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TweetBody {
    pub username: String,
    pub tweet: String,
}
