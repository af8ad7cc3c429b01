use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub avatar: String,
}

impl User {
    pub fn new(username: &str, avatar: &str) -> Self {
        Self {
            username: username.into(),
            avatar: avatar.into(),
        }
    }
}

/// Store-assigned tweet identifier.
///
/// Identifiers grow monotonically, so ordering by id is ordering by creation.
/// The textual form is exactly 16 hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TweetId(u64);

impl TweetId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Big-endian key bytes; lexicographic key order matches numeric order.
    pub fn to_key(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    pub fn from_key(key: &[u8]) -> Option<Self> {
        <[u8; 8]>::try_from(key)
            .ok()
            .map(|bytes| Self(u64::from_be_bytes(bytes)))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed tweet id: {0:?}")]
pub struct ParseTweetIdError(pub String);

impl FromStr for TweetId {
    type Err = ParseTweetIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 16 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseTweetIdError(s.to_string()));
        }
        u64::from_str_radix(s, 16)
            .map(Self)
            .map_err(|_| ParseTweetIdError(s.to_string()))
    }
}

impl fmt::Display for TweetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl Serialize for TweetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TweetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Tweet {
    pub id: TweetId,
    pub username: String,
    pub tweet: String,
}

/// A tweet joined with its author's avatar. Built on every feed read.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub id: TweetId,
    pub username: String,
    pub tweet: String,
    pub avatar: Option<String>,
}

impl FeedItem {
    pub fn new(tweet: Tweet, author: Option<User>) -> Self {
        Self {
            id: tweet.id,
            username: tweet.username,
            tweet: tweet.tweet,
            avatar: author.map(|user| user.avatar),
        }
    }
}
