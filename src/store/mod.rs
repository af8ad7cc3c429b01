//! Document store backed by sled.
//!
//! Each collection is a sled tree holding JSON documents. `users` is keyed by
//! username, `tweets` by the big-endian bytes of a monotonically generated id.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::StoreError,
    models::{Tweet, TweetId, User},
};

const USERS: &str = "users";
const TWEETS: &str = "tweets";

/// Number of documents an update or delete matched: 0 or 1.
pub type MatchCount = u64;

pub trait UserStore: Send + Sync {
    fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Inserts the user unless the username is already taken, in which case the
    /// stored document is left untouched and `false` is returned.
    fn create(&self, username: &str, avatar: &str) -> Result<bool, StoreError>;
}

pub trait TweetStore: Send + Sync {
    fn list_all_newest_first(&self) -> Result<Vec<Tweet>, StoreError>;

    fn create(&self, username: &str, tweet: &str) -> Result<TweetId, StoreError>;

    fn update_by_id(&self, id: TweetId, username: &str, tweet: &str)
        -> Result<MatchCount, StoreError>;

    fn delete_by_id(&self, id: TweetId) -> Result<MatchCount, StoreError>;
}

/// Runs store calls on the blocking pool; sled may block on I/O.
pub async fn blocking<T, F>(call: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call).await?
}

/// Connection to the database. Opened once at startup.
#[derive(Clone)]
pub struct Store {
    db: sled::Db,
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    #[cfg(test)]
    pub fn temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    pub fn users(&self) -> Result<SledUsers, StoreError> {
        Ok(SledUsers {
            tree: self.db.open_tree(USERS)?,
        })
    }

    pub fn tweets(&self) -> Result<SledTweets, StoreError> {
        Ok(SledTweets {
            db: self.db.clone(),
            tree: self.db.open_tree(TWEETS)?,
        })
    }
}

/// Stored form of a tweet; the id lives in the key.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct TweetDocument {
    username: String,
    tweet: String,
}

impl TweetDocument {
    fn new(username: &str, tweet: &str) -> Self {
        Self {
            username: username.into(),
            tweet: tweet.into(),
        }
    }

    fn into_tweet(self, id: TweetId) -> Tweet {
        Tweet {
            id,
            username: self.username,
            tweet: self.tweet,
        }
    }
}

struct SledIVec(sled::IVec);

impl TryFrom<SledIVec> for User {
    type Error = StoreError;
    fn try_from(value: SledIVec) -> Result<Self, Self::Error> {
        Ok(serde_json::from_slice(&value.0)?)
    }
}

impl TryFrom<SledIVec> for TweetDocument {
    type Error = StoreError;
    fn try_from(value: SledIVec) -> Result<Self, Self::Error> {
        Ok(serde_json::from_slice(&value.0)?)
    }
}

pub struct SledUsers {
    tree: sled::Tree,
}

impl UserStore for SledUsers {
    fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.tree
            .get(username.as_bytes())?
            .map(|user| SledIVec(user).try_into())
            .transpose()
    }

    fn create(&self, username: &str, avatar: &str) -> Result<bool, StoreError> {
        let user = serde_json::to_vec(&User::new(username, avatar))?;
        let swapped =
            self.tree
                .compare_and_swap(username.as_bytes(), None::<&[u8]>, Some(user))?;
        if swapped.is_err() {
            debug!(username, "user already exists, keeping stored document");
        }
        Ok(swapped.is_ok())
    }
}

pub struct SledTweets {
    db: sled::Db,
    tree: sled::Tree,
}

impl TweetStore for SledTweets {
    fn list_all_newest_first(&self) -> Result<Vec<Tweet>, StoreError> {
        self.tree
            .iter()
            .rev()
            .map(|entry| -> Result<Tweet, StoreError> {
                let (key, value) = entry?;
                let id = TweetId::from_key(&key).ok_or_else(|| StoreError::CorruptKey {
                    tree: TWEETS,
                    key: key.to_vec(),
                })?;
                let document: TweetDocument = SledIVec(value).try_into()?;
                Ok(document.into_tweet(id))
            })
            .collect()
    }

    fn create(&self, username: &str, tweet: &str) -> Result<TweetId, StoreError> {
        let id = TweetId::new(self.db.generate_id()?);
        let document = serde_json::to_vec(&TweetDocument::new(username, tweet))?;
        self.tree.insert(id.to_key(), document)?;
        debug!(%id, username, "tweet stored");
        Ok(id)
    }

    fn update_by_id(
        &self,
        id: TweetId,
        username: &str,
        tweet: &str,
    ) -> Result<MatchCount, StoreError> {
        let document = serde_json::to_vec(&TweetDocument::new(username, tweet))?;
        let previous = self
            .tree
            .fetch_and_update(id.to_key(), |old| old.map(|_| document.clone()))?;
        Ok(previous.map_or(0, |_| 1))
    }

    fn delete_by_id(&self, id: TweetId) -> Result<MatchCount, StoreError> {
        let removed = self.tree.remove(id.to_key())?;
        Ok(removed.map_or(0, |_| 1))
    }
}
