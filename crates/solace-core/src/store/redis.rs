//! Redis-backed session store
//!
//! Each session is a hash `{version, data}` under a prefixed key. Saves run
//! a Lua compare-and-set so concurrent processes cannot overwrite each
//! other; the key expires after the configured TTL.

use super::{version_conflict, SessionStore};
use crate::context::ConversationContext;
use crate::error::{Error, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

const DEFAULT_PREFIX: &str = "solace:session:";

/// Returns the new version, or -1 on a version mismatch.
/// A missing key reads as version 0.
const SAVE_SCRIPT: &str = r#"
local current = tonumber(redis.call('HGET', KEYS[1], 'version') or '0')
if current ~= tonumber(ARGV[1]) then
    return -1
end
redis.call('HSET', KEYS[1], 'version', ARGV[2], 'data', ARGV[3])
redis.call('EXPIRE', KEYS[1], ARGV[4])
return tonumber(ARGV[2])
"#;

/// Redis session store
pub struct RedisStore {
    client: redis::Client,
    prefix: String,
    ttl_seconds: u64,
}

impl RedisStore {
    /// Create a store with the default prefix
    ///
    /// # Errors
    ///
    /// Returns error if the Redis URL is invalid
    pub fn new(redis_url: &str, ttl_seconds: u64) -> Result<Self> {
        Self::with_prefix(redis_url, DEFAULT_PREFIX, ttl_seconds)
    }

    /// Create with a custom key prefix
    ///
    /// # Errors
    ///
    /// Returns error if the Redis URL is invalid
    pub fn with_prefix(redis_url: &str, prefix: &str, ttl_seconds: u64) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| Error::Configuration(format!("Invalid Redis URL: {}", e)))?;

        Ok(Self {
            client,
            prefix: prefix.to_string(),
            ttl_seconds,
        })
    }

    fn build_key(&self, session_id: &str) -> String {
        format!("{}{}", self.prefix, session_id)
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| Error::Storage(format!("Redis connection failed: {}", e)))
    }
}

#[async_trait]
impl SessionStore for RedisStore {
    async fn get(&self, session_id: &str) -> Result<Option<ConversationContext>> {
        let mut conn = self.get_connection().await?;
        let key = self.build_key(session_id);

        let data: Option<String> = redis::cmd("HGET")
            .arg(&key)
            .arg("data")
            .query_async(&mut conn)
            .await?;

        match data {
            Some(json) => {
                let context: ConversationContext = serde_json::from_str(&json)?;
                debug!(session_id = %session_id, "Session loaded from Redis");
                Ok(Some(context))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, context: &mut ConversationContext) -> Result<()> {
        let mut conn = self.get_connection().await?;
        let key = self.build_key(context.session_id());
        let expected = context.version();
        let next = expected + 1;

        context.set_version(next);
        let json = serde_json::to_string(&*context);
        context.set_version(expected);
        let json = json?;

        let outcome: i64 = redis::Script::new(SAVE_SCRIPT)
            .key(&key)
            .arg(expected)
            .arg(next)
            .arg(&json)
            .arg(self.ttl_seconds)
            .invoke_async(&mut conn)
            .await?;

        if outcome < 0 {
            let found: Option<u64> = redis::cmd("HGET")
                .arg(&key)
                .arg("version")
                .query_async(&mut conn)
                .await?;
            return Err(version_conflict(context.session_id(), expected, found));
        }

        context.set_version(next);
        debug!(session_id = %context.session_id(), version = next, ttl = self.ttl_seconds, "Session saved to Redis");
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let deleted: i64 = redis::cmd("DEL")
            .arg(self.build_key(session_id))
            .query_async(&mut conn)
            .await?;

        debug!(session_id = %session_id, deleted = deleted > 0, "Session deleted from Redis");
        Ok(deleted > 0)
    }

    async fn exists(&self, session_id: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let exists: i64 = redis::cmd("EXISTS")
            .arg(self.build_key(session_id))
            .query_async(&mut conn)
            .await?;
        Ok(exists > 0)
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        let mut conn = self.get_connection().await?;
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(format!("{}*", self.prefix))
            .query_async(&mut conn)
            .await?;

        let ids: Vec<String> = keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(&self.prefix).map(str::to_string))
            .collect();

        warn!(count = ids.len(), "Listed all session ids from Redis (use with caution)");
        Ok(ids)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.list_ids().await?.len())
    }
}
