use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use redis::FromRedisValue;
use redis::aio::MultiplexedConnection;
use tokio::sync::Semaphore;
use url::Url;

use crate::config::StoreConfig;

use super::errors::StoreError;
use super::types::{SessionRecord, SessionStore};

/// Redis client with a bounded pool of connections.
///
/// At most `pool_size` commands are in flight at once. Waiting for a free
/// slot counts against the same timeout as the command itself, so an
/// exhausted pool looks exactly like a slow store: [`StoreError::Timeout`].
pub struct RedisSessionStore {
    client: redis::Client,
    idle: Mutex<Vec<MultiplexedConnection>>,
    slots: Semaphore,
    pool_size: usize,
    timeout: Duration,
}

impl RedisSessionStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let url = connection_url(config)?;
        let client = redis::Client::open(url.as_str()).map_err(|e| {
            tracing::error!("Failed to create Redis client: {}", e);
            StoreError::Config(e.to_string())
        })?;

        Ok(Self {
            client,
            idle: Mutex::new(Vec::with_capacity(config.pool_size)),
            slots: Semaphore::new(config.pool_size),
            pool_size: config.pool_size,
            timeout: config.timeout,
        })
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    async fn query<T: FromRedisValue>(&self, cmd: &redis::Cmd) -> Result<T, StoreError> {
        tokio::time::timeout(self.timeout, self.query_pooled(cmd))
            .await
            .map_err(|_| StoreError::Timeout)?
    }

    async fn query_pooled<T: FromRedisValue>(&self, cmd: &redis::Cmd) -> Result<T, StoreError> {
        let _slot = self
            .slots
            .acquire()
            .await
            .map_err(|_| StoreError::Connection("connection pool closed".to_string()))?;

        let mut conn = match self.take_idle() {
            Some(conn) => conn,
            None => self.client.get_multiplexed_async_connection().await?,
        };

        let result: redis::RedisResult<T> = cmd.query_async(&mut conn).await;
        match &result {
            Err(e) if e.kind() == redis::ErrorKind::IoError || e.is_connection_dropped() => {
                tracing::warn!("Dropping broken Redis connection: {}", e);
            }
            _ => self.return_idle(conn),
        }
        Ok(result?)
    }

    fn take_idle(&self) -> Option<MultiplexedConnection> {
        self.idle.lock().ok().and_then(|mut idle| idle.pop())
    }

    fn return_idle(&self, conn: MultiplexedConnection) {
        if let Ok(mut idle) = self.idle.lock() {
            if idle.len() < self.pool_size {
                idle.push(conn);
            }
        }
    }
}

/// Builds a `redis://` URL from `host:port` plus credentials and database index.
/// A full `redis://` or `rediss://` address is used as given.
fn connection_url(config: &StoreConfig) -> Result<Url, StoreError> {
    if config.address.contains("://") {
        return Url::parse(&config.address).map_err(|e| StoreError::Config(e.to_string()));
    }

    let mut url = Url::parse(&format!("redis://{}", config.address))
        .map_err(|e| StoreError::Config(format!("invalid store address: {e}")))?;
    if let Some(username) = &config.username {
        url.set_username(username)
            .map_err(|_| StoreError::Config("can not set store username".to_string()))?;
    }
    if let Some(password) = &config.password {
        url.set_password(Some(password))
            .map_err(|_| StoreError::Config("can not set store password".to_string()))?;
    }
    url.set_path(&format!("/{}", config.db_index));
    Ok(url)
}

/// A `GET` reply as a record. The stored bytes are kept as-is, whatever their encoding.
fn record_from_reply(
    session_id: &str,
    reply: &redis::Value,
) -> Result<Option<SessionRecord>, StoreError> {
    let value: Option<Vec<u8>> = FromRedisValue::from_redis_value(reply)?;
    Ok(value.map(|value| SessionRecord {
        session_id: session_id.to_string(),
        value,
    }))
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn ping(&self) -> Result<(), StoreError> {
        let _: String = self.query(&redis::cmd("PING")).await?;
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, StoreError> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(session_id);
        let reply: redis::Value = self.query(&cmd).await?;
        record_from_reply(session_id, &reply)
    }

    async fn delete(&self, session_id: &str) -> Result<bool, StoreError> {
        let mut cmd = redis::cmd("DEL");
        cmd.arg(session_id);
        let removed: i64 = self.query(&cmd).await?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreType;

    fn config(address: &str) -> StoreConfig {
        StoreConfig {
            store_type: StoreType::Redis,
            address: address.to_string(),
            ..StoreConfig::default()
        }
    }

    #[test]
    fn test_connection_url_plain_address() {
        let url = connection_url(&config("127.0.0.1:6379")).unwrap();
        assert_eq!(url.as_str(), "redis://127.0.0.1:6379/0");
    }

    #[test]
    fn test_connection_url_with_credentials_and_db() {
        let mut config = config("redis.internal:6380");
        config.username = Some("gate".to_string());
        config.password = Some("p@ss:word".to_string());
        config.db_index = 5;

        let url = connection_url(&config).unwrap();

        assert_eq!(url.username(), "gate");
        assert_eq!(url.password(), Some("p%40ss%3Aword"));
        assert_eq!(url.host_str(), Some("redis.internal"));
        assert_eq!(url.port(), Some(6380));
        assert_eq!(url.path(), "/5");
    }

    #[test]
    fn test_connection_url_full_url_is_kept() {
        let url = connection_url(&config("rediss://cache.example.com:6380/2")).unwrap();
        assert_eq!(url.as_str(), "rediss://cache.example.com:6380/2");
    }

    #[test]
    fn test_new_does_not_connect() {
        // Client creation is lazy; nothing listens on this port
        let store = RedisSessionStore::new(&config("127.0.0.1:1")).unwrap();
        assert_eq!(store.pool_size(), 10);
    }

    #[tokio::test]
    async fn test_unreachable_store_fails_within_timeout() {
        // Given a store pointing at a closed port with a short timeout
        let mut config = config("127.0.0.1:1");
        config.timeout = Duration::from_millis(500);
        let store = RedisSessionStore::new(&config).unwrap();

        // When looking up a session
        let started = std::time::Instant::now();
        let result = store.get("sid-42").await;

        // Then the lookup fails without exceeding the bound by much
        assert!(matches!(
            result,
            Err(StoreError::Timeout) | Err(StoreError::Connection(_))
        ));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_binary_record_is_present() {
        // Given a GET reply holding bytes that are not valid UTF-8
        let reply = redis::Value::BulkString(vec![0x80, 0x01, 0xff]);

        // When turning it into a record
        let record = record_from_reply("sid-42", &reply).unwrap();

        // Then the session exists and the bytes are untouched
        assert_eq!(
            record,
            Some(SessionRecord {
                session_id: "sid-42".to_string(),
                value: vec![0x80, 0x01, 0xff],
            })
        );
    }

    #[test]
    fn test_nil_reply_is_missing_record() {
        assert_eq!(record_from_reply("sid-42", &redis::Value::Nil).unwrap(), None);
    }

    #[tokio::test]
    async fn test_exhausted_pool_times_out() {
        // Given a single-slot pool whose only slot is taken
        let mut config = config("127.0.0.1:1");
        config.pool_size = 1;
        config.timeout = Duration::from_millis(200);
        let store = RedisSessionStore::new(&config).unwrap();
        let _held = store.slots.acquire().await.unwrap();

        // When looking up a session
        let result = store.get("sid-42").await;

        // Then waiting for the slot ends in a timeout
        assert_eq!(result, Err(StoreError::Timeout));
    }
}
