//! Redis Store Module
//!
//! Cache store backed by a shared Redis process. The connection manager is
//! multiplexed and reconnects on its own, so one instance serves every
//! request concurrently.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, InfoDict};
use tracing::{debug, info, warn};

use crate::cache::{CacheBackend, KeyTtl, StoreStats};
use crate::error::Result;

/// Keys requested per `SCAN` round trip.
const SCAN_BATCH: usize = 100;

// == Redis Store ==
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Opens a managed connection to the Redis server at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        info!("Connected to Redis at {}", url);
        Ok(Self { conn })
    }
}

/// Reads the lifetime keyspace counters out of an `INFO stats` reply.
///
/// Missing or unparsable fields count as zero.
pub fn stats_from_info(info: &InfoDict) -> StoreStats {
    StoreStats::new(
        info.get("keyspace_hits").unwrap_or(0),
        info.get("keyspace_misses").unwrap_or(0),
    )
}

/// Turns a raw `GET` reply into a text value.
///
/// Bytes that are not UTF-8 were not written by this service and read as absent.
pub fn decode_value(key: &str, raw: Option<Vec<u8>>) -> Option<String> {
    match String::from_utf8(raw?) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "ignoring non-UTF-8 cached value");
            None
        }
    }
}

#[async_trait]
impl CacheBackend for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let raw: Option<Vec<u8>> = conn.get(key).await?;
        Ok(decode_value(key, raw))
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        // SET EX rejects 0; a zero TTL means the value is already stale
        if ttl_secs == 0 {
            self.delete(key).await?;
            return Ok(());
        }

        let mut conn = self.conn.clone();
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: usize = conn.del(key).await?;
        Ok(removed > 0)
    }

    /// Walks the keyspace with `SCAN ... MATCH` so the server is never
    /// blocked the way `KEYS` would block it.
    async fn delete_matching(&self, pattern: &str) -> Result<usize> {
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut removed = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                let deleted: usize = conn.del(&keys).await?;
                removed += deleted;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!(pattern, removed, "deleted keys by pattern");
        Ok(removed)
    }

    async fn ttl(&self, key: &str) -> Result<KeyTtl> {
        let mut conn = self.conn.clone();
        let reply: i64 = conn.ttl(key).await?;
        Ok(KeyTtl::from_reply(reply))
    }

    async fn stats(&self) -> Result<StoreStats> {
        let mut conn = self.conn.clone();
        let info: InfoDict = redis::cmd("INFO").arg("stats").query_async(&mut conn).await?;
        Ok(stats_from_info(&info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_from_info() {
        let info = InfoDict::new(
            "# Stats\r\ntotal_connections_received:4\r\nkeyspace_hits:90\r\nkeyspace_misses:10\r\n",
        );
        assert_eq!(stats_from_info(&info), StoreStats::new(90, 10));
    }

    #[test]
    fn test_stats_from_info_missing_fields() {
        let info = InfoDict::new("# Stats\r\ntotal_connections_received:4\r\n");
        assert_eq!(stats_from_info(&info), StoreStats::default());
    }

    #[test]
    fn test_decode_value() {
        assert_eq!(
            decode_value("all_properties", Some(b"[]".to_vec())).as_deref(),
            Some("[]")
        );
        assert_eq!(decode_value("all_properties", None), None);
    }

    #[test]
    fn test_decode_value_binary_reads_as_absent() {
        assert_eq!(decode_value("all_properties", Some(vec![0xff, 0xfe])), None);
    }

    #[test]
    fn test_stats_from_info_malformed_fields() {
        let info = InfoDict::new("keyspace_hits:lots\r\nkeyspace_misses:7\r\n");
        assert_eq!(stats_from_info(&info), StoreStats::new(0, 7));
    }
}
