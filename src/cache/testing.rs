//! Test doubles for the Store Client.

use async_trait::async_trait;

use crate::cache::{CacheBackend, KeyTtl, StoreStats};
use crate::error::{AppError, Result};

/// A store whose every call fails as if Redis were down.
pub struct UnreachableStore;

fn refused() -> AppError {
    AppError::CacheUnavailable("Connection refused (os error 111)".to_string())
}

#[async_trait]
impl CacheBackend for UnreachableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(refused())
    }

    async fn set(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<()> {
        Err(refused())
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        Err(refused())
    }

    async fn delete_matching(&self, _pattern: &str) -> Result<usize> {
        Err(refused())
    }

    async fn ttl(&self, _key: &str) -> Result<KeyTtl> {
        Err(refused())
    }

    async fn stats(&self) -> Result<StoreStats> {
        Err(refused())
    }
}
