//! Cache backend fakes.

use async_trait::async_trait;

use crate::cache::CacheBackend;
use crate::error::{CacheError, Error, Result};

/// A backend whose every call fails, modeling a full cache outage.
#[derive(Debug, Default)]
pub struct FailingBackend;

impl FailingBackend {
    pub fn new() -> Self {
        Self
    }

    fn down() -> Error {
        Error::Cache(CacheError::Backend("cache backend down".to_string()))
    }
}

#[async_trait]
impl CacheBackend for FailingBackend {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(Self::down())
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: chrono::Duration) -> Result<()> {
        Err(Self::down())
    }

    async fn set_if_absent(&self, _key: &str, _value: &str, _ttl: chrono::Duration) -> Result<bool> {
        Err(Self::down())
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        Err(Self::down())
    }

    async fn keys(&self, _pattern: &str) -> Result<Vec<String>> {
        Err(Self::down())
    }
}
