use async_trait::async_trait;

use crate::{Cursor, Dump, Key, Result};

pub mod tcp;

/// The store the export reads from.
#[async_trait]
pub trait Source {
    /// Run one SCAN round from `cursor`, asking for about `count` keys.
    async fn scan(&mut self, cursor: Cursor, count: usize) -> Result<(Cursor, Vec<Key>)>;
    /// Serialized value of `key`.
    async fn dump(&mut self, key: &Key) -> Result<Dump>;
    /// Remaining time to live of `key`. Negative when the key has no expiry or is gone.
    async fn ttl(&mut self, key: &Key) -> Result<chrono::Duration>;
}

#[async_trait]
impl<S> Source for Box<S>
where
    S: Source + Send + ?Sized,
{
    async fn scan(&mut self, cursor: Cursor, count: usize) -> Result<(Cursor, Vec<Key>)> {
        (**self).scan(cursor, count).await
    }

    async fn dump(&mut self, key: &Key) -> Result<Dump> {
        (**self).dump(key).await
    }

    async fn ttl(&mut self, key: &Key) -> Result<chrono::Duration> {
        (**self).ttl(key).await
    }
}
