//! Cache transitório chave-valor
//!
//! Guarda o state OAuth pendente e as credenciais recém-emitidas até o
//! consumidor buscá-las. Toda entrada tem expiração própria.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::utils::AppResult;
use crate::utils::logging::*;

/// Contrato do cache: operações atômicas por chave
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    async fn put(&self, key: &str, value: String, expire_seconds: u64) -> AppResult<()>;

    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Lê e remove a entrada
    ///
    /// A implementação padrão não é atômica; backends que suportam
    /// get-and-delete devem sobrescrever.
    async fn take(&self, key: &str) -> AppResult<Option<String>> {
        let value = self.get(key).await?;
        if value.is_some() {
            self.delete(key).await?;
        }
        Ok(value)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Cache em memória com TTL por entrada
#[derive(Debug, Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove entradas expiradas, retorna quantas foram removidas
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Inicia a limpeza periódica em background
    pub fn start_janitor(self, interval_seconds: u64) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(interval_seconds.max(1)));
            loop {
                interval.tick().await;
                let removed = self.purge_expired().await;
                if removed > 0 {
                    tracing::debug!("🧹 [Cache] {} entradas expiradas removidas", removed);
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        let now = Utc::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }
}

#[async_trait]
impl KeyValueCache for InMemoryCache {
    async fn put(&self, key: &str, value: String, expire_seconds: u64) -> AppResult<()> {
        let seconds = i64::try_from(expire_seconds)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1000);
        let ttl = Duration::seconds(seconds);
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.entries
            .write()
            .await
            .insert(key.to_string(), CacheEntry { value, expires_at });
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(Utc::now()))
            .map(|entry| entry.value.clone()))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn take(&self, key: &str) -> AppResult<Option<String>> {
        // Remoção sob o mesmo write lock: só um consumidor recebe o valor
        let removed = self.entries.write().await.remove(key);
        match removed {
            Some(entry) if !entry.is_expired(Utc::now()) => Ok(Some(entry.value)),
            Some(_) => {
                log_warning(&format!("⏰ [Cache] Entrada '{}' expirada", key));
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let cache = InMemoryCache::new();
        cache.put("hubspot_state:org:user", "value".to_string(), 600).await.unwrap();

        assert_eq!(
            cache.get("hubspot_state:org:user").await.unwrap().as_deref(),
            Some("value")
        );

        cache.delete("hubspot_state:org:user").await.unwrap();
        assert!(cache.get("hubspot_state:org:user").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_is_expired_immediately() {
        let cache = InMemoryCache::new();
        cache.put("key", "value".to_string(), 0).await.unwrap();

        assert!(cache.get("key").await.unwrap().is_none());
        assert!(cache.take("key").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_take_returns_value_only_once() {
        let cache = InMemoryCache::new();
        cache.put("key", "credentials".to_string(), 3600).await.unwrap();

        assert_eq!(cache.take("key").await.unwrap().as_deref(), Some("credentials"));
        assert!(cache.take("key").await.unwrap().is_none());
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_put_overwrites_previous_value() {
        let cache = InMemoryCache::new();
        cache.put("key", "first".to_string(), 600).await.unwrap();
        cache.put("key", "second".to_string(), 600).await.unwrap();

        assert_eq!(cache.get("key").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let cache = InMemoryCache::new();
        cache.put("expired", "a".to_string(), 0).await.unwrap();
        cache.put("alive", "b".to_string(), 600).await.unwrap();

        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        assert!(cache.get("alive").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_concurrent_take_has_single_winner() {
        let cache = InMemoryCache::new();
        cache.put("key", "blob".to_string(), 3600).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.take("key").await.unwrap() })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
