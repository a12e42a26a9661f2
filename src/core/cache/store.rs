//! In-memory audio store built on moka.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use bytes::Bytes;
use parking_lot::Mutex;
use serde::Serialize;

use crate::core::tts::{AudioFormat, SynthesizedAudio};
use crate::errors::voice_error::VoiceError;

/// A cached synthesis result plus usage bookkeeping.
///
/// `hits` starts at 1 (the synthesis that produced the entry) and is
/// bumped on every subsequent cache hit. Bookkeeping is best-effort
/// and never fails a request.
#[derive(Debug)]
pub struct CacheEntry {
    pub audio: Bytes,
    pub content_type: String,
    pub format: AudioFormat,
    pub sample_rate: u32,
    /// Engine that produced the audio
    pub engine: String,
    /// First few characters of the source text, for diagnostics only
    pub text_preview: String,
    hits: AtomicU64,
    last_used: Mutex<SystemTime>,
}

const PREVIEW_LEN: usize = 48;

impl CacheEntry {
    pub fn new(audio: SynthesizedAudio, engine: &str, text: &str) -> Self {
        let text_preview = text.chars().take(PREVIEW_LEN).collect();
        Self {
            audio: audio.audio,
            content_type: audio.content_type,
            format: audio.format,
            sample_rate: audio.sample_rate,
            engine: engine.to_string(),
            text_preview,
            hits: AtomicU64::new(1),
            last_used: Mutex::new(SystemTime::now()),
        }
    }

    pub fn record_hit(&self) -> u64 {
        *self.last_used.lock() = SystemTime::now();
        self.hits.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn last_used(&self) -> SystemTime {
        *self.last_used.lock()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: u64,
    pub max_entries: u64,
    pub ttl_seconds: Option<u64>,
}

/// Bounded content-addressed cache of synthesized audio.
///
/// Capacity is enforced by moka's eviction; an optional TTL ages
/// entries out regardless of use.
pub struct AudioCache {
    inner: moka::future::Cache<String, Arc<CacheEntry>>,
    max_entries: u64,
    ttl: Option<Duration>,
}

impl AudioCache {
    pub fn new(max_entries: u64, ttl: Option<Duration>) -> Self {
        let mut builder = moka::future::Cache::builder().max_capacity(max_entries);
        if let Some(ttl) = ttl {
            builder = builder.time_to_live(ttl);
        }
        Self {
            inner: builder.build(),
            max_entries,
            ttl,
        }
    }

    /// Look up an entry, bumping its hit count when found.
    pub async fn get(&self, key: &str) -> Option<Arc<CacheEntry>> {
        let entry = self.inner.get(key).await?;
        let hits = entry.record_hit();
        tracing::debug!(key, hits, engine = %entry.engine, "Audio cache hit");
        Some(entry)
    }

    /// Peek without touching bookkeeping.
    pub async fn peek(&self, key: &str) -> Option<Arc<CacheEntry>> {
        self.inner.get(key).await
    }

    /// Insert a fresh entry. A concurrent insert under the same key is
    /// benign: the existing entry wins and the duplicate is dropped.
    pub async fn insert(&self, key: String, entry: CacheEntry) -> Arc<CacheEntry> {
        if let Some(existing) = self.inner.get(&key).await {
            let conflict = VoiceError::CacheWriteConflict(key);
            tracing::debug!(engine = %existing.engine, "{conflict}");
            return existing;
        }
        let entry = Arc::new(entry);
        self.inner.insert(key, entry.clone()).await;
        entry
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.inner.entry_count(),
            max_entries: self.max_entries,
            ttl_seconds: self.ttl.map(|t| t.as_secs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(payload: &'static [u8]) -> SynthesizedAudio {
        SynthesizedAudio {
            audio: Bytes::from_static(payload),
            content_type: "audio/wav".to_string(),
            format: AudioFormat::Wav,
            sample_rate: 24000,
        }
    }

    #[tokio::test]
    async fn test_miss_then_insert_then_hit() {
        let cache = AudioCache::new(16, None);
        assert!(cache.get("k1").await.is_none());

        cache
            .insert("k1".to_string(), CacheEntry::new(audio(b"riff"), "elevenlabs", "hello"))
            .await;

        let entry = cache.get("k1").await.unwrap();
        assert_eq!(entry.audio.as_ref(), b"riff");
        assert_eq!(entry.engine, "elevenlabs");
        // One for the originating synthesis, one for the hit
        assert_eq!(entry.hits(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_insert_keeps_existing_entry() {
        let cache = AudioCache::new(16, None);
        cache
            .insert("k1".to_string(), CacheEntry::new(audio(b"first"), "elevenlabs", "hello"))
            .await;
        let kept = cache
            .insert("k1".to_string(), CacheEntry::new(audio(b"second"), "fish_audio", "hello"))
            .await;

        assert_eq!(kept.audio.as_ref(), b"first");
        assert_eq!(cache.peek("k1").await.unwrap().audio.as_ref(), b"first");
    }

    #[tokio::test]
    async fn test_peek_does_not_bump_hits() {
        let cache = AudioCache::new(16, None);
        cache
            .insert("k1".to_string(), CacheEntry::new(audio(b"riff"), "elevenlabs", "hello"))
            .await;
        cache.peek("k1").await.unwrap();
        assert_eq!(cache.peek("k1").await.unwrap().hits(), 1);
    }

    #[test]
    fn test_text_preview_is_truncated() {
        let long_text = "a".repeat(200);
        let entry = CacheEntry::new(audio(b"riff"), "elevenlabs", &long_text);
        assert_eq!(entry.text_preview.len(), PREVIEW_LEN);
    }

    #[test]
    fn test_stats_reflect_configuration() {
        let cache = AudioCache::new(4096, Some(Duration::from_secs(600)));
        let stats = cache.stats();
        assert_eq!(stats.max_entries, 4096);
        assert_eq!(stats.ttl_seconds, Some(600));
    }
}
