//! The speech pipeline: resolve, route, check the cache, synthesize,
//! fall back once.
//!
//! Voice resolution and routing happen before any network traffic, so a
//! broken binding fails fast without burning provider quota. At most two
//! provider calls are made per request: the primary engine and, when
//! the primary fails at runtime, a single backup.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::core::cache::{AudioCache, CacheEntry, cache_key};
use crate::core::tts::{AudioFormat, ProviderRegistry, SynthesisParams};
use crate::core::voice::{ProviderVoiceMap, RouterDecision, VoiceCatalog, VoiceRef, VoiceRouter};
use crate::errors::voice_error::{EngineAttempt, VoiceError, VoiceResult};

/// Caller-tunable knobs for one synthesis request.
#[derive(Debug, Clone, Default)]
pub struct SpeakOptions {
    /// Bypass routing and use this engine
    pub forced_engine: Option<String>,
    pub audio_format: Option<AudioFormat>,
    pub sample_rate: Option<u32>,
    pub speed: Option<f32>,
}

/// A finished synthesis, cached or fresh. `served_by_engine` is always
/// set so callers can attribute the audio.
#[derive(Debug, Clone)]
pub struct SpeechResult {
    pub audio: Bytes,
    pub content_type: String,
    pub format: AudioFormat,
    pub sample_rate: u32,
    pub served_by_engine: String,
    pub cache_hit: bool,
    pub cache_key: String,
    pub hit_count: u64,
}

pub struct SpeechPipeline {
    catalog: Arc<VoiceCatalog>,
    router: VoiceRouter,
    registry: Arc<ProviderRegistry>,
    cache: Arc<AudioCache>,
    attempt_timeout: Duration,
}

impl SpeechPipeline {
    pub fn new(
        catalog: Arc<VoiceCatalog>,
        voice_map: Arc<ProviderVoiceMap>,
        registry: Arc<ProviderRegistry>,
        cache: Arc<AudioCache>,
        engine_preference: Vec<String>,
        attempt_timeout: Duration,
    ) -> Self {
        let available = registry.engines().into_iter().map(|e| e.to_string());
        let router = VoiceRouter::new(engine_preference, available, voice_map);
        Self {
            catalog,
            router,
            registry,
            cache,
            attempt_timeout,
        }
    }

    pub fn cache(&self) -> &AudioCache {
        &self.cache
    }

    /// Synthesize speech for a character's voice binding.
    pub async fn synthesize_speech(
        &self,
        text: &str,
        voice: &VoiceRef,
        options: &SpeakOptions,
    ) -> VoiceResult<SpeechResult> {
        if text.trim().is_empty() {
            return Err(VoiceError::InvalidRequest(
                "text must not be empty".to_string(),
            ));
        }

        let request_id = uuid::Uuid::new_v4();
        let seed = self.catalog.resolve(voice)?;
        let primary = self
            .router
            .select(&seed.name, options.forced_engine.as_deref())?;

        tracing::debug!(
            %request_id,
            seed = %seed.name,
            engine = %primary.engine,
            reason = %primary.reason,
            "Routed synthesis request"
        );

        let mut attempts: Vec<EngineAttempt> = Vec::new();

        match self.attempt(text, &primary, options, request_id).await {
            Ok(result) => return Ok(result),
            Err(err) if err.is_recoverable() && options.forced_engine.is_none() => {
                attempts.push(attempt_record(&primary.engine, &err));
                if let Some(backup) = self.router.backup_for(&seed.name, &primary.engine) {
                    tracing::warn!(
                        %request_id,
                        failed = %primary.engine,
                        backup = %backup.engine,
                        "Primary engine failed, engaging backup"
                    );
                    match self.attempt(text, &backup, options, request_id).await {
                        Ok(result) => return Ok(result),
                        Err(err) => attempts.push(attempt_record(&backup.engine, &err)),
                    }
                }
                Err(VoiceError::AllEnginesFailed { attempts })
            }
            Err(err) if err.is_recoverable() => {
                // Forced engine: the caller opted out of fallback
                attempts.push(attempt_record(&primary.engine, &err));
                Err(VoiceError::AllEnginesFailed { attempts })
            }
            Err(err) => Err(err),
        }
    }

    async fn attempt(
        &self,
        text: &str,
        decision: &RouterDecision,
        options: &SpeakOptions,
        request_id: uuid::Uuid,
    ) -> VoiceResult<SpeechResult> {
        let mut params = SynthesisParams::new(decision.voice_id.clone());
        if let Some(format) = options.audio_format {
            params.audio_format = format;
            params.sample_rate = format.default_sample_rate();
        }
        if let Some(rate) = options.sample_rate {
            params.sample_rate = rate;
        }
        params.speed = options.speed;
        let key = cache_key(text, &decision.engine, &params);

        if let Some(entry) = self.cache.get(&key).await {
            return Ok(SpeechResult {
                audio: entry.audio.clone(),
                content_type: entry.content_type.clone(),
                format: entry.format,
                sample_rate: entry.sample_rate,
                served_by_engine: entry.engine.clone(),
                cache_hit: true,
                cache_key: key,
                hit_count: entry.hits(),
            });
        }

        let provider = self
            .registry
            .get(&decision.engine)
            .ok_or_else(|| VoiceError::ProviderUnconfigured(decision.engine.clone()))?;

        let synthesis = tokio::time::timeout(self.attempt_timeout, provider.synthesize(text, &params));
        let audio = match synthesis.await {
            Ok(result) => result?,
            Err(_elapsed) => {
                return Err(VoiceError::SynthesisFailed {
                    engine: decision.engine.clone(),
                    status: None,
                    message: format!("timed out after {:?}", self.attempt_timeout),
                });
            }
        };

        tracing::info!(
            %request_id,
            engine = %decision.engine,
            bytes = audio.audio.len(),
            "Synthesis complete"
        );

        let entry = self
            .cache
            .insert(key.clone(), CacheEntry::new(audio, &decision.engine, text))
            .await;

        Ok(SpeechResult {
            audio: entry.audio.clone(),
            content_type: entry.content_type.clone(),
            format: entry.format,
            sample_rate: entry.sample_rate,
            served_by_engine: entry.engine.clone(),
            cache_hit: false,
            cache_key: key,
            hit_count: entry.hits(),
        })
    }
}

fn attempt_record(engine: &str, err: &VoiceError) -> EngineAttempt {
    match err {
        VoiceError::SynthesisFailed {
            status, message, ..
        } => EngineAttempt {
            engine: engine.to_string(),
            status: *status,
            reason: message.clone(),
        },
        other => EngineAttempt {
            engine: engine.to_string(),
            status: None,
            reason: other.to_string(),
        },
    }
}
