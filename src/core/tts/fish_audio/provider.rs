//! Fish Audio synthesis client.

use std::time::Instant;

use async_trait::async_trait;
use serde_json::json;

use super::config::{FishAudioModel, format_param};
use crate::config::ServerConfig;
use crate::core::tts::{
    ENGINE_FISH_AUDIO, ProviderHealth, SynthesisParams, SynthesisProvider, SynthesizedAudio,
};
use crate::errors::voice_error::{VoiceError, VoiceResult};

/// Fish Audio API base URL
pub const FISH_AUDIO_BASE_URL: &str = "https://api.fish.audio";

/// Fish Audio voice-cloning TTS client.
pub struct FishAudioTts {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: FishAudioModel,
}

impl FishAudioTts {
    pub fn new(config: &ServerConfig) -> VoiceResult<Self> {
        let api_key = config
            .fish_audio_api_key
            .clone()
            .ok_or_else(|| VoiceError::ProviderUnconfigured("Fish Audio API key".to_string()))?;
        let base_url = config
            .fish_audio_base_url
            .clone()
            .unwrap_or_else(|| FISH_AUDIO_BASE_URL.to_string());

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: FishAudioModel::default(),
        })
    }

    fn build_request(&self, text: &str, params: &SynthesisParams) -> reqwest::RequestBuilder {
        let body = json!({
            "text": text,
            "reference_id": params.voice_id,
            "format": format_param(params.audio_format),
            "sample_rate": params.sample_rate,
            "normalize": true,
        });

        self.client
            .post(format!("{}/v1/tts", self.base_url))
            .bearer_auth(&self.api_key)
            .header("model", self.model.as_str())
            .header("Content-Type", "application/json")
            .json(&body)
    }
}

#[async_trait]
impl SynthesisProvider for FishAudioTts {
    fn name(&self) -> &'static str {
        ENGINE_FISH_AUDIO
    }

    async fn synthesize(
        &self,
        text: &str,
        params: &SynthesisParams,
    ) -> VoiceResult<SynthesizedAudio> {
        let response = self
            .build_request(text, params)
            .send()
            .await
            .map_err(|e| VoiceError::SynthesisFailed {
                engine: ENGINE_FISH_AUDIO.to_string(),
                status: None,
                message: format!("request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable response body>".to_string());
            return Err(VoiceError::SynthesisFailed {
                engine: ENGINE_FISH_AUDIO.to_string(),
                status: Some(status.as_u16()),
                message,
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| VoiceError::SynthesisFailed {
                engine: ENGINE_FISH_AUDIO.to_string(),
                status: Some(status.as_u16()),
                message: format!("failed to read audio body: {e}"),
            })?;
        if audio.is_empty() {
            return Err(VoiceError::SynthesisFailed {
                engine: ENGINE_FISH_AUDIO.to_string(),
                status: Some(status.as_u16()),
                message: "provider returned empty audio".to_string(),
            });
        }

        Ok(SynthesizedAudio {
            audio,
            content_type: params.audio_format.content_type().to_string(),
            format: params.audio_format,
            sample_rate: params.sample_rate,
        })
    }

    async fn check_health(&self) -> ProviderHealth {
        let url = format!("{}/v1/wallet", self.base_url);
        let started = Instant::now();
        match self.client.get(url).bearer_auth(&self.api_key).send().await {
            Ok(response) if response.status().is_success() => ProviderHealth {
                engine: ENGINE_FISH_AUDIO.to_string(),
                healthy: true,
                latency_ms: Some(started.elapsed().as_millis() as u64),
                detail: None,
            },
            Ok(response) => ProviderHealth {
                engine: ENGINE_FISH_AUDIO.to_string(),
                healthy: false,
                latency_ms: Some(started.elapsed().as_millis() as u64),
                detail: Some(format!("probe returned HTTP {}", response.status())),
            },
            Err(e) => ProviderHealth {
                engine: ENGINE_FISH_AUDIO.to_string(),
                healthy: false,
                latency_ms: None,
                detail: Some(format!("probe failed: {e}")),
            },
        }
    }
}
