//! ElevenLabs synthesis client.

use std::time::Instant;

use async_trait::async_trait;
use serde_json::json;

use super::config::{ElevenLabsModel, VoiceSettings, output_format_param};
use crate::config::ServerConfig;
use crate::core::tts::{
    ENGINE_ELEVENLABS, ProviderHealth, SynthesisParams, SynthesisProvider, SynthesizedAudio,
};
use crate::errors::voice_error::{VoiceError, VoiceResult};

/// ElevenLabs API base URL
pub const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";

/// ElevenLabs voice-cloning TTS client.
pub struct ElevenLabsTts {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: ElevenLabsModel,
    voice_settings: VoiceSettings,
}

impl ElevenLabsTts {
    pub fn new(config: &ServerConfig) -> VoiceResult<Self> {
        let api_key = config
            .elevenlabs_api_key
            .clone()
            .ok_or_else(|| VoiceError::ProviderUnconfigured("ElevenLabs API key".to_string()))?;
        let base_url = config
            .elevenlabs_base_url
            .clone()
            .unwrap_or_else(|| ELEVENLABS_BASE_URL.to_string());

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: ElevenLabsModel::default(),
            voice_settings: VoiceSettings::default(),
        })
    }

    fn build_request(&self, text: &str, params: &SynthesisParams) -> reqwest::RequestBuilder {
        let url = format!(
            "{}/v1/text-to-speech/{}",
            self.base_url, params.voice_id
        );

        let mut body = json!({
            "text": text,
            "model_id": self.model.as_str(),
            "voice_settings": self.voice_settings,
        });
        // ElevenLabs rejects out-of-range speeds; clamp rather than error
        if let Some(speed) = params.speed {
            body["voice_settings"]["speed"] = json!(speed.clamp(0.7, 1.2));
        }

        self.client
            .post(url)
            .query(&[(
                "output_format",
                output_format_param(params.audio_format, params.sample_rate),
            )])
            .header("xi-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
    }
}

#[async_trait]
impl SynthesisProvider for ElevenLabsTts {
    fn name(&self) -> &'static str {
        ENGINE_ELEVENLABS
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
                engine: ENGINE_ELEVENLABS.to_string(),
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
                engine: ENGINE_ELEVENLABS.to_string(),
                status: Some(status.as_u16()),
                message,
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| VoiceError::SynthesisFailed {
                engine: ENGINE_ELEVENLABS.to_string(),
                status: Some(status.as_u16()),
                message: format!("failed to read audio body: {e}"),
            })?;
        if audio.is_empty() {
            return Err(VoiceError::SynthesisFailed {
                engine: ENGINE_ELEVENLABS.to_string(),
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
        let url = format!("{}/v1/user", self.base_url);
        let started = Instant::now();
        match self
            .client
            .get(url)
            .header("xi-api-key", &self.api_key)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => ProviderHealth {
                engine: ENGINE_ELEVENLABS.to_string(),
                healthy: true,
                latency_ms: Some(started.elapsed().as_millis() as u64),
                detail: None,
            },
            Ok(response) => ProviderHealth {
                engine: ENGINE_ELEVENLABS.to_string(),
                healthy: false,
                latency_ms: Some(started.elapsed().as_millis() as u64),
                detail: Some(format!("probe returned HTTP {}", response.status())),
            },
            Err(e) => ProviderHealth {
                engine: ENGINE_ELEVENLABS.to_string(),
                healthy: false,
                latency_ms: None,
                detail: Some(format!("probe failed: {e}")),
            },
        }
    }
}
