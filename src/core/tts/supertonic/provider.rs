//! Supertonic synthesis client.

use std::time::Instant;

use async_trait::async_trait;
use serde_json::json;

use crate::config::ServerConfig;
use crate::core::tts::{
    ENGINE_SUPERTONIC, ProviderHealth, SynthesisParams, SynthesisProvider, SynthesizedAudio,
};
use crate::errors::voice_error::{VoiceError, VoiceResult};

/// Client for a local Supertonic server.
pub struct SupertonicTts {
    client: reqwest::Client,
    base_url: String,
}

impl SupertonicTts {
    pub fn new(config: &ServerConfig) -> VoiceResult<Self> {
        let base_url = config.supertonic_url.clone().ok_or_else(|| {
            VoiceError::ProviderUnconfigured("Supertonic server URL".to_string())
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_request(&self, text: &str, params: &SynthesisParams) -> reqwest::RequestBuilder {
        let body = json!({
            "text": text,
            "voice": params.voice_id,
            "format": params.audio_format.as_str(),
            "sample_rate": params.sample_rate,
            "speed": params.speed.unwrap_or(1.0),
        });

        self.client
            .post(format!("{}/v1/synthesize", self.base_url))
            .header("Content-Type", "application/json")
            .json(&body)
    }
}

#[async_trait]
impl SynthesisProvider for SupertonicTts {
    fn name(&self) -> &'static str {
        ENGINE_SUPERTONIC
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
                engine: ENGINE_SUPERTONIC.to_string(),
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
                engine: ENGINE_SUPERTONIC.to_string(),
                status: Some(status.as_u16()),
                message,
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| VoiceError::SynthesisFailed {
                engine: ENGINE_SUPERTONIC.to_string(),
                status: Some(status.as_u16()),
                message: format!("failed to read audio body: {e}"),
            })?;
        if audio.is_empty() {
            return Err(VoiceError::SynthesisFailed {
                engine: ENGINE_SUPERTONIC.to_string(),
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
        let url = format!("{}/healthz", self.base_url);
        let started = Instant::now();
        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => ProviderHealth {
                engine: ENGINE_SUPERTONIC.to_string(),
                healthy: true,
                latency_ms: Some(started.elapsed().as_millis() as u64),
                detail: None,
            },
            Ok(response) => ProviderHealth {
                engine: ENGINE_SUPERTONIC.to_string(),
                healthy: false,
                latency_ms: Some(started.elapsed().as_millis() as u64),
                detail: Some(format!("probe returned HTTP {}", response.status())),
            },
            Err(e) => ProviderHealth {
                engine: ENGINE_SUPERTONIC.to_string(),
                healthy: false,
                latency_ms: None,
                detail: Some(format!("probe failed: {e}")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_url_is_unconfigured() {
        let result = SupertonicTts::new(&ServerConfig::default());
        assert!(matches!(result, Err(VoiceError::ProviderUnconfigured(_))));
    }

    #[test]
    fn test_request_building() {
        let mut config = ServerConfig::default();
        config.supertonic_url = Some("http://localhost:5040".to_string());
        let provider = SupertonicTts::new(&config).unwrap();
        let params = SynthesisParams::new("supertonic_f1");

        let built = provider.build_request("Hello", &params).build().unwrap();
        assert_eq!(built.url().as_str(), "http://localhost:5040/v1/synthesize");

        let body: serde_json::Value =
            serde_json::from_slice(built.body().unwrap().as_bytes().unwrap()).unwrap();
        assert_eq!(body["voice"], "supertonic_f1");
        assert_eq!(body["format"], "wav");
    }
}
