//! F5-TTS synthesis client (RunPod serverless).

use std::time::Instant;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::json;

use crate::config::ServerConfig;
use crate::core::tts::{
    ENGINE_F5, ProviderHealth, SynthesisParams, SynthesisProvider, SynthesizedAudio,
};
use crate::errors::voice_error::{VoiceError, VoiceResult};

/// RunPod synchronous job envelope for a completed F5 synthesis.
#[derive(Debug, Deserialize)]
struct RunPodResponse {
    status: String,
    #[serde(default)]
    output: Option<RunPodOutput>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunPodOutput {
    audio_base64: String,
}

/// F5-TTS client against a pooled RunPod endpoint.
pub struct F5Tts {
    client: reqwest::Client,
    api_key: String,
    endpoint_url: String,
}

impl F5Tts {
    pub fn new(config: &ServerConfig) -> VoiceResult<Self> {
        let endpoint_url = config.f5_endpoint_url.clone().ok_or_else(|| {
            VoiceError::ProviderUnconfigured("F5 RunPod endpoint URL".to_string())
        })?;
        let api_key = config
            .f5_api_key
            .clone()
            .ok_or_else(|| VoiceError::ProviderUnconfigured("F5 RunPod API key".to_string()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint_url: endpoint_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_request(&self, text: &str, params: &SynthesisParams) -> reqwest::RequestBuilder {
        let body = json!({
            "input": {
                "text": text,
                "ref_audio": params.voice_id,
                "sample_rate": params.sample_rate,
                "speed": params.speed.unwrap_or(1.0),
            }
        });

        self.client
            .post(format!("{}/runsync", self.endpoint_url))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
    }
}

#[async_trait]
impl SynthesisProvider for F5Tts {
    fn name(&self) -> &'static str {
        ENGINE_F5
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
                engine: ENGINE_F5.to_string(),
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
                engine: ENGINE_F5.to_string(),
                status: Some(status.as_u16()),
                message,
            });
        }

        let envelope: RunPodResponse =
            response
                .json()
                .await
                .map_err(|e| VoiceError::SynthesisFailed {
                    engine: ENGINE_F5.to_string(),
                    status: Some(status.as_u16()),
                    message: format!("malformed job envelope: {e}"),
                })?;

        if envelope.status != "COMPLETED" {
            return Err(VoiceError::SynthesisFailed {
                engine: ENGINE_F5.to_string(),
                status: Some(status.as_u16()),
                message: envelope
                    .error
                    .unwrap_or_else(|| format!("job ended with status {}", envelope.status)),
            });
        }

        let output = envelope.output.ok_or_else(|| VoiceError::SynthesisFailed {
            engine: ENGINE_F5.to_string(),
            status: Some(status.as_u16()),
            message: "completed job carried no output".to_string(),
        })?;

        let audio =
            BASE64
                .decode(&output.audio_base64)
                .map_err(|e| VoiceError::SynthesisFailed {
                    engine: ENGINE_F5.to_string(),
                    status: Some(status.as_u16()),
                    message: format!("invalid base64 audio payload: {e}"),
                })?;
        if audio.is_empty() {
            return Err(VoiceError::SynthesisFailed {
                engine: ENGINE_F5.to_string(),
                status: Some(status.as_u16()),
                message: "provider returned empty audio".to_string(),
            });
        }

        Ok(SynthesizedAudio {
            audio: audio.into(),
            content_type: params.audio_format.content_type().to_string(),
            format: params.audio_format,
            sample_rate: params.sample_rate,
        })
    }

    async fn check_health(&self) -> ProviderHealth {
        let url = format!("{}/health", self.endpoint_url);
        let started = Instant::now();
        match self.client.get(url).bearer_auth(&self.api_key).send().await {
            Ok(response) if response.status().is_success() => ProviderHealth {
                engine: ENGINE_F5.to_string(),
                healthy: true,
                latency_ms: Some(started.elapsed().as_millis() as u64),
                detail: None,
            },
            Ok(response) => ProviderHealth {
                engine: ENGINE_F5.to_string(),
                healthy: false,
                latency_ms: Some(started.elapsed().as_millis() as u64),
                detail: Some(format!("probe returned HTTP {}", response.status())),
            },
            Err(e) => ProviderHealth {
                engine: ENGINE_F5.to_string(),
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

    fn test_provider() -> F5Tts {
        let mut config = ServerConfig::default();
        config.f5_endpoint_url = Some("https://api.runpod.ai/v2/f5-pool".to_string());
        config.f5_api_key = Some("rp-test-key".to_string());
        F5Tts::new(&config).unwrap()
    }

    #[test]
    fn test_requires_both_endpoint_and_key() {
        let mut endpoint_only = ServerConfig::default();
        endpoint_only.f5_endpoint_url = Some("https://api.runpod.ai/v2/f5-pool".to_string());
        assert!(matches!(
            F5Tts::new(&endpoint_only),
            Err(VoiceError::ProviderUnconfigured(_))
        ));

        let mut key_only = ServerConfig::default();
        key_only.f5_api_key = Some("rp-test-key".to_string());
        assert!(matches!(
            F5Tts::new(&key_only),
            Err(VoiceError::ProviderUnconfigured(_))
        ));
    }

    #[test]
    fn test_request_building() {
        let provider = test_provider();
        let params = SynthesisParams::new("seeds/femme_fatale.wav");

        let built = provider.build_request("Hello", &params).build().unwrap();
        assert!(built.url().as_str().ends_with("/runsync"));

        let body: serde_json::Value =
            serde_json::from_slice(built.body().unwrap().as_bytes().unwrap()).unwrap();
        assert_eq!(body["input"]["ref_audio"], "seeds/femme_fatale.wav");
        assert_eq!(body["input"]["text"], "Hello");
    }

    #[test]
    fn test_envelope_parsing() {
        let completed: RunPodResponse = serde_json::from_value(serde_json::json!({
            "status": "COMPLETED",
            "output": { "audio_base64": "AAAA" }
        }))
        .unwrap();
        assert_eq!(completed.status, "COMPLETED");
        assert!(completed.output.is_some());

        let failed: RunPodResponse = serde_json::from_value(serde_json::json!({
            "status": "FAILED",
            "error": "worker crashed"
        }))
        .unwrap();
        assert_eq!(failed.error.as_deref(), Some("worker crashed"));
    }
}
