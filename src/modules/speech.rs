use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tauri::{AppHandle, Emitter};
use url::Url;

use crate::modules::storage;

const API_BASE: &str = "https://api.elevenlabs.io";

// Popular hosted voices, addressable by short name.
pub const VOICES: [(&str, &str); 6] = [
    ("aria", "9BWtsMINqrJLrRacOk9x"),
    ("sarah", "EXAVITQu4vr4xnSDxMaL"),
    ("laura", "FGY2WhTYpPnrIDTdsKH5"),
    ("charlotte", "XB0fDUnXU5powFXDhCwa"),
    ("alice", "Xb7hH8MSUJpSbSDYk0k2"),
    ("matilda", "XrExE9yKIg1WjnnlVkGX"),
];

pub const MODELS: [(&str, &str); 2] = [
    ("turbo", "eleven_turbo_v2_5"),
    ("multilingual", "eleven_multilingual_v2"),
];

// Global HTTP client for the speech API
static SPEECH_CLIENT: OnceLock<Client> = OnceLock::new();

pub fn get_speech_client() -> &'static Client {
    SPEECH_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create speech HTTP client")
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsOptions {
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_voice_setting")]
    pub stability: f32,
    #[serde(default = "default_voice_setting")]
    pub similarity_boost: f32,
}

fn default_voice() -> String {
    "sarah".to_string()
}

fn default_model() -> String {
    "turbo".to_string()
}

fn default_voice_setting() -> f32 {
    0.5
}

impl Default for TtsOptions {
    fn default() -> Self {
        Self {
            voice: default_voice(),
            model: default_model(),
            stability: default_voice_setting(),
            similarity_boost: default_voice_setting(),
        }
    }
}

/// Short names resolve to hosted voice ids; anything else is taken as a raw
/// id already.
pub fn voice_id(name: &str) -> &str {
    VOICES
        .iter()
        .find(|(short, _)| *short == name)
        .map(|(_, id)| *id)
        .unwrap_or(name)
}

pub fn model_id(name: &str) -> &str {
    MODELS
        .iter()
        .find(|(short, _)| *short == name)
        .map(|(_, id)| *id)
        .unwrap_or(name)
}

#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    pub id: String,
    pub started_at: DateTime<Utc>,
}

/// At most one playback is active. Acquiring the slot returns whatever it
/// displaced so the caller can stop it.
#[derive(Debug, Default)]
pub struct PlaybackSlot {
    current: Option<PlaybackHandle>,
}

impl PlaybackSlot {
    pub fn acquire(&mut self, handle: PlaybackHandle) -> Option<PlaybackHandle> {
        self.current.replace(handle)
    }

    pub fn release(&mut self) -> Option<PlaybackHandle> {
        self.current.take()
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_id(&self) -> Option<String> {
        self.current.as_ref().map(|handle| handle.id.clone())
    }
}

/// Speak `text`. With an API key the hosted voice is used and the audio is
/// handed to the webview as a data URI; without one the webview is asked to
/// use platform speech synthesis instead.
pub async fn speak(
    app: &AppHandle,
    slot: &tokio::sync::Mutex<PlaybackSlot>,
    text: &str,
    options: TtsOptions,
    api_key: Option<String>,
) -> Result<(), String> {
    let api_key = api_key.filter(|key| !key.is_empty());
    let Some(api_key) = api_key else {
        app.emit(
            "speak_text",
            serde_json::json!({ "text": text, "rate": 0.8, "pitch": 1.0, "volume": 0.8 }),
        )
        .map_err(|e| format!("Failed to request speech synthesis: {}", e))?;
        return Ok(());
    };

    let audio = request_speech(text, &options, &api_key).await?;
    let data_uri = storage::to_data_uri("audio/mpeg", &audio);

    let handle = PlaybackHandle {
        id: Utc::now().timestamp_millis().to_string(),
        started_at: Utc::now(),
    };
    let playback_id = handle.id.clone();
    {
        let mut slot = slot.lock().await;
        if let Some(prior) = slot.acquire(handle) {
            let _ = app.emit("stop_audio", prior.id);
        }
    }

    app.emit(
        "play_audio",
        serde_json::json!({ "id": playback_id, "url": data_uri }),
    )
    .map_err(|e| format!("Failed to start playback: {}", e))
}

pub async fn stop(app: &AppHandle, slot: &tokio::sync::Mutex<PlaybackSlot>) -> Result<(), String> {
    let released = slot.lock().await.release();
    if let Some(prior) = released {
        app.emit("stop_audio", prior.id)
            .map_err(|e| format!("Failed to stop playback: {}", e))?;
    }
    Ok(())
}

async fn request_speech(text: &str, options: &TtsOptions, api_key: &str) -> Result<Vec<u8>, String> {
    let base = Url::parse(API_BASE).map_err(|e| format!("Invalid speech API base: {}", e))?;
    let endpoint = base
        .join(&format!("/v1/text-to-speech/{}", voice_id(&options.voice)))
        .map_err(|e| format!("Invalid speech API endpoint: {}", e))?;

    let payload = serde_json::json!({
        "text": text,
        "model_id": model_id(&options.model),
        "voice_settings": {
            "stability": options.stability,
            "similarity_boost": options.similarity_boost
        }
    });

    let response = get_speech_client()
        .post(endpoint)
        .header("Accept", "audio/mpeg")
        .header("xi-api-key", api_key)
        .json(&payload)
        .send()
        .await
        .map_err(|e| format!("Failed to reach speech API: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("Speech API error: {}", response.status()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| format!("Failed to read speech audio: {}", e))?;
    Ok(bytes.to_vec())
}
