use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::modules::storage;

const DEFAULT_MIME_TYPE: &str = "audio/webm";

/// One captured voice note. The raw bytes stay backend-side; the webview
/// plays the data URI. Dropped recordings release both.
#[derive(Debug, Clone, Serialize)]
pub struct AudioRecording {
    pub id: String,
    #[serde(skip)]
    pub data: Vec<u8>,
    pub data_uri: String,
    pub duration_ms: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug)]
struct ActiveRecording {
    started_at: DateTime<Utc>,
    mime_type: String,
    chunks: Vec<Vec<u8>>,
}

/// Recording session manager. The microphone stream itself lives in the
/// webview; this owns the buffer and the session lifecycle. Only one
/// recording may be active at a time.
#[derive(Debug, Default)]
pub struct AudioRecorder {
    active: Option<ActiveRecording>,
    recordings: Vec<AudioRecording>,
}

impl AudioRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Returns false when a recording is already in progress (no-op guard).
    pub fn start(&mut self, mime_type: Option<String>) -> bool {
        self.start_at(mime_type, Utc::now())
    }

    fn start_at(&mut self, mime_type: Option<String>, now: DateTime<Utc>) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(ActiveRecording {
            started_at: now,
            mime_type: mime_type.unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
            chunks: Vec::new(),
        });
        true
    }

    pub fn push_chunk(&mut self, chunk: Vec<u8>) -> Result<(), String> {
        match self.active.as_mut() {
            Some(recording) => {
                if !chunk.is_empty() {
                    recording.chunks.push(chunk);
                }
                Ok(())
            }
            None => Err("No recording in progress".to_string()),
        }
    }

    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> Option<i64> {
        self.active
            .as_ref()
            .map(|recording| now.signed_duration_since(recording.started_at).num_milliseconds())
    }

    /// Seal the buffer into one recording and release the session.
    pub fn stop(&mut self) -> Result<AudioRecording, String> {
        self.stop_at(Utc::now())
    }

    fn stop_at(&mut self, now: DateTime<Utc>) -> Result<AudioRecording, String> {
        let recording = self
            .active
            .take()
            .ok_or_else(|| "No recording in progress".to_string())?;

        let data: Vec<u8> = recording.chunks.concat();
        let data_uri = storage::encode_voice_note(&recording.mime_type, &data)?;
        let captured = AudioRecording {
            id: recording.started_at.timestamp_millis().to_string(),
            data,
            data_uri,
            duration_ms: now
                .signed_duration_since(recording.started_at)
                .num_milliseconds(),
            timestamp: now,
        };
        self.recordings.push(captured.clone());
        Ok(captured)
    }

    pub fn recordings(&self) -> &[AudioRecording] {
        &self.recordings
    }

    /// Returns false when no recording carried the id.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.recordings.len();
        self.recordings.retain(|recording| recording.id != id);
        self.recordings.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn start_time() -> DateTime<Utc> {
        "2025-06-30T20:15:00Z".parse().unwrap()
    }

    #[test]
    fn test_stop_produces_one_recording_with_duration() {
        let mut recorder = AudioRecorder::new();
        assert!(recorder.start_at(None, start_time()));
        recorder.push_chunk(vec![1, 2, 3]).unwrap();
        recorder.push_chunk(vec![4, 5]).unwrap();

        let stopped = recorder
            .stop_at(start_time() + Duration::milliseconds(3500))
            .unwrap();

        assert_eq!(1, recorder.recordings().len());
        assert!((3000..=4000).contains(&stopped.duration_ms));
        assert_eq!(vec![1, 2, 3, 4, 5], stopped.data);
        assert!(stopped.data_uri.starts_with("data:audio/webm;base64,"));
        assert!(!recorder.is_recording());
    }

    #[test]
    fn test_start_while_recording_is_a_no_op() {
        let mut recorder = AudioRecorder::new();
        assert!(recorder.start_at(None, start_time()));
        assert!(!recorder.start_at(None, start_time() + Duration::seconds(1)));
        recorder.push_chunk(vec![9]).unwrap();

        let stopped = recorder
            .stop_at(start_time() + Duration::seconds(2))
            .unwrap();
        // The second start did not reset the clock.
        assert_eq!(2000, stopped.duration_ms);
        assert_eq!(1, recorder.recordings().len());
    }

    #[test]
    fn test_chunk_without_session_is_rejected() {
        let mut recorder = AudioRecorder::new();
        assert!(recorder.push_chunk(vec![1]).is_err());
        assert!(recorder.stop().is_err());
    }

    #[test]
    fn test_delete_releases_recording() {
        let mut recorder = AudioRecorder::new();
        recorder.start_at(None, start_time());
        recorder.push_chunk(vec![1]).unwrap();
        let stopped = recorder
            .stop_at(start_time() + Duration::seconds(1))
            .unwrap();

        assert!(recorder.delete(&stopped.id));
        assert!(recorder.recordings().is_empty());
        assert!(!recorder.delete(&stopped.id));
    }

    #[test]
    fn test_elapsed_tracks_the_active_session() {
        let mut recorder = AudioRecorder::new();
        assert_eq!(None, recorder.elapsed_ms(start_time()));
        recorder.start_at(None, start_time());
        assert_eq!(
            Some(1500),
            recorder.elapsed_ms(start_time() + Duration::milliseconds(1500))
        );
    }
}
