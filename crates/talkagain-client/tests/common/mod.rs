#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use talkagain_client::{AudioClip, AudioPlayer, Backend, ClientError, Microphone, Transcriber};
use talkagain_types::{Character, ChatRequest, ChatResponse};

#[derive(Default)]
pub struct FakeMicrophone {
    pub deny: Option<String>,
    pub clip_bytes: usize,
    pub acquired: AtomicBool,
    pub acquires: AtomicUsize,
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub discards: AtomicUsize,
    pub releases: AtomicUsize,
}

impl FakeMicrophone {
    pub fn with_clip(clip_bytes: usize) -> Arc<Self> {
        Arc::new(Self {
            clip_bytes,
            ..Self::default()
        })
    }

    pub fn denied(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            deny: Some(reason.to_string()),
            ..Self::default()
        })
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Microphone for FakeMicrophone {
    async fn acquire(&self) -> Result<(), ClientError> {
        if let Some(reason) = &self.deny {
            return Err(ClientError::Microphone(reason.clone()));
        }
        self.acquires.fetch_add(1, Ordering::SeqCst);
        self.acquired.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn start_recording(&self) -> Result<(), ClientError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stop_recording(&self) -> Result<AudioClip, ClientError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(AudioClip::new(vec![7u8; self.clip_bytes], "audio/webm"))
    }

    async fn discard_recording(&self) {
        self.discards.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
        self.acquired.store(false, Ordering::SeqCst);
    }

    fn is_acquired(&self) -> bool {
        self.acquired.load(Ordering::SeqCst)
    }
}

pub struct FakeTranscriber {
    pub reply: Result<String, String>,
    pub calls: AtomicUsize,
}

impl FakeTranscriber {
    pub fn saying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(msg: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(msg.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, _clip: &AudioClip) -> Result<String, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(ClientError::Microphone)
    }
}

pub struct FakeBackend {
    pub reply: Result<String, String>,
    pub synthesis_error: Option<String>,
    pub requests: Mutex<Vec<ChatRequest>>,
    pub spoken: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            synthesis_error: None,
            requests: Mutex::new(Vec::new()),
            spoken: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(msg: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(msg.to_string()),
            synthesis_error: None,
            requests: Mutex::new(Vec::new()),
            spoken: Mutex::new(Vec::new()),
        })
    }

    pub fn replying_without_speech(text: &str, synthesis_error: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            synthesis_error: Some(synthesis_error.to_string()),
            requests: Mutex::new(Vec::new()),
            spoken: Mutex::new(Vec::new()),
        })
    }

    pub fn chat_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(text) => Ok(ChatResponse {
                message: text.clone(),
                usage: None,
            }),
            Err(msg) => Err(ClientError::Server {
                status: 500,
                message: msg.clone(),
            }),
        }
    }

    async fn synthesize(
        &self,
        text: &str,
        _character: Option<&Character>,
    ) -> Result<Vec<u8>, ClientError> {
        self.spoken.lock().unwrap().push(text.to_string());
        match &self.synthesis_error {
            Some(msg) => Err(ClientError::Server {
                status: 500,
                message: msg.clone(),
            }),
            None => Ok(b"ID3fake".to_vec()),
        }
    }
}

pub struct FakePlayer {
    pub duration: Duration,
    pub plays: AtomicUsize,
    pub halts: AtomicUsize,
}

impl FakePlayer {
    pub fn lasting(duration: Duration) -> Arc<Self> {
        Arc::new(Self {
            duration,
            plays: AtomicUsize::new(0),
            halts: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl AudioPlayer for FakePlayer {
    async fn play(&self, _audio: Vec<u8>) -> Result<(), ClientError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.duration).await;
        Ok(())
    }

    fn halt(&self) {
        self.halts.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn maya() -> Character {
    talkagain_types::default_catalog().remove(0)
}
