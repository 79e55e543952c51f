//! Async driver for [`VoiceTurnMachine`].
//!
//! The loop runs as a single task. It owns the session state and the
//! machine, holds at most one pending operation (a timer, a device call, or a
//! request), and selects between that operation and the command channel.
//! Every continuation is delivered back through the machine, so it always
//! sees the current phase and a stop can never be undone by a late timer.

use crate::conversation::APOLOGY_REPLY;
use crate::error::ClientError;
use crate::ports::{AudioPlayer, Backend, Microphone, Transcriber};
use crate::session::SessionState;
use crate::voice_machine::{Effect, TurnMode, VoiceEvent, VoicePhase, VoiceTurnMachine};
use futures_util::future::BoxFuture;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCommand {
    Start(TurnMode),
    /// End the current recording early.
    Finish,
    Stop,
}

impl VoiceCommand {
    fn into_event(self) -> VoiceEvent {
        match self {
            Self::Start(mode) => VoiceEvent::Start(mode),
            Self::Finish => VoiceEvent::FinishRequested,
            Self::Stop => VoiceEvent::Stop,
        }
    }
}

/// What the UI renders while the loop runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceSnapshot {
    pub session: SessionState,
    pub phase: VoicePhase,
    pub active: bool,
    /// Latest message to show the user, if any.
    pub notice: Option<String>,
}

pub struct VoiceLoop {
    machine: VoiceTurnMachine,
    session: SessionState,
    notice: Option<String>,
    backend: Arc<dyn Backend>,
    transcriber: Arc<dyn Transcriber>,
    microphone: Arc<dyn Microphone>,
    player: Arc<dyn AudioPlayer>,
    pending: Option<BoxFuture<'static, VoiceEvent>>,
}

enum Wake {
    Command(Option<VoiceCommand>),
    Completed(VoiceEvent),
}

async fn next_completion(pending: &mut Option<BoxFuture<'static, VoiceEvent>>) -> VoiceEvent {
    match pending.as_mut() {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}

impl VoiceLoop {
    pub fn new(
        session: SessionState,
        backend: Arc<dyn Backend>,
        transcriber: Arc<dyn Transcriber>,
        microphone: Arc<dyn Microphone>,
        player: Arc<dyn AudioPlayer>,
    ) -> Self {
        Self {
            machine: VoiceTurnMachine::new(),
            session,
            notice: None,
            backend,
            transcriber,
            microphone,
            player,
            pending: None,
        }
    }

    pub fn with_machine(mut self, machine: VoiceTurnMachine) -> Self {
        self.machine = machine;
        self
    }

    pub fn snapshot(&self) -> VoiceSnapshot {
        VoiceSnapshot {
            session: self.session.clone(),
            phase: self.machine.phase(),
            active: self.machine.is_active(),
            notice: self.notice.clone(),
        }
    }

    /// Runs until the command channel closes, then tears down and hands the
    /// session back.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<VoiceCommand>,
        snapshots: watch::Sender<VoiceSnapshot>,
    ) -> SessionState {
        loop {
            let wake = tokio::select! {
                cmd = commands.recv() => Wake::Command(cmd),
                event = next_completion(&mut self.pending) => Wake::Completed(event),
            };
            match wake {
                Wake::Command(Some(cmd)) => {
                    if let VoiceCommand::Start(_) = cmd {
                        self.notice = None;
                    }
                    self.dispatch(cmd.into_event()).await;
                }
                Wake::Command(None) => {
                    self.dispatch(VoiceEvent::Stop).await;
                    snapshots.send_replace(self.snapshot());
                    break;
                }
                Wake::Completed(event) => {
                    self.pending = None;
                    self.dispatch(event).await;
                }
            }
            snapshots.send_replace(self.snapshot());
        }
        self.session
    }

    async fn dispatch(&mut self, event: VoiceEvent) {
        match &event {
            VoiceEvent::MicrophoneFailed(msg)
            | VoiceEvent::RecordingFailed(msg)
            | VoiceEvent::CaptureFailed(msg)
            | VoiceEvent::TranscriptionFailed(msg)
            | VoiceEvent::ReplyFailed(msg)
            | VoiceEvent::SynthesisFailed(msg)
            | VoiceEvent::PlaybackFailed(msg) => {
                tracing::warn!(phase = ?self.machine.phase(), error = %msg, "voice turn step failed");
            }
            _ => {}
        }

        let effects = self.machine.handle(event);
        for effect in effects {
            self.apply(effect).await;
        }

        let phase = self.machine.phase();
        self.session.recording = phase.is_recording();
        self.session.processing = phase.is_processing();
        self.session.playing = phase.is_playing();
        tracing::debug!(?phase, active = self.machine.is_active(), "voice loop transition");
    }

    async fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::StartRecording { ceiling } => {
                let microphone = self.microphone.clone();
                self.pending = Some(Box::pin(async move {
                    if let Err(e) = microphone.acquire().await {
                        return VoiceEvent::MicrophoneFailed(e.to_string());
                    }
                    if let Err(e) = microphone.start_recording().await {
                        return VoiceEvent::RecordingFailed(e.to_string());
                    }
                    tokio::time::sleep(ceiling).await;
                    VoiceEvent::CeilingReached
                }));
            }
            Effect::StopRecording => {
                let microphone = self.microphone.clone();
                self.pending = Some(Box::pin(async move {
                    match microphone.stop_recording().await {
                        Ok(clip) => VoiceEvent::ClipCaptured(clip),
                        Err(e) => VoiceEvent::CaptureFailed(e.to_string()),
                    }
                }));
            }
            Effect::Transcribe(clip) => {
                let transcriber = self.transcriber.clone();
                self.pending = Some(Box::pin(async move {
                    match transcriber.transcribe(&clip).await {
                        Ok(text) => VoiceEvent::Transcribed(text),
                        Err(e) => VoiceEvent::TranscriptionFailed(e.to_string()),
                    }
                }));
            }
            Effect::SendMessage(text) => {
                self.session.push_user(text);
                let request = self.session.chat_request();
                let backend = self.backend.clone();
                self.pending = Some(Box::pin(async move {
                    match backend.chat(&request).await {
                        Ok(response) => VoiceEvent::ReplyReceived(response.message),
                        Err(e) => VoiceEvent::ReplyFailed(e.to_string()),
                    }
                }));
            }
            Effect::AppendReply(reply) => self.session.push_assistant(reply),
            Effect::AppendApology => self.session.push_assistant(APOLOGY_REPLY),
            Effect::Synthesize(text) => {
                let backend = self.backend.clone();
                let character = self.session.character.clone();
                self.pending = Some(Box::pin(async move {
                    match backend.synthesize(&text, character.as_ref()).await {
                        Ok(audio) => VoiceEvent::AudioReady(audio),
                        Err(e) => VoiceEvent::SynthesisFailed(e.to_string()),
                    }
                }));
            }
            Effect::Play(audio) => {
                let player = self.player.clone();
                self.pending = Some(Box::pin(async move {
                    match player.play(audio).await {
                        Ok(()) => VoiceEvent::PlaybackEnded,
                        Err(e) => VoiceEvent::PlaybackFailed(e.to_string()),
                    }
                }));
            }
            Effect::ScheduleRearm(delay) => {
                self.pending = Some(Box::pin(async move {
                    tokio::time::sleep(delay).await;
                    VoiceEvent::RearmElapsed
                }));
            }
            Effect::FillInput(text) => self.session.input_text = text,
            Effect::Notify(msg) => self.notice = Some(msg),
            Effect::CancelPending => self.pending = None,
            Effect::DiscardRecording => self.microphone.discard_recording().await,
            Effect::HaltPlayback => self.player.halt(),
            Effect::ReleaseMicrophone => self.microphone.release(),
        }
    }
}

/// Handle to a spawned [`VoiceLoop`].
pub struct VoiceLoopHandle {
    commands: mpsc::Sender<VoiceCommand>,
    snapshots: watch::Receiver<VoiceSnapshot>,
    task: JoinHandle<SessionState>,
}

impl VoiceLoopHandle {
    pub fn spawn(voice_loop: VoiceLoop) -> Self {
        let (commands, rx) = mpsc::channel(16);
        let (tx, snapshots) = watch::channel(voice_loop.snapshot());
        let task = tokio::spawn(voice_loop.run(rx, tx));
        Self {
            commands,
            snapshots,
            task,
        }
    }

    pub async fn send(&self, command: VoiceCommand) -> Result<(), ClientError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ClientError::LoopClosed)
    }

    pub async fn start(&self, mode: TurnMode) -> Result<(), ClientError> {
        self.send(VoiceCommand::Start(mode)).await
    }

    pub async fn finish(&self) -> Result<(), ClientError> {
        self.send(VoiceCommand::Finish).await
    }

    pub async fn stop(&self) -> Result<(), ClientError> {
        self.send(VoiceCommand::Stop).await
    }

    pub fn snapshot(&self) -> VoiceSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<VoiceSnapshot> {
        self.snapshots.clone()
    }

    /// Closes the loop and returns the final session state.
    pub async fn shutdown(self) -> Result<SessionState, ClientError> {
        drop(self.commands);
        self.task.await.map_err(|_| ClientError::LoopClosed)
    }
}
