//! The voice-turn state machine.
//!
//! [`VoiceTurnMachine`] is pure: it consumes [`VoiceEvent`]s and answers with
//! the [`Effect`]s the driver must perform. It owns no devices and no timers,
//! which keeps every transition testable without audio hardware.
//!
//! A continuous turn runs
//! `Recording -> Finalizing -> Transcribing -> AwaitingReply -> Synthesizing
//! -> Playing -> WaitingToRearm -> Recording`. Short clips, short
//! transcripts, and failures skip straight to `WaitingToRearm`. A one-shot
//! capture ends after transcription by filling the input box.

use crate::ports::AudioClip;
use serde::Serialize;
use std::time::Duration;

/// Hard upper bound on one recording.
pub const RECORDING_CEILING: Duration = Duration::from_secs(5);

/// Clips smaller than this are treated as silence.
pub const MIN_CLIP_BYTES: usize = 101;

/// Transcripts shorter than this (after trimming) are ignored.
pub const MIN_TRANSCRIPT_CHARS: usize = 3;

/// Delay before recording again after playback, a failure, or a silent clip.
pub const REARM_DELAY: Duration = Duration::from_millis(500);

/// Delay before recording again after an empty or short transcript.
pub const QUICK_REARM_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnMode {
    /// Loop record, reply, play until stopped.
    Continuous,
    /// Record once and place the transcript in the input box.
    OneShot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoicePhase {
    #[default]
    Idle,
    Recording,
    Finalizing,
    Transcribing,
    AwaitingReply,
    Synthesizing,
    Playing,
    WaitingToRearm,
}

impl VoicePhase {
    pub fn is_recording(self) -> bool {
        matches!(self, Self::Recording | Self::Finalizing)
    }

    pub fn is_processing(self) -> bool {
        matches!(
            self,
            Self::Transcribing | Self::AwaitingReply | Self::Synthesizing
        )
    }

    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VoiceEvent {
    Start(TurnMode),
    /// The capture device could not be opened.
    MicrophoneFailed(String),
    RecordingFailed(String),
    CeilingReached,
    /// The user asked to end the current recording.
    FinishRequested,
    ClipCaptured(AudioClip),
    CaptureFailed(String),
    Transcribed(String),
    TranscriptionFailed(String),
    ReplyReceived(String),
    ReplyFailed(String),
    AudioReady(Vec<u8>),
    SynthesisFailed(String),
    PlaybackEnded,
    PlaybackFailed(String),
    RearmElapsed,
    Stop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Acquire the microphone if needed, record, and report
    /// [`VoiceEvent::CeilingReached`] after `ceiling`.
    StartRecording { ceiling: Duration },
    StopRecording,
    Transcribe(AudioClip),
    /// Append the user turn and request a reply for the whole history.
    SendMessage(String),
    AppendReply(String),
    AppendApology,
    Synthesize(String),
    Play(Vec<u8>),
    ScheduleRearm(Duration),
    FillInput(String),
    Notify(String),
    /// Drop any pending timer or request.
    CancelPending,
    DiscardRecording,
    HaltPlayback,
    ReleaseMicrophone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceTurnMachine {
    phase: VoicePhase,
    mode: TurnMode,
    active: bool,
    #[serde(skip)]
    ceiling: Duration,
}

impl Default for VoiceTurnMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceTurnMachine {
    pub fn new() -> Self {
        Self::with_ceiling(RECORDING_CEILING)
    }

    pub fn with_ceiling(ceiling: Duration) -> Self {
        Self {
            phase: VoicePhase::Idle,
            mode: TurnMode::Continuous,
            active: false,
            ceiling,
        }
    }

    pub fn phase(&self) -> VoicePhase {
        self.phase
    }

    pub fn mode(&self) -> TurnMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Applies `event` and returns the effects to perform, in order.
    ///
    /// Events that do not fit the current phase are stale and produce
    /// nothing. Once stopped, only [`VoiceEvent::Start`] wakes the machine.
    pub fn handle(&mut self, event: VoiceEvent) -> Vec<Effect> {
        if let VoiceEvent::Stop = event {
            return self.teardown(Vec::new());
        }
        if let VoiceEvent::Start(mode) = event {
            if self.active {
                return Vec::new();
            }
            self.active = true;
            self.mode = mode;
            return self.record();
        }
        if !self.active {
            return Vec::new();
        }

        use VoiceEvent as E;
        use VoicePhase as P;
        match (self.phase, event) {
            (P::Recording, E::MicrophoneFailed(msg)) => self.teardown(vec![Effect::Notify(
                format!("Cannot access microphone: {}", msg),
            )]),
            (P::Recording, E::RecordingFailed(msg)) => self.fail(msg),
            (P::Recording, E::CeilingReached | E::FinishRequested) => {
                self.phase = P::Finalizing;
                vec![Effect::CancelPending, Effect::StopRecording]
            }
            (P::Finalizing, E::ClipCaptured(clip)) => {
                if clip.len() < MIN_CLIP_BYTES {
                    self.silence(REARM_DELAY, "No speech was recorded. Please try again.")
                } else {
                    self.phase = P::Transcribing;
                    vec![Effect::Transcribe(clip)]
                }
            }
            (P::Finalizing, E::CaptureFailed(msg)) => self.fail(msg),
            (P::Transcribing, E::Transcribed(text)) => {
                let text = text.trim();
                if text.chars().count() < MIN_TRANSCRIPT_CHARS {
                    return self.silence(
                        QUICK_REARM_DELAY,
                        "Didn't catch that. Please try again.",
                    );
                }
                match self.mode {
                    TurnMode::Continuous => {
                        self.phase = P::AwaitingReply;
                        vec![Effect::SendMessage(text.to_string())]
                    }
                    TurnMode::OneShot => {
                        self.finish();
                        vec![Effect::FillInput(text.to_string()), Effect::ReleaseMicrophone]
                    }
                }
            }
            (P::Transcribing, E::TranscriptionFailed(msg)) => self.fail(msg),
            (P::AwaitingReply, E::ReplyReceived(reply)) => {
                self.phase = P::Synthesizing;
                vec![Effect::AppendReply(reply.clone()), Effect::Synthesize(reply)]
            }
            (P::AwaitingReply, E::ReplyFailed(msg)) => {
                let mut effects = vec![Effect::AppendApology];
                effects.extend(self.fail(msg));
                effects
            }
            (P::Synthesizing, E::AudioReady(audio)) => {
                self.phase = P::Playing;
                vec![Effect::Play(audio)]
            }
            (P::Synthesizing, E::SynthesisFailed(msg)) => self.fail(msg),
            (P::Playing, E::PlaybackEnded) => self.rearm(REARM_DELAY),
            (P::Playing, E::PlaybackFailed(msg)) => self.fail(msg),
            (P::WaitingToRearm, E::RearmElapsed) => self.record(),
            _ => Vec::new(),
        }
    }

    fn record(&mut self) -> Vec<Effect> {
        self.phase = VoicePhase::Recording;
        vec![Effect::StartRecording {
            ceiling: self.ceiling,
        }]
    }

    fn rearm(&mut self, delay: Duration) -> Vec<Effect> {
        self.phase = VoicePhase::WaitingToRearm;
        vec![Effect::ScheduleRearm(delay)]
    }

    /// Nothing usable was heard.
    fn silence(&mut self, delay: Duration, notice: &str) -> Vec<Effect> {
        match self.mode {
            TurnMode::Continuous => self.rearm(delay),
            TurnMode::OneShot => {
                self.finish();
                vec![Effect::Notify(notice.to_string()), Effect::ReleaseMicrophone]
            }
        }
    }

    /// A continuous conversation retries quietly; a one-shot capture reports.
    fn fail(&mut self, msg: String) -> Vec<Effect> {
        match self.mode {
            TurnMode::Continuous => self.rearm(REARM_DELAY),
            TurnMode::OneShot => {
                self.finish();
                vec![Effect::Notify(msg), Effect::ReleaseMicrophone]
            }
        }
    }

    fn finish(&mut self) {
        self.phase = VoicePhase::Idle;
        self.active = false;
    }

    fn teardown(&mut self, mut effects: Vec<Effect>) -> Vec<Effect> {
        self.finish();
        effects.extend([
            Effect::CancelPending,
            Effect::DiscardRecording,
            Effect::HaltPlayback,
            Effect::ReleaseMicrophone,
        ]);
        effects
    }
}
