//! Sound cues
//!
//! The simulation only says *what* happened (`GameEvent`); this module maps
//! that to fire-and-forget cues. On the web the cues are synthesized with the
//! Web Audio API - no external files needed.

use crate::sim::GameEvent;

/// Discrete sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Target lane moved
    LaneChanged,
    /// Menu/overlay control accepted
    UiClick,
    /// Run ended in a collision
    Crashed,
}

impl AudioCue {
    /// Cue for an engine event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::LaneChanged { .. } => Some(AudioCue::LaneChanged),
            GameEvent::UiClick => Some(AudioCue::UiClick),
            GameEvent::Crashed { .. } => Some(AudioCue::Crashed),
            GameEvent::PhaseChanged { .. } => None,
        }
    }
}

/// Consumer of cues; must never affect the simulation
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
    fn set_enabled(&mut self, enabled: bool);

    /// Acquire the output device. Browsers only allow this from inside a
    /// user gesture handler, so hosts call it from their input listeners.
    fn unlock(&mut self) {}
}

/// Forward every cue-bearing event to a sink
pub fn play_events<'a>(sink: &mut dyn AudioSink, events: impl IntoIterator<Item = &'a GameEvent>) {
    for cue in events.into_iter().filter_map(AudioCue::for_event) {
        sink.play(cue);
    }
}

/// Switch cues on or off; switching on confirms with a click
pub fn set_sfx_enabled(sink: &mut dyn AudioSink, enabled: bool) {
    sink.set_enabled(enabled);
    if enabled {
        sink.unlock();
        sink.play(AudioCue::UiClick);
    }
}

/// Silent sink that remembers what it was asked to play
#[derive(Debug, Clone, Default)]
pub struct CueLog {
    pub enabled: bool,
    pub unlocked: bool,
    pub played: Vec<AudioCue>,
}

impl CueLog {
    pub fn new() -> Self {
        Self {
            enabled: true,
            unlocked: false,
            played: Vec::new(),
        }
    }
}

impl AudioSink for CueLog {
    fn play(&mut self, cue: AudioCue) {
        if self.enabled {
            self.played.push(cue);
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn unlock(&mut self) {
        self.unlocked = true;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorType};

    use super::{AudioCue, AudioSink};

    /// Oscillator beeps routed through one master gain
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master: Option<GainNode>,
        volume: f32,
        enabled: bool,
    }

    impl WebAudio {
        pub fn new(volume: f32, enabled: bool) -> Self {
            Self {
                ctx: None,
                master: None,
                volume: volume.clamp(0.0, 1.0),
                enabled,
            }
        }

        fn level(&self) -> f32 {
            if self.enabled { self.volume } else { 0.0 }
        }

        /// Create the context lazily (browsers require a user gesture first)
        fn ensure(&mut self) -> Option<(&AudioContext, &GainNode)> {
            if self.ctx.is_none() {
                let ctx = AudioContext::new().ok();
                if ctx.is_none() {
                    log::warn!("Failed to create AudioContext - audio disabled");
                }
                let level = self.level();
                self.master = ctx.as_ref().and_then(|ctx| {
                    let gain = ctx.create_gain().ok()?;
                    gain.gain().set_value(level);
                    gain.connect_with_audio_node(&ctx.destination()).ok()?;
                    Some(gain)
                });
                self.ctx = ctx;
            }
            let ctx = self.ctx.as_ref()?;
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Some((ctx, self.master.as_ref()?))
        }

        /// Short enveloped tone starting `delay` seconds from now
        fn beep(
            ctx: &AudioContext,
            master: &GainNode,
            freq: f32,
            dur: f64,
            osc_type: OscillatorType,
            vol: f32,
            delay: f64,
        ) -> Option<()> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            let t0 = ctx.current_time() + delay;

            osc.set_type(osc_type);
            osc.frequency().set_value_at_time(freq, t0).ok()?;
            gain.gain().set_value_at_time(0.0001, t0).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.18 * vol, t0 + 0.01)
                .ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.0001, t0 + dur)
                .ok()?;

            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(master).ok()?;
            osc.start_with_when(t0).ok()?;
            osc.stop_with_when(t0 + dur + 0.02).ok()?;
            Some(())
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: AudioCue) {
            if !self.enabled {
                return;
            }
            let Some((ctx, master)) = self.ensure() else {
                return;
            };
            match cue {
                AudioCue::LaneChanged => {
                    Self::beep(ctx, master, 520.0, 0.05, OscillatorType::Triangle, 0.8, 0.0);
                }
                AudioCue::UiClick => {
                    Self::beep(ctx, master, 660.0, 0.04, OscillatorType::Square, 0.25, 0.0);
                }
                AudioCue::Crashed => {
                    Self::beep(ctx, master, 120.0, 0.18, OscillatorType::Sawtooth, 1.0, 0.0);
                    Self::beep(ctx, master, 90.0, 0.20, OscillatorType::Sawtooth, 0.9, 0.06);
                }
            }
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
            if let Some(master) = &self.master {
                master.gain().set_value(self.level());
            }
        }

        fn unlock(&mut self) {
            if self.ensure().is_none() {
                log::debug!("Audio output not available yet");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    #[test]
    fn test_event_mapping() {
        let events = [
            GameEvent::UiClick,
            GameEvent::PhaseChanged {
                from: GamePhase::Menu,
                to: GamePhase::Running,
            },
            GameEvent::LaneChanged { lane: 2 },
            GameEvent::Crashed {
                score: 10,
                new_best: true,
            },
        ];
        let mut log = CueLog::new();
        play_events(&mut log, &events);
        assert_eq!(
            log.played,
            vec![AudioCue::UiClick, AudioCue::LaneChanged, AudioCue::Crashed]
        );
    }

    #[test]
    fn test_enabling_sfx_clicks() {
        let mut log = CueLog::new();
        set_sfx_enabled(&mut log, false);
        assert!(!log.enabled);
        assert!(log.played.is_empty());

        set_sfx_enabled(&mut log, true);
        assert!(log.enabled);
        assert!(log.unlocked);
        assert_eq!(log.played, vec![AudioCue::UiClick]);
    }

    #[test]
    fn test_disabled_sink_is_silent() {
        let mut log = CueLog::new();
        log.set_enabled(false);
        log.play(AudioCue::Crashed);
        assert!(log.played.is_empty());
    }
}
