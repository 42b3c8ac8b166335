//! Audio cues
//!
//! Procedurally generated sound effects - no external files needed!
//!
//! The simulation never makes a sound itself: the game shell turns events into [`Cue`]s
//! and hands them to an [`AudioSink`]. On the web [`AudioManager`] renders them with the
//! Web Audio API; native builds only log them.

use std::fmt;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;
#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;

/// Failure reported by an audio or haptics backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    /// The backend does not exist here (no AudioContext, no vibration API)
    Unavailable(&'static str),
    /// The backend refused the request
    Rejected(String),
}

impl fmt::Display for FeedbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackError::Unavailable(what) => write!(f, "{what} is not available"),
            FeedbackError::Rejected(reason) => write!(f, "request rejected: {reason}"),
        }
    }
}

impl std::error::Error for FeedbackError {}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Player launched
    Jump,
    /// Player touched down on a platform
    Land,
    /// Points for advancing
    Score,
    /// Pickup collected
    PowerUp,
    /// Player hit the water
    Splash,
    GameOver,
    /// Best score beaten
    NewBest,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

/// A single oscillator voice of a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub wave: Waveform,
    pub freq: f32,
    /// Frequency at the end of the note (equal to `freq` for a flat tone)
    pub sweep_to: f32,
    /// Offset from the start of the cue, seconds
    pub delay: f64,
    pub duration: f64,
    /// Peak gain before volume scaling
    pub gain: f32,
}

impl Voice {
    const fn sweep(wave: Waveform, freq: f32, sweep_to: f32, duration: f64, gain: f32) -> Self {
        Self {
            wave,
            freq,
            sweep_to,
            delay: 0.0,
            duration,
            gain,
        }
    }
}

fn arpeggio(wave: Waveform, freqs: &[f32], spacing: f64, duration: f64, gain: f32) -> Vec<Voice> {
    freqs
        .iter()
        .enumerate()
        .map(|(i, &freq)| Voice {
            wave,
            freq,
            sweep_to: freq,
            delay: i as f64 * spacing,
            duration,
            gain,
        })
        .collect()
}

impl Cue {
    /// Voices that make up this cue
    pub fn voices(&self) -> Vec<Voice> {
        match self {
            // whoosh up
            Cue::Jump => vec![Voice::sweep(Waveform::Triangle, 200.0, 600.0, 0.25, 0.3)],
            // solid thump
            Cue::Land => vec![Voice::sweep(Waveform::Sine, 150.0, 60.0, 0.15, 0.6)],
            Cue::Score => arpeggio(Waveform::Sine, &[600.0, 800.0, 1000.0], 0.08, 0.2, 0.25),
            Cue::PowerUp => {
                arpeggio(Waveform::Triangle, &[400.0, 500.0, 600.0, 800.0], 0.1, 0.5, 0.3)
            }
            Cue::Splash => vec![Voice::sweep(Waveform::Sine, 300.0, 20.0, 1.0, 0.4)],
            Cue::GameOver => arpeggio(Waveform::Sine, &[400.0, 350.0, 300.0, 200.0], 0.2, 0.4, 0.3),
            Cue::NewBest => arpeggio(
                Waveform::Triangle,
                &[500.0, 600.0, 700.0, 800.0, 1000.0],
                0.08,
                0.3,
                0.25,
            ),
        }
    }
}

/// Anything that can play cues
pub trait AudioSink {
    fn play(&mut self, cue: Cue) -> Result<(), FeedbackError>;

    /// Pick up volume and mute preferences
    fn apply_settings(&mut self, _settings: &Settings) {}
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        let ctx = {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            ctx
        };
        Self {
            #[cfg(target_arch = "wasm32")]
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn render(&self, cue: Cue, vol: f32) -> Result<(), FeedbackError> {
        let ctx = self
            .ctx
            .as_ref()
            .ok_or(FeedbackError::Unavailable("AudioContext"))?;

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        for voice in cue.voices() {
            let (osc, gain) = create_osc(ctx, voice.freq, voice.wave)?;
            let t = ctx.current_time() + voice.delay;
            let end = t + voice.duration;

            gain.gain()
                .set_value_at_time(vol * voice.gain, t)
                .map_err(js_error)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, end)
                .map_err(js_error)?;
            if voice.sweep_to != voice.freq {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(voice.sweep_to, end)
                    .map_err(js_error)?;
            }

            osc.start_with_when(t).map_err(js_error)?;
            osc.stop_with_when(end + 0.05).map_err(js_error)?;
        }
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn render(&self, cue: Cue, vol: f32) -> Result<(), FeedbackError> {
        log::trace!("cue {:?} ({} voices) at volume {:.2}", cue, cue.voices().len(), vol);
        Ok(())
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, cue: Cue) -> Result<(), FeedbackError> {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return Ok(());
        }
        self.render(cue, vol)
    }

    fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(!settings.sound);
    }
}

/// Create an oscillator routed through a gain node to the speakers
#[cfg(target_arch = "wasm32")]
fn create_osc(
    ctx: &AudioContext,
    freq: f32,
    wave: Waveform,
) -> Result<(OscillatorNode, GainNode), FeedbackError> {
    let osc = ctx.create_oscillator().map_err(js_error)?;
    let gain = ctx.create_gain().map_err(js_error)?;

    osc.set_type(match wave {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Triangle => OscillatorType::Triangle,
    });
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).map_err(js_error)?;
    gain.connect_with_audio_node(&ctx.destination())
        .map_err(js_error)?;

    Ok((osc, gain))
}

#[cfg(target_arch = "wasm32")]
fn js_error(err: JsValue) -> FeedbackError {
    FeedbackError::Rejected(format!("{err:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_cue_has_audible_voices() {
        let cues = [
            Cue::Jump,
            Cue::Land,
            Cue::Score,
            Cue::PowerUp,
            Cue::Splash,
            Cue::GameOver,
            Cue::NewBest,
        ];
        for cue in cues {
            let voices = cue.voices();
            assert!(!voices.is_empty(), "{cue:?}");
            for v in voices {
                assert!(v.freq > 0.0 && v.sweep_to > 0.0);
                assert!(v.duration > 0.0);
                assert!(v.gain > 0.0 && v.gain <= 1.0);
            }
        }
    }

    #[test]
    fn test_arpeggio_spacing() {
        let voices = Cue::GameOver.voices();
        assert_eq!(voices.len(), 4);
        assert!((voices[3].delay - 0.6).abs() < 1e-9);
        assert_eq!(voices[3].freq, 200.0);
    }

    #[test]
    fn test_settings_drive_volume() {
        let mut audio = AudioManager::new();
        let mut settings = Settings::default();
        settings.master_volume = 0.5;
        settings.sfx_volume = 0.5;
        audio.apply_settings(&settings);
        assert!((audio.effective_volume() - 0.25).abs() < 1e-6);

        settings.sound = false;
        audio.apply_settings(&settings);
        assert_eq!(audio.effective_volume(), 0.0);
        assert!(audio.play(Cue::Jump).is_ok());
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut audio = AudioManager::new();
        audio.set_master_volume(3.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);
    }
}
