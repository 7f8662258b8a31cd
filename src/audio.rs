//! Sound cues, procedurally synthesized - no external files needed
//!
//! The simulation reports what happened; mapping those events onto cues and
//! playing them is the frame driver's job. `SoundSink` is the seam: the
//! shipped `Synth` renders each cue from oscillator voices and plays it
//! through the default output device, `DebugSink` only logs for tests and
//! headless runs.

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle};

use crate::sim::GameEvent;

const SAMPLE_RATE: u32 = 44_100;

/// Every distinct sound the game plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Wing,
    Point,
    Hit,
    Die,
    Swoosh,
}

/// Output end of the audio path
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue);
}

/// Sink that only logs, for headless runs and tests
#[derive(Debug, Default)]
pub struct DebugSink;

impl SoundSink for DebugSink {
    fn play(&mut self, cue: SoundCue) {
        log::debug!("cue: {cue:?}");
    }
}

/// Default sink: renders each cue and fires it at the output device
pub struct Synth {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    volume: f32,
}

impl Synth {
    /// Open the default output device; `None` (with a warning) when the
    /// platform has no usable audio
    pub fn open() -> Option<Self> {
        match OutputStream::try_default() {
            Ok((stream, handle)) => Some(Self {
                _stream: stream,
                handle,
                volume: 0.8,
            }),
            Err(err) => {
                log::warn!("no audio output, sound disabled: {err}");
                None
            }
        }
    }
}

impl SoundSink for Synth {
    fn play(&mut self, cue: SoundCue) {
        let samples = render_cue(cue, self.volume);
        let source = SamplesBuffer::new(1, SAMPLE_RATE, samples);
        if let Err(err) = self.handle.play_raw(source) {
            log::debug!("cue {cue:?} dropped: {err}");
        }
    }
}

/// Cue for a simulation event, if it has one
pub fn cue_for(event: &GameEvent) -> Option<SoundCue> {
    match event {
        GameEvent::Wing => Some(SoundCue::Wing),
        GameEvent::Point => Some(SoundCue::Point),
        GameEvent::Hit => Some(SoundCue::Hit),
        GameEvent::Die => Some(SoundCue::Die),
        GameEvent::Swoosh => Some(SoundCue::Swoosh),
        GameEvent::NewBest(_) => None,
    }
}

// === Sound generators ===

#[derive(Debug, Clone, Copy)]
enum Wave {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

/// One oscillator with a pitch glide and a gain envelope: linear attack to
/// `peak`, then exponential decay to near silence at `duration`.
#[derive(Debug, Clone, Copy)]
struct Voice {
    wave: Wave,
    start_freq: f32,
    end_freq: f32,
    peak: f32,
    attack: f32,
    duration: f32,
}

/// Render a cue to mono samples at `SAMPLE_RATE`
fn render_cue(cue: SoundCue, volume: f32) -> Vec<f32> {
    let voices: &[Voice] = match cue {
        // Quick rising whoosh
        SoundCue::Wing => &[Voice {
            wave: Wave::Triangle,
            start_freq: 200.0,
            end_freq: 600.0,
            peak: 0.3,
            attack: 0.005,
            duration: 0.15,
        }],
        // Happy two-note ding
        SoundCue::Point => &[
            Voice {
                wave: Wave::Sine,
                start_freq: 800.0,
                end_freq: 800.0,
                peak: 0.25,
                attack: 0.005,
                duration: 0.12,
            },
            Voice {
                wave: Wave::Sine,
                start_freq: 1000.0,
                end_freq: 1000.0,
                peak: 0.25,
                attack: 0.09,
                duration: 0.22,
            },
        ],
        // Solid thump with a high crack on top
        SoundCue::Hit => &[
            Voice {
                wave: Wave::Sine,
                start_freq: 150.0,
                end_freq: 60.0,
                peak: 0.6,
                attack: 0.002,
                duration: 0.15,
            },
            Voice {
                wave: Wave::Square,
                start_freq: 1500.0,
                end_freq: 1500.0,
                peak: 0.15,
                attack: 0.002,
                duration: 0.06,
            },
        ],
        // Ominous descend
        SoundCue::Die => &[Voice {
            wave: Wave::Sawtooth,
            start_freq: 300.0,
            end_freq: 40.0,
            peak: 0.4,
            attack: 0.01,
            duration: 0.5,
        }],
        // Soft swept whoosh
        SoundCue::Swoosh => &[Voice {
            wave: Wave::Sine,
            start_freq: 600.0,
            end_freq: 200.0,
            peak: 0.3,
            attack: 0.1,
            duration: 0.4,
        }],
    };
    mix(voices, volume)
}

fn mix(voices: &[Voice], volume: f32) -> Vec<f32> {
    let longest = voices.iter().map(|v| v.duration).fold(0.0, f32::max);
    let len = (longest * SAMPLE_RATE as f32).ceil() as usize;
    let mut out = vec![0.0f32; len];
    for voice in voices {
        render_into(&mut out, voice, volume);
    }
    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }
    out
}

fn render_into(out: &mut [f32], voice: &Voice, volume: f32) {
    let dt = 1.0 / SAMPLE_RATE as f32;
    let mut phase = 0.0f32;
    let samples = ((voice.duration * SAMPLE_RATE as f32) as usize).min(out.len());
    for (i, slot) in out.iter_mut().take(samples).enumerate() {
        let t = i as f32 * dt;
        // Exponential pitch glide, like a ramp between the two endpoints
        let frac = t / voice.duration;
        let freq = voice.start_freq * (voice.end_freq / voice.start_freq).powf(frac);
        phase = (phase + freq * dt).fract();
        let amp = envelope(t, voice) * volume;
        *slot += oscillate(voice.wave, phase) * amp;
    }
}

fn envelope(t: f32, voice: &Voice) -> f32 {
    if t < voice.attack {
        voice.peak * t / voice.attack
    } else {
        // decay to 1% of peak at the end of the voice
        let frac = (t - voice.attack) / (voice.duration - voice.attack);
        voice.peak * 0.01f32.powf(frac)
    }
}

fn oscillate(wave: Wave, phase: f32) -> f32 {
    match wave {
        Wave::Sine => (phase * std::f32::consts::TAU).sin(),
        Wave::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
        Wave::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Wave::Sawtooth => 2.0 * phase - 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_audible_event_maps_to_a_cue() {
        assert_eq!(cue_for(&GameEvent::Wing), Some(SoundCue::Wing));
        assert_eq!(cue_for(&GameEvent::Point), Some(SoundCue::Point));
        assert_eq!(cue_for(&GameEvent::Hit), Some(SoundCue::Hit));
        assert_eq!(cue_for(&GameEvent::Die), Some(SoundCue::Die));
        assert_eq!(cue_for(&GameEvent::Swoosh), Some(SoundCue::Swoosh));
    }

    #[test]
    fn best_score_updates_are_silent() {
        assert_eq!(cue_for(&GameEvent::NewBest(12)), None);
    }

    #[test]
    fn every_cue_renders_bounded_audio() {
        for cue in [
            SoundCue::Wing,
            SoundCue::Point,
            SoundCue::Hit,
            SoundCue::Die,
            SoundCue::Swoosh,
        ] {
            let samples = render_cue(cue, 0.8);
            assert!(!samples.is_empty(), "{cue:?} rendered nothing");
            assert!(
                samples.iter().all(|s| s.abs() <= 1.0),
                "{cue:?} clips past full scale"
            );
            assert!(
                samples.iter().any(|s| s.abs() > 0.01),
                "{cue:?} is silent"
            );
        }
    }

    #[test]
    fn envelope_decays_to_near_silence() {
        let samples = render_cue(SoundCue::Hit, 0.8);
        let head = samples[..1000].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let tail_start = samples.len() - 100;
        let tail = samples[tail_start..]
            .iter()
            .fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(tail < head / 10.0, "tail {tail} vs head {head}");
    }

    #[test]
    fn die_outlasts_the_wing_flap() {
        assert!(render_cue(SoundCue::Die, 0.8).len() > render_cue(SoundCue::Wing, 0.8).len());
    }
}
