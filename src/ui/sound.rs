/// Sound effects: procedural chiptune cues played through rodio.
///
/// Every cue is synthesized once at startup into an in-memory WAV buffer.
/// Playback detaches the sink, so a cue never blocks the render loop.
///
/// Build without the "sound" feature to get a silent stub `SoundEngine`
/// with the same API.

use std::f32::consts::TAU;

use crate::sim::event::GameEvent;

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
const SAMPLE_RATE: u32 = 22050;

/// One cue per kind of game event worth hearing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sfx {
    Bean,
    Heart,
    LifeLost,
    Win,
    Lose,
}

impl Sfx {
    #[cfg_attr(not(feature = "sound"), allow(dead_code))]
    const ALL: [Sfx; 5] = [Sfx::Bean, Sfx::Heart, Sfx::LifeLost, Sfx::Win, Sfx::Lose];

    /// Ghost moves are silent; everything else has a cue.
    pub fn for_event(event: &GameEvent) -> Option<Sfx> {
        match event {
            GameEvent::BeanCollected { .. } => Some(Sfx::Bean),
            GameEvent::HeartCollected { .. } => Some(Sfx::Heart),
            GameEvent::LifeLost { remaining } if *remaining > 0 => Some(Sfx::LifeLost),
            GameEvent::Won => Some(Sfx::Win),
            GameEvent::Lost => Some(Sfx::Lose),
            GameEvent::LifeLost { .. } | GameEvent::GhostMoved { .. } => None,
        }
    }
}

// ── Synthesis ──

/// A run of notes: (frequency Hz, seconds). Each note decays linearly
/// toward `1 - decay` of its starting amplitude.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn notes(seq: &[(f32, f32)], harmonics: &[f32], decay: f32, volume: f32) -> Vec<f32> {
    let mut out = Vec::new();
    for &(freq, secs) in seq {
        let n = (SAMPLE_RATE as f32 * secs) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32) * decay;
            let wave: f32 = harmonics.iter()
                .enumerate()
                .map(|(k, amp)| (t * freq * (k + 1) as f32 * TAU).sin() * amp)
                .sum();
            out.push(wave * env * volume);
        }
    }
    out
}

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn synth(sfx: Sfx) -> Vec<f32> {
    match sfx {
        // Two quick notes, low then high
        Sfx::Bean => notes(&[(494.0, 0.03), (740.0, 0.03)], &[0.7, 0.0, 0.3], 1.0, 0.2),
        Sfx::Heart => notes(&[(784.0, 0.06), (988.0, 0.06), (1319.0, 0.14)], &[0.7, 0.3], 0.8, 0.25),
        Sfx::LifeLost => {
            // Falling sweep 700Hz → 150Hz
            let n = (SAMPLE_RATE as f32 * 0.4) as usize;
            let mut phase = 0.0_f32;
            (0..n)
                .map(|i| {
                    let p = i as f32 / n as f32;
                    phase += (700.0 - p * 550.0) / SAMPLE_RATE as f32;
                    (phase * TAU).sin() * (1.0 - p).powf(0.7) * 0.3
                })
                .collect()
        }
        Sfx::Win => {
            let mut s = notes(
                &[(523.0, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.1)],
                &[0.6, 0.3, 0.1], 0.3, 0.3,
            );
            s.extend(notes(&[(1047.0, 0.3)], &[1.0], 1.0, 0.3));
            s
        }
        Sfx::Lose => notes(&[(392.0, 0.18), (330.0, 0.18), (262.0, 0.18), (196.0, 0.4)], &[1.0], 0.5, 0.3),
    }
}

/// Wrap mono f32 samples in a 16-bit PCM WAV container.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn encode_wav(samples: &[f32]) -> Vec<u8> {
    const CHANNELS: u16 = 1;
    const BITS: u16 = 16;
    let data_len = samples.len() as u32 * (BITS / 8) as u32;

    let mut buf = Vec::with_capacity(44 + data_len as usize);
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_len).to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&CHANNELS.to_le_bytes());
    buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    buf.extend_from_slice(&(SAMPLE_RATE * CHANNELS as u32 * BITS as u32 / 8).to_le_bytes());
    buf.extend_from_slice(&(CHANNELS * BITS / 8).to_le_bytes());
    buf.extend_from_slice(&BITS.to_le_bytes());

    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_len.to_le_bytes());
    for &s in samples {
        buf.extend_from_slice(&((s.clamp(-1.0, 1.0) * 32767.0) as i16).to_le_bytes());
    }
    buf
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use tracing::debug;

    use super::{encode_wav, synth, Sfx};

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        cues: Vec<Vec<u8>>, // indexed by `Sfx as usize`
    }

    impl SoundEngine {
        /// None when no audio device is available.
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    debug!("no audio output: {e}");
                    return None;
                }
            };
            let cues = Sfx::ALL.iter()
                .map(|&s| encode_wav(&synth(s)))
                .collect();
            Some(SoundEngine { _stream: stream, handle, cues })
        }

        pub fn play(&self, sfx: Sfx) {
            let Some(buf) = self.cues.get(sfx as usize) else { return };
            if let Ok(sink) = Sink::try_new(&self.handle) {
                if let Ok(src) = Decoder::new(Cursor::new(buf.clone())) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }
    }
}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _sfx: Sfx) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_map_to_cues() {
        assert_eq!(Sfx::for_event(&GameEvent::BeanCollected { x: 1, y: 1 }), Some(Sfx::Bean));
        assert_eq!(Sfx::for_event(&GameEvent::LifeLost { remaining: 2 }), Some(Sfx::LifeLost));
        // The final life is covered by the Lost cue.
        assert_eq!(Sfx::for_event(&GameEvent::LifeLost { remaining: 0 }), None);
        assert_eq!(Sfx::for_event(&GameEvent::GhostMoved { id: 0, x: 1, y: 1 }), None);
    }

    #[test]
    fn wav_header_matches_payload() {
        let samples = synth(Sfx::Bean);
        let wav = encode_wav(&samples);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(wav.len(), 44 + samples.len() * 2);
        let data_len = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
        assert_eq!(data_len as usize, samples.len() * 2);
    }

    #[test]
    fn every_cue_is_audible_and_in_range() {
        for sfx in Sfx::ALL {
            let s = synth(sfx);
            assert!(!s.is_empty(), "{sfx:?} is empty");
            assert!(s.iter().all(|v| v.abs() <= 1.0), "{sfx:?} clips");
        }
    }
}
