/// Sound engine: procedural retro sound effects via rodio.
///
/// Both cues are generated as in-memory WAV buffers at init time and
/// played fire-and-forget through detached sinks. Failures are logged and
/// dropped; the game never waits on audio.
///
/// Compile without the "sound" feature to disable audio entirely (the stub
/// SoundEngine does nothing).

use crate::config::SoundConfig;
use crate::sim::session::SoundSink;

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
const SAMPLE_RATE: u32 = 22050;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use log::{info, warn};
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{gen_eat, gen_game_over, make_wav};
    use crate::config::SoundConfig;
    use crate::sim::session::SoundSink;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_eat: Arc<Vec<u8>>,
        sfx_game_over: Arc<Vec<u8>>,
        eat_volume: f32,
        game_over_volume: f32,
    }

    impl SoundEngine {
        /// `None` when sound is disabled or no output device is available.
        pub fn new(cfg: &SoundConfig) -> Option<Self> {
            if !cfg.enabled {
                info!("sound disabled by config");
                return None;
            }
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("no audio output device: {e}");
                    return None;
                }
            };
            info!("audio output ready");

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_eat: Arc::new(make_wav(&gen_eat())),
                sfx_game_over: Arc::new(make_wav(&gen_game_over())),
                eat_volume: cfg.eat_volume,
                game_over_volume: cfg.game_over_volume,
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>, volume: f32) {
            let sink = match Sink::try_new(&self.handle) {
                Ok(s) => s,
                Err(e) => {
                    warn!("sound playback failed: {e}");
                    return;
                }
            };
            let cursor = Cursor::new(buf.as_ref().clone());
            match rodio::Decoder::new(cursor) {
                Ok(src) => {
                    sink.set_volume(volume);
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
                Err(e) => warn!("sound decode failed: {e}"),
            }
        }
    }

    impl SoundSink for SoundEngine {
        fn play_eat_sound(&self) {
            self.play(&self.sfx_eat, self.eat_volume);
        }

        fn play_game_over_sound(&self) {
            self.play(&self.sfx_game_over, self.game_over_volume);
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Waveform generators — mono f32 samples in [-1, 1]
// ════════════════════════════════════════════════════════════

/// Eat: short rising square-ish chirp, 400 Hz → 900 Hz.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_eat() -> Vec<f32> {
    let duration = 0.08;
    let n = (SAMPLE_RATE as f32 * duration) as usize;
    let mut phase = 0.0_f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            let freq = 400.0 + t * 500.0;
            phase += freq / SAMPLE_RATE as f32;
            let wave = (phase * 2.0 * std::f32::consts::PI).sin() * 0.7
                + (phase * 3.0 * 2.0 * std::f32::consts::PI).sin() * 0.3;
            let env = (1.0 - t).powf(0.5);
            wave * env * 0.6
        })
        .collect()
}

/// Game over: three falling notes with a fade on the last.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn gen_game_over() -> Vec<f32> {
    let notes = [392.0_f32, 311.0, 196.0]; // G4 → Eb4 → G3
    let note_dur = 0.16;
    let mut samples = Vec::new();
    for &freq in &notes {
        let n = (SAMPLE_RATE as f32 * note_dur) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32) * 0.3;
            // Clipped sine for a hollow, buzzy tone
            let wave = ((t * freq * 2.0 * std::f32::consts::PI).sin() * 1.6).clamp(-1.0, 1.0);
            samples.push(wave * env * 0.5);
        }
    }
    let total = samples.len();
    let fade_len = total / 3;
    for (k, s) in samples[total - fade_len..].iter_mut().enumerate() {
        *s *= 1.0 - k as f32 / fade_len as f32;
    }
    samples
}

// ════════════════════════════════════════════════════════════
//  WAV encoder — wraps f32 samples into a 16-bit PCM WAV buffer
// ════════════════════════════════════════════════════════════

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn make_wav(samples: &[f32]) -> Vec<u8> {
    let num_channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
    let block_align = num_channels * bits_per_sample / 8;
    let data_size = samples.len() as u32 * 2;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&num_channels.to_le_bytes());
    buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &s in samples {
        let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
        buf.extend_from_slice(&val.to_le_bytes());
    }
    buf
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to a no-op when the sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new(_cfg: &SoundConfig) -> Option<Self> {
        None
    }
}

#[cfg(not(feature = "sound"))]
impl SoundSink for SoundEngine {
    fn play_eat_sound(&self) {}
    fn play_game_over_sound(&self) {}
}

/// Whatever sink the host ended up with: the real engine or silence.
pub fn open_sink(cfg: &SoundConfig) -> Box<dyn SoundSink> {
    match SoundEngine::new(cfg) {
        Some(engine) => Box::new(engine),
        None => Box::new(crate::sim::session::Silent),
    }
}
