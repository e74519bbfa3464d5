//! Sound engine: procedural 8-bit style sound effects via rodio.
//!
//! All sounds are generated as in-memory WAV buffers at init time.
//! Playback is fire-and-forget (non-blocking) via rodio's Sink.
//!
//! Build with the "sound" feature to enable audio; without it the stub
//! SoundEngine does nothing.

use crate::sim::event::GameEvent;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use log::warn;
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::PI * 2.0;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_encounter: Arc<Vec<u8>>,
        sfx_resume: Arc<Vec<u8>>,
        sfx_bump: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("audio output unavailable: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_encounter: Arc::new(make_wav(&gen_encounter())),
                sfx_resume: Arc::new(make_wav(&gen_resume())),
                sfx_bump: Arc::new(make_wav(&gen_bump())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_encounter(&self) { self.play(&self.sfx_encounter); }
        pub fn play_resume(&self) { self.play(&self.sfx_resume); }
        pub fn play_bump(&self) { self.play(&self.sfx_bump); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    fn tone(freq: f32, duration: f32, volume: f32, samples: &mut Vec<f32>) {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32) * 0.4;
            // Sine + 3rd harmonic for a square-ish retro edge
            let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 3.0 * TAU).sin() * 0.3;
            samples.push(wave * env * volume);
        }
    }

    /// Encounter: alarm-like alternating minor second, rising
    fn gen_encounter() -> Vec<f32> {
        let notes = [440.0_f32, 466.0, 523.0, 554.0, 659.0];
        let mut samples = Vec::new();
        for &freq in &notes {
            tone(freq, 0.07, 0.3, &mut samples);
        }
        samples
    }

    /// Resume: quick descending-then-up chime G5→C5→C6
    fn gen_resume() -> Vec<f32> {
        let notes = [(784.0_f32, 0.06), (523.0, 0.06), (1047.0, 0.14)];
        let mut samples = Vec::new();
        for &(freq, dur) in &notes {
            tone(freq, dur, 0.25, &mut samples);
        }
        samples
    }

    /// Bump: short low thud with fast decay
    fn gen_bump() -> Vec<f32> {
        let duration = 0.05;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 140.0 - t * 60.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                (ti * freq * TAU).sin() * (1.0 - t).powf(2.0) * 0.35
            })
            .collect()
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
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

}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_encounter(&self) {}
    pub fn play_resume(&self) {}
    pub fn play_bump(&self) {}
}

/// Map step events to sound effects. Plain moves are silent.
pub fn play_events(sfx: &SoundEngine, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::EncounterStarted { .. } => sfx.play_encounter(),
            GameEvent::EncounterEnded => sfx.play_resume(),
            GameEvent::Blocked { by_wall: true, .. } => sfx.play_bump(),
            _ => {}
        }
    }
}
