//! Sound cues
//!
//! The game only emits `SoundEffect` cues; an `AudioSink` turns them into
//! sound. The web build synthesizes everything with the Web Audio API (no
//! asset files). Native builds log the cues.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Any button, hotkey or slider grab
    ButtonClick,
    /// A circle touched the player
    CircleEaten,
    /// Win beat the stored best time
    NewRecord,
}

/// Something that can play the game's cues
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);

    /// Master scales everything; sfx scales effects on top of master
    fn set_volumes(&mut self, master: f32, sfx: f32);

    /// Looping background music for the play screen
    fn start_music(&mut self);

    fn stop_music(&mut self);

    /// Pick up volumes from the settings
    fn apply_settings(&mut self, settings: &Settings) {
        self.set_volumes(settings.master_volume, settings.sfx_volume);
    }
}

/// Effect gain after master and sfx volume
pub fn effective_volume(master: f32, sfx: f32) -> f32 {
    (master * sfx).clamp(0.0, 1.0)
}

/// Schedules back-to-back music bars against an audio clock
///
/// Polled once per frame; a bar is due once the clock is within `lead`
/// seconds of the end of the last queued bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarClock {
    bar_secs: f64,
    lead: f64,
    /// When the last queued bar ends
    queued_until: f64,
}

impl BarClock {
    pub fn new(bar_secs: f64, lead: f64) -> Self {
        Self {
            bar_secs,
            lead,
            queued_until: f64::NEG_INFINITY,
        }
    }

    /// Start time of the next bar to queue at `now`, if one is due
    pub fn due(&mut self, now: f64) -> Option<f64> {
        if now + self.lead < self.queued_until {
            return None;
        }
        // After a stall the loop restarts at `now` instead of piling up bars
        let start = self.queued_until.max(now);
        self.queued_until = start + self.bar_secs;
        Some(start)
    }
}

/// Sink that only logs cues (native builds and tests)
#[derive(Debug, Default)]
pub struct LogAudio {
    master_volume: f32,
    sfx_volume: f32,
    music_playing: bool,
    /// Every cue played so far
    played: Vec<SoundEffect>,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> &[SoundEffect] {
        &self.played
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        log::debug!(
            "sfx {:?} at {:.2}",
            effect,
            effective_volume(self.master_volume, self.sfx_volume)
        );
        self.played.push(effect);
    }

    fn set_volumes(&mut self, master: f32, sfx: f32) {
        self.master_volume = master.clamp(0.0, 1.0);
        self.sfx_volume = sfx.clamp(0.0, 1.0);
    }

    fn start_music(&mut self) {
        if !self.music_playing {
            log::debug!("music start");
            self.music_playing = true;
        }
    }

    fn stop_music(&mut self) {
        if self.music_playing {
            log::debug!("music stop");
            self.music_playing = false;
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, BarClock, SoundEffect, effective_volume};

    /// Bass line of the background loop (Hz), one note per beat
    const MUSIC_NOTES: [f32; 8] = [
        110.0, 130.81, 146.83, 130.81, 98.0, 110.0, 146.83, 164.81,
    ];
    const MUSIC_BEAT_SECS: f64 = 0.35;
    /// Queue the next bar this long before the current one ends
    const MUSIC_LEAD_SECS: f64 = 0.25;
    /// Music sits under the effects
    const MUSIC_GAIN: f32 = 0.12;

    /// Currently scheduled music voices
    struct Music {
        gain: GainNode,
        /// Oscillators with their stop times
        voices: Vec<(OscillatorNode, f64)>,
        clock: BarClock,
    }

    /// Web Audio synthesizer
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        music: Option<Music>,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 0.9,
                music: None,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        /// Create an oscillator with gain envelope routed to `dest`
        fn create_osc(
            ctx: &AudioContext,
            dest: &web_sys::AudioNode,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(dest).ok()?;

            Some((osc, gain))
        }

        /// Coin-style blip
        fn play_click(ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();
            for (i, freq) in [988.0, 1319.0].iter().enumerate() {
                let start = t + i as f64 * 0.05;
                if let Some((osc, gain)) =
                    Self::create_osc(ctx, &ctx.destination(), *freq, OscillatorType::Square)
                {
                    gain.gain().set_value_at_time(vol * 0.15, start).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, start + 0.08)
                        .ok();
                    osc.start_with_when(start).ok();
                    osc.stop_with_when(start + 0.1).ok();
                }
            }
        }

        /// Rising power-up sweep
        fn play_eat(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) =
                Self::create_osc(ctx, &ctx.destination(), 300.0, OscillatorType::Triangle)
            else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(900.0, t + 0.2)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        /// Celebratory arpeggio
        fn play_new_record(ctx: &AudioContext, vol: f32) {
            for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
                let delay = i as f64 * 0.08;
                if let Some((osc, gain)) =
                    Self::create_osc(ctx, &ctx.destination(), *freq, OscillatorType::Triangle)
                {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }

        /// One bar of the bass line starting at `t`
        fn schedule_bar(ctx: &AudioContext, music: &mut Music, t: f64) {
            for (i, freq) in MUSIC_NOTES.iter().enumerate() {
                let start = t + i as f64 * MUSIC_BEAT_SECS;
                let end = start + MUSIC_BEAT_SECS;
                if let Some((osc, gain)) =
                    Self::create_osc(ctx, &music.gain, *freq, OscillatorType::Triangle)
                {
                    gain.gain().set_value_at_time(0.8, start).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.05, start + MUSIC_BEAT_SECS * 0.9)
                        .ok();
                    osc.start_with_when(start).ok();
                    osc.stop_with_when(end).ok();
                    music.voices.push((osc, end));
                }
            }
        }

        /// Keep the loop going; called once per frame
        pub fn continue_music(&mut self) {
            let Some(ctx) = &self.ctx else { return };
            let Some(music) = &mut self.music else { return };
            let now = ctx.current_time();
            music.voices.retain(|(_, end)| *end > now);
            while let Some(start) = music.clock.due(now) {
                Self::schedule_bar(ctx, music, start);
            }
        }

        fn music_volume(&self) -> f32 {
            self.master_volume * MUSIC_GAIN
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, effect: SoundEffect) {
            let vol = effective_volume(self.master_volume, self.sfx_volume);
            if vol <= 0.0 {
                return;
            }
            self.resume();
            let Some(ctx) = &self.ctx else { return };

            match effect {
                SoundEffect::ButtonClick => Self::play_click(ctx, vol),
                SoundEffect::CircleEaten => Self::play_eat(ctx, vol),
                SoundEffect::NewRecord => Self::play_new_record(ctx, vol),
            }
        }

        fn set_volumes(&mut self, master: f32, sfx: f32) {
            self.master_volume = master.clamp(0.0, 1.0);
            self.sfx_volume = sfx.clamp(0.0, 1.0);
            if let Some(music) = &self.music {
                music.gain.gain().set_value(self.music_volume());
            }
        }

        fn start_music(&mut self) {
            if self.music.is_some() {
                return;
            }
            self.resume();
            let Some(ctx) = &self.ctx else { return };
            let Ok(gain) = ctx.create_gain() else { return };
            gain.gain().set_value(self.master_volume * MUSIC_GAIN);
            if gain.connect_with_audio_node(&ctx.destination()).is_err() {
                return;
            }
            self.music = Some(Music {
                gain,
                voices: Vec::new(),
                clock: BarClock::new(MUSIC_NOTES.len() as f64 * MUSIC_BEAT_SECS, MUSIC_LEAD_SECS),
            });
            self.continue_music();
        }

        fn stop_music(&mut self) {
            if let Some(music) = self.music.take() {
                for (voice, _) in &music.voices {
                    voice.stop().ok();
                }
                music.gain.disconnect().ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_volume() {
        assert!((effective_volume(0.8, 0.9) - 0.72).abs() < 1e-6);
        assert_eq!(effective_volume(2.0, 1.0), 1.0);
        assert_eq!(effective_volume(0.0, 1.0), 0.0);
    }

    #[test]
    fn test_log_audio_tracks_music() {
        let mut sink = LogAudio::new();
        sink.apply_settings(&Settings::default());
        sink.start_music();
        assert!(sink.music_playing());
        sink.play(SoundEffect::CircleEaten);
        sink.stop_music();
        assert!(!sink.music_playing());
        assert_eq!(sink.played(), &[SoundEffect::CircleEaten]);
    }

    #[test]
    fn test_bar_clock_queues_back_to_back() {
        let mut clock = BarClock::new(2.0, 0.25);
        assert_eq!(clock.due(10.5), Some(10.5));
        // Mid-bar: nothing due, however often it is polled
        assert_eq!(clock.due(10.75), None);
        assert_eq!(clock.due(12.0), None);
        // Within the lead: next bar starts exactly where the first ends
        assert_eq!(clock.due(12.375), Some(12.5));
        assert_eq!(clock.due(12.375), None);
    }

    #[test]
    fn test_bar_clock_restarts_after_stall() {
        let mut clock = BarClock::new(2.0, 0.25);
        clock.due(0.0);
        assert_eq!(clock.due(9.0), Some(9.0));
        assert_eq!(clock.due(9.5), None);
    }
}
