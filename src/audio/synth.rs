/// Attack/decay envelope: linear rise to `peak`, then exponential fall to `floor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub peak: f32,
    pub floor: f32,
    pub attack_secs: f32,
    pub decay_secs: f32,
}

impl Envelope {
    /// Short pluck for progress slots.
    pub const SLOT: Envelope = Envelope {
        peak: 0.3,
        floor: 0.001,
        attack_secs: 0.05,
        decay_secs: 0.3,
    };

    /// Longer ring for header piano keys.
    pub const KEY: Envelope = Envelope {
        peak: 0.5,
        floor: 0.01,
        attack_secs: 0.02,
        decay_secs: 1.48,
    };

    pub fn duration_secs(&self) -> f32 {
        self.attack_secs + self.decay_secs
    }

    pub fn scaled(mut self, gain: f32) -> Self {
        self.peak *= gain;
        self.floor *= gain;
        self
    }

    pub fn gain_at(&self, t: f32) -> f32 {
        if t < 0.0 || t >= self.duration_secs() || self.peak <= 0.0 {
            return 0.0;
        }
        if t < self.attack_secs {
            return self.peak * t / self.attack_secs;
        }
        let progress = (t - self.attack_secs) / self.decay_secs;
        self.peak * (self.floor / self.peak).powf(progress)
    }
}

/// A single triangle-wave note.
#[derive(Debug, Clone)]
pub struct Voice {
    freq: f32,
    envelope: Envelope,
    sample_rate: u32,
    phase: f32,
    position: u64,
}

impl Voice {
    pub fn new(freq: f32, envelope: Envelope, sample_rate: u32) -> Self {
        Self {
            freq,
            envelope,
            sample_rate: sample_rate.max(1),
            phase: 0.0,
            position: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_secs() >= self.envelope.duration_secs()
    }

    fn elapsed_secs(&self) -> f32 {
        self.position as f32 / self.sample_rate as f32
    }

    pub fn next_sample(&mut self) -> f32 {
        if self.is_finished() {
            return 0.0;
        }
        let value = triangle(self.phase) * self.envelope.gain_at(self.elapsed_secs());
        self.phase = (self.phase + self.freq / self.sample_rate as f32).fract();
        self.position += 1;
        value
    }
}

/// Triangle wave over one period, `phase` in [0, 1).
pub fn triangle(phase: f32) -> f32 {
    1.0 - 4.0 * (phase - 0.5).abs()
}

/// Sums all voices into interleaved `out`, dropping voices that have finished.
pub fn mix_into(voices: &mut Vec<Voice>, out: &mut [f32], channels: usize) {
    let channels = channels.max(1);
    for frame in out.chunks_mut(channels) {
        let sample: f32 = voices.iter_mut().map(Voice::next_sample).sum();
        frame.fill(sample.clamp(-1.0, 1.0));
    }
    voices.retain(|v| !v.is_finished());
}
