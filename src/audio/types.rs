use super::synth::Envelope;

/// A note to render: frequency plus its envelope, already scaled by master volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    pub envelope: Envelope,
}

pub enum ToneCommand {
    Play(Tone),
    Shutdown,
}
