use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Sender};

use super::notes::{find_key, slot_frequency};
use super::output::run_tone_output;
use super::synth::Envelope;
use super::types::{Tone, ToneCommand};
use crate::config::TrackerConfig;
use crate::errors::AppError;

/// Front end of the decorative tone engine.
///
/// Requests are fire and forget: when tones are disabled or no device is
/// available, they are silently dropped and song state is unaffected.
pub struct ToneManager {
    command_tx: Option<Sender<ToneCommand>>,
    volume: f32,
    output_thread: Option<JoinHandle<()>>,
}

impl ToneManager {
    pub fn new(config: &TrackerConfig) -> Self {
        if !config.tones_enabled {
            log::info!("[Tones] Disabled in settings");
            return Self::disabled();
        }

        let (command_tx, command_rx) = unbounded();
        let spawned = thread::Builder::new()
            .name("tone-output".to_string())
            .spawn(move || run_tone_output(command_rx));

        match spawned {
            Ok(handle) => Self {
                command_tx: Some(command_tx),
                volume: config.tone_volume,
                output_thread: Some(handle),
            },
            Err(e) => {
                log::error!("[Tones] Failed to spawn output thread: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self {
            command_tx: None,
            volume: 0.0,
            output_thread: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.command_tx.is_some()
    }

    pub fn play_slot(&self, slot_index: usize) {
        self.play(slot_frequency(slot_index), Envelope::SLOT);
    }

    pub fn play_key(&self, note: &str) -> Result<(), AppError> {
        let key = find_key(note)
            .ok_or_else(|| AppError::validation(format!("Unknown piano key: {}", note)))?;
        self.play(key.freq, Envelope::KEY);
        Ok(())
    }

    fn play(&self, freq: f32, envelope: Envelope) {
        let Some(tx) = &self.command_tx else {
            return;
        };
        let tone = Tone {
            freq,
            envelope: envelope.scaled(self.volume),
        };
        if tx.send(ToneCommand::Play(tone)).is_err() {
            log::warn!("[Tones] Output thread is gone, dropping tone");
        }
    }
}

impl Drop for ToneManager {
    fn drop(&mut self) {
        if let Some(tx) = self.command_tx.take() {
            let _ = tx.send(ToneCommand::Shutdown);
        }
        if let Some(handle) = self.output_thread.take() {
            if handle.join().is_err() {
                log::error!("[Tones] Output thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::Receiver;

    fn wired(volume: f32) -> (ToneManager, Receiver<ToneCommand>) {
        let (tx, rx) = unbounded();
        let manager = ToneManager {
            command_tx: Some(tx),
            volume,
            output_thread: None,
        };
        (manager, rx)
    }

    fn next_tone(rx: &Receiver<ToneCommand>) -> Tone {
        match rx.try_recv() {
            Ok(ToneCommand::Play(tone)) => tone,
            _ => panic!("expected a tone"),
        }
    }

    #[test]
    fn test_slot_tone_uses_scale_and_volume() {
        let (manager, rx) = wired(0.5);

        manager.play_slot(5);

        let tone = next_tone(&rx);
        assert_eq!(tone.freq, 440.0);
        assert!((tone.envelope.peak - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_key_tone() {
        let (manager, rx) = wired(1.0);

        manager.play_key("C5").unwrap();

        let tone = next_tone(&rx);
        assert_eq!(tone.freq, 523.25);
        assert_eq!(tone.envelope, Envelope::KEY);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let (manager, rx) = wired(1.0);

        assert!(matches!(manager.play_key("Z9"), Err(AppError::Validation(_))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_disabled_manager_ignores_requests() {
        let manager = ToneManager::disabled();
        assert!(!manager.is_enabled());
        manager.play_slot(0);
        assert!(manager.play_key("A4").is_ok());
    }

    #[test]
    fn test_drop_sends_shutdown() {
        let (manager, rx) = wired(1.0);
        drop(manager);
        assert!(matches!(rx.try_recv(), Ok(ToneCommand::Shutdown)));
    }

    #[test]
    fn test_dead_output_does_not_panic() {
        let (manager, rx) = wired(1.0);
        drop(rx);
        manager.play_slot(3);
    }
}
