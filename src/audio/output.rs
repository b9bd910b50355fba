use std::time::Duration;

use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use super::synth::{mix_into, Voice};
use super::types::{Tone, ToneCommand};

const RETRY_INTERVAL: Duration = Duration::from_secs(1);
const DEVICE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Output thread body. Runs until `Shutdown` arrives or every sender is dropped.
///
/// Tones requested while no device is available are dropped.
pub fn run_tone_output(commands: Receiver<ToneCommand>) {
    let host = cpal::default_host();
    let mut no_device_logged = false;

    loop {
        let (stream, device_name, tone_tx) = match open_stream(&host) {
            Ok(opened) => {
                no_device_logged = false;
                opened
            }
            Err(e) => {
                if !no_device_logged {
                    log::warn!("[Tones] Audio output unavailable: {:#}", e);
                    no_device_logged = true;
                }
                match commands.recv_timeout(RETRY_INTERVAL) {
                    Ok(ToneCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                    Ok(ToneCommand::Play(_)) | Err(RecvTimeoutError::Timeout) => continue,
                }
            }
        };

        log::info!("[Tones] Output stream open on '{}'", device_name);

        loop {
            match commands.recv_timeout(DEVICE_POLL_INTERVAL) {
                Ok(ToneCommand::Play(tone)) => {
                    let _ = tone_tx.send(tone);
                }
                Ok(ToneCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                    drop(stream);
                    log::info!("[Tones] Output stopped");
                    return;
                }
                Err(RecvTimeoutError::Timeout) => {
                    // Reconnect when the default device changes
                    let current = host.default_output_device().and_then(|d| d.name().ok());
                    if current.as_deref() != Some(device_name.as_str()) {
                        log::info!("[Tones] Default output device changed, reconnecting");
                        break;
                    }
                }
            }
        }
    }

    log::info!("[Tones] Output stopped");
}

fn open_stream(host: &cpal::Host) -> anyhow::Result<(cpal::Stream, String, Sender<Tone>)> {
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("no output device found"))?;
    let device_name = device.name().unwrap_or_default();

    let config = device
        .default_output_config()
        .context("failed to get output config")?;

    let (tone_tx, tone_rx) = unbounded();

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => run_stream::<f32>(&device, &config.into(), tone_rx),
        cpal::SampleFormat::I16 => run_stream::<i16>(&device, &config.into(), tone_rx),
        cpal::SampleFormat::U16 => run_stream::<u16>(&device, &config.into(), tone_rx),
        _ => Err(cpal::BuildStreamError::StreamConfigNotSupported),
    }
    .context("failed to build output stream")?;

    stream.play().context("failed to start output stream")?;
    Ok((stream, device_name, tone_tx))
}

pub fn run_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    tones: Receiver<Tone>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let sample_rate = config.sample_rate.0;
    let mut voices: Vec<Voice> = Vec::new();
    let mut mix_buf: Vec<f32> = Vec::new();

    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            while let Ok(tone) = tones.try_recv() {
                voices.push(Voice::new(tone.freq, tone.envelope, sample_rate));
            }

            if voices.is_empty() {
                data.fill(T::from_sample(0.0));
                return;
            }

            mix_buf.resize(data.len(), 0.0);
            mix_into(&mut voices, &mut mix_buf, channels);
            for (sample, mixed) in data.iter_mut().zip(mix_buf.iter()) {
                *sample = T::from_sample(*mixed);
            }
        },
        |err| log::error!("[Tones] Output stream error: {}", err),
        None,
    )
}
