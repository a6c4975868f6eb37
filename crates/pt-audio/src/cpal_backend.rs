//! CPAL-based audio output backend.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use pt_synth::Frame;
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::traits::{AudioError, AudioOutput};

/// Longest clip the queue can hold, in seconds.
const QUEUE_SECONDS: usize = 20;

/// How long `flush` waits for the audio callback to drain the queue.
const FLUSH_TIMEOUT: Duration = Duration::from_millis(200);

/// CPAL-based audio output.
pub struct CpalOutput {
    config: StreamConfig,
    _stream: Stream,
    producer: HeapProd<Frame>,
    running: Arc<AtomicBool>,
    flush_requested: Arc<AtomicBool>,
}

impl CpalOutput {
    /// Open the default output device and start its stream.
    pub fn open() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoDevice)?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;

        let mut config: StreamConfig = config.into();
        // Force stereo output; the stream callback assumes 2-channel interleaving
        config.channels = 2;

        let buffer_size = config.sample_rate.0 as usize * QUEUE_SECONDS;
        let rb = HeapRb::<Frame>::new(buffer_size);
        let (producer, consumer) = rb.split();

        let running = Arc::new(AtomicBool::new(true));
        let flush_requested = Arc::new(AtomicBool::new(false));
        let stream = build_stream(
            &device,
            &config,
            consumer,
            running.clone(),
            flush_requested.clone(),
        )?;
        stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;

        tracing::debug!(
            sample_rate = config.sample_rate.0,
            "opened audio output"
        );

        Ok(Self {
            config,
            _stream: stream,
            producer,
            running,
            flush_requested,
        })
    }
}

fn build_stream(
    device: &Device,
    config: &StreamConfig,
    mut consumer: HeapCons<Frame>,
    running: Arc<AtomicBool>,
    flush_requested: Arc<AtomicBool>,
) -> Result<Stream, AudioError> {
    let channels = config.channels as usize;

    device
        .build_output_stream(
            config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                if flush_requested.load(Ordering::Acquire) {
                    while consumer.try_pop().is_some() {}
                    flush_requested.store(false, Ordering::Release);
                }

                if !running.load(Ordering::Relaxed) {
                    data.fill(0.0);
                    return;
                }

                // Process one frame per device frame (channels samples per frame)
                for chunk in data.chunks_mut(channels) {
                    let (left, right) = consumer
                        .try_pop()
                        .map(Frame::to_f32)
                        .unwrap_or((0.0, 0.0));
                    // Write stereo pair; zero-fill any extra channels
                    for (i, sample) in chunk.iter_mut().enumerate() {
                        *sample = match i {
                            0 => left,
                            1 => right,
                            _ => 0.0,
                        };
                    }
                }
            },
            |err| tracing::error!("audio stream error: {}", err),
            None,
        )
        .map_err(|e| AudioError::StreamCreate(e.to_string()))
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn write(&mut self, frames: &[Frame]) -> Result<(), AudioError> {
        let pushed = self.producer.push_slice(frames);
        if pushed < frames.len() {
            return Err(AudioError::Overrun {
                dropped: frames.len() - pushed,
            });
        }
        Ok(())
    }

    fn flush(&mut self) {
        self.flush_requested.store(true, Ordering::Release);
        let deadline = Instant::now() + FLUSH_TIMEOUT;
        while self.flush_requested.load(Ordering::Acquire) {
            if Instant::now() >= deadline {
                tracing::warn!("audio callback did not drain the queue in time");
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn start(&mut self) -> Result<(), AudioError> {
        self.running.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.running.store(false, Ordering::Relaxed);
        Ok(())
    }
}
