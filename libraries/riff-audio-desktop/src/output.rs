/// cpal-based output device (one stream thread per clip)
use crate::error::{DeviceError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{
    BufferSize, Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig,
};
use crossbeam_channel::{bounded, Receiver, Sender};
use riff_core::{DeviceClip, GainRange, OutputDevice, PcmBuffer, PcmFormat};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Commands sent to a clip's stream thread
enum StreamCommand {
    /// Resume the output stream
    Resume,
    /// Pause the output stream
    Pause,
    /// Drop the stream and exit
    Shutdown,
}

/// State shared between a clip handle and its audio callback
struct ClipState {
    /// Interleaved source samples
    samples: Vec<i16>,
    /// Source channel count
    channels: usize,
    /// Length in source frames
    length: u64,
    /// Current source frame
    position: AtomicU64,
    /// Producing audio
    running: AtomicBool,
    /// Gain in dB (f32 bits)
    gain_bits: AtomicU32,
    /// Master gain range
    range: GainRange,
}

impl ClipState {
    fn new(pcm: PcmBuffer, range: GainRange) -> Self {
        let channels = usize::from(pcm.format.channels);
        let length = pcm.frames() as u64;
        Self {
            samples: pcm.samples,
            channels,
            length,
            position: AtomicU64::new(0),
            running: AtomicBool::new(false),
            gain_bits: AtomicU32::new(range.default_gain().to_bits()),
            range,
        }
    }

    fn gain(&self) -> f32 {
        f32::from_bits(self.gain_bits.load(Ordering::Relaxed))
    }
}

/// Fractional read cursor for rate adaptation (nearest sample)
struct Cursor {
    /// Source frames per output frame
    step: f64,
    frac: f64,
}

impl Cursor {
    fn new(source_rate: u32, output_rate: u32) -> Self {
        Self {
            step: f64::from(source_rate) / f64::from(output_rate.max(1)),
            frac: 0.0,
        }
    }
}

/// Source sample for one output channel, as f32 in [-1, 1)
///
/// Mono output folds all source channels; otherwise channels wrap.
fn map_channel(frame: &[i16], out_channel: usize, out_channels: usize) -> f32 {
    let to_f32 = |s: i16| f32::from(s) / 32768.0;
    if out_channels == 1 && frame.len() > 1 {
        frame.iter().map(|&s| to_f32(s)).sum::<f32>() / frame.len() as f32
    } else {
        to_f32(frame[out_channel % frame.len()])
    }
}

/// Audio callback body (runs in the real-time audio thread)
fn render<T>(output: &mut [T], out_channels: usize, state: &ClipState, cursor: &mut Cursor)
where
    T: SizedSample + FromSample<f32>,
{
    if !state.running.load(Ordering::Acquire) || out_channels == 0 {
        output.fill(<T as Sample>::EQUILIBRIUM);
        return;
    }

    let amplitude = state.range.db_to_linear(state.gain());
    let start = state.position.load(Ordering::Acquire);
    let mut pos = start;

    for frame in output.chunks_mut(out_channels) {
        if pos >= state.length {
            frame.fill(<T as Sample>::EQUILIBRIUM);
            continue;
        }

        let base = pos as usize * state.channels;
        let source = &state.samples[base..base + state.channels];
        for (channel, sample) in frame.iter_mut().enumerate() {
            let value = (map_channel(source, channel, out_channels) * amplitude).clamp(-1.0, 1.0);
            *sample = T::from_sample(value);
        }

        cursor.frac += cursor.step;
        let whole = cursor.frac.floor();
        cursor.frac -= whole;
        pos += whole as u64;
    }

    let pos = pos.min(state.length);
    // A seek during this callback wins over our advance
    if state
        .position
        .compare_exchange(start, pos, Ordering::AcqRel, Ordering::Acquire)
        .is_ok()
        && pos >= state.length
    {
        state.running.store(false, Ordering::Release);
    }
}

/// cpal output device
///
/// Every opened clip gets a dedicated thread that owns its cpal `Stream`.
/// The clip handle talks to that thread over a channel and shares position,
/// running flag and gain with the audio callback through atomics.
pub struct CpalOutput {
    device: Device,
}

impl CpalOutput {
    /// Create an output on the default device of the default host
    ///
    /// # Errors
    /// Returns an error if no output device is available
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(DeviceError::DeviceNotFound)?;
        Ok(Self::with_device(device))
    }

    /// Create an output on a specific device
    pub fn with_device(device: Device) -> Self {
        Self { device }
    }

    /// Pick a stream config: the source's own rate and channel count if the
    /// device supports it, otherwise the device default
    fn select_config(&self, format: PcmFormat) -> Result<(StreamConfig, SampleFormat)> {
        let default = self.device.default_output_config()?;
        let sample_format = default.sample_format();
        let rate = format.sample_rate.as_hz();

        let native = self
            .device
            .supported_output_configs()
            .map(|mut configs| {
                configs.any(|c| {
                    c.channels() == format.channels
                        && c.sample_format() == sample_format
                        && c.min_sample_rate() <= rate
                        && c.max_sample_rate() >= rate
                })
            })
            .unwrap_or(false);

        let config = if native {
            StreamConfig {
                channels: format.channels,
                sample_rate: rate,
                buffer_size: BufferSize::Default,
            }
        } else {
            tracing::debug!(
                rate,
                channels = format.channels,
                "Source format not supported natively, using device default"
            );
            default.config()
        };

        Ok((config, sample_format))
    }
}

impl OutputDevice for CpalOutput {
    fn open_clip(&mut self, pcm: PcmBuffer) -> riff_core::Result<Box<dyn DeviceClip>> {
        if pcm.format.channels == 0 || pcm.is_empty() {
            return Err(DeviceError::InvalidPcm("no frames to play".into()).into());
        }

        let format = pcm.format;
        let (config, sample_format) = self.select_config(format)?;
        let output_rate = config.sample_rate;
        let output_channels = config.channels;
        let cursor = Cursor::new(format.sample_rate.as_hz(), output_rate);
        let state = Arc::new(ClipState::new(pcm, GainRange::MASTER));

        let (command_tx, command_rx) = bounded::<StreamCommand>(8);
        let (ready_tx, ready_rx) = bounded::<Result<()>>(1);

        let device = self.device.clone();
        let state_clone = Arc::clone(&state);
        let stream_thread = thread::Builder::new()
            .name("riff-clip-stream".into())
            .spawn(move || {
                stream_thread_run(
                    &device,
                    &config,
                    sample_format,
                    state_clone,
                    cursor,
                    &command_rx,
                    &ready_tx,
                );
            })
            .map_err(|e| DeviceError::ThreadError(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = stream_thread.join();
                return Err(e.into());
            }
            Err(_) => {
                let _ = stream_thread.join();
                return Err(DeviceError::ThreadError("stream thread exited".into()).into());
            }
        }

        tracing::debug!(
            frames = state.length,
            output_rate,
            output_channels,
            "Opened clip"
        );

        Ok(Box::new(CpalClip {
            state,
            format,
            command_tx,
            stream_thread: Some(stream_thread),
            closed: false,
        }))
    }
}

/// Stream thread main loop
///
/// Owns the cpal `Stream` for the lifetime of one clip.
fn stream_thread_run(
    device: &Device,
    config: &StreamConfig,
    sample_format: SampleFormat,
    state: Arc<ClipState>,
    cursor: Cursor,
    command_rx: &Receiver<StreamCommand>,
    ready_tx: &Sender<Result<()>>,
) {
    let stream = match build_stream(device, config, sample_format, state, cursor) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };
    let _ = ready_tx.send(Ok(()));

    while let Ok(cmd) = command_rx.recv() {
        match cmd {
            StreamCommand::Resume => {
                if let Err(e) = stream.play() {
                    tracing::warn!(error = %DeviceError::from(e), "Failed to resume stream");
                }
            }
            StreamCommand::Pause => {
                if let Err(e) = stream.pause() {
                    tracing::warn!(error = %DeviceError::from(e), "Failed to pause stream");
                }
            }
            StreamCommand::Shutdown => break,
        }
    }
}

fn build_stream(
    device: &Device,
    config: &StreamConfig,
    sample_format: SampleFormat,
    state: Arc<ClipState>,
    cursor: Cursor,
) -> Result<Stream> {
    match sample_format {
        SampleFormat::I16 => build_typed_stream::<i16>(device, config, state, cursor),
        SampleFormat::I32 => build_typed_stream::<i32>(device, config, state, cursor),
        SampleFormat::F32 => build_typed_stream::<f32>(device, config, state, cursor),
        SampleFormat::F64 => build_typed_stream::<f64>(device, config, state, cursor),
        other => Err(DeviceError::UnsupportedSampleFormat(format!("{:?}", other))),
    }
}

fn build_typed_stream<T>(
    device: &Device,
    config: &StreamConfig,
    state: Arc<ClipState>,
    mut cursor: Cursor,
) -> Result<Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let out_channels = usize::from(config.channels);
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            render(data, out_channels, &state, &mut cursor);
        },
        |err| tracing::error!(error = %err, "Audio stream error"),
        None,
    )?;
    Ok(stream)
}

/// Clip handle returned by [`CpalOutput`]
///
/// All methods return immediately; position and running state are read
/// from atomics updated by the audio callback.
pub struct CpalClip {
    state: Arc<ClipState>,
    format: PcmFormat,
    command_tx: Sender<StreamCommand>,
    stream_thread: Option<JoinHandle<()>>,
    closed: bool,
}

impl CpalClip {
    fn send(&self, cmd: StreamCommand) {
        if self.command_tx.try_send(cmd).is_err() {
            tracing::warn!("Stream thread not accepting commands");
        }
    }
}

impl DeviceClip for CpalClip {
    fn start(&mut self) {
        if self.closed {
            return;
        }
        self.state.running.store(true, Ordering::Release);
        self.send(StreamCommand::Resume);
    }

    fn stop(&mut self) {
        if self.closed {
            return;
        }
        self.state.running.store(false, Ordering::Release);
        self.send(StreamCommand::Pause);
    }

    fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Acquire)
    }

    fn frame_length(&self) -> u64 {
        self.state.length
    }

    fn frame_position(&self) -> u64 {
        self.state.position.load(Ordering::Acquire)
    }

    fn set_frame_position(&mut self, frame: u64) {
        self.state
            .position
            .store(frame.min(self.state.length), Ordering::Release);
    }

    fn format(&self) -> PcmFormat {
        self.format
    }

    fn gain_range(&self) -> GainRange {
        self.state.range
    }

    fn gain(&self) -> f32 {
        self.state.gain()
    }

    fn set_gain(&mut self, db: f32) {
        let db = self.state.range.clamp(db);
        self.state.gain_bits.store(db.to_bits(), Ordering::Relaxed);
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.state.running.store(false, Ordering::Release);
        let _ = self.command_tx.send(StreamCommand::Shutdown);
        if let Some(handle) = self.stream_thread.take() {
            if handle.join().is_err() {
                tracing::warn!("Stream thread panicked");
            }
        }
        tracing::debug!("Closed clip");
    }
}

impl Drop for CpalClip {
    fn drop(&mut self) {
        self.close();
    }
}
