//! In-memory output device and decoder for tests
//!
//! `VirtualDevice` never touches audio hardware: clips advance only when a
//! test calls [`VirtualDevice::advance`]. `StubDecoder` produces silent PCM
//! of a configurable length per path.

use riff_core::{
    AudioDecoder, DeviceClip, GainRange, OutputDevice, PcmBuffer, PcmFormat, Result, RiffError,
    SampleRate,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct ClipState {
    length: u64,
    format: PcmFormat,
    position: u64,
    running: bool,
    gain: f32,
    closed: bool,
}

#[derive(Debug, Default)]
struct DeviceState {
    clips: Vec<Arc<Mutex<ClipState>>>,
    open: usize,
    peak_open: usize,
    total_opened: usize,
    fail_next: bool,
    gain_range: Option<GainRange>,
}

impl DeviceState {
    fn current(&self) -> Option<&Arc<Mutex<ClipState>>> {
        self.clips.iter().rev().find(|clip| !lock(clip).closed)
    }
}

/// Simulated output device
///
/// Cloning yields another handle to the same device, so a test can keep one
/// handle while the player owns the other.
#[derive(Debug, Clone, Default)]
pub struct VirtualDevice {
    state: Arc<Mutex<DeviceState>>,
}

impl VirtualDevice {
    /// Create a device with the default master gain range
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom gain range for clips opened from now on
    pub fn with_gain_range(self, range: GainRange) -> Self {
        lock(&self.state).gain_range = Some(range);
        self
    }

    /// Make the next `open_clip` call fail with a device error
    pub fn fail_next_open(&self) {
        lock(&self.state).fail_next = true;
    }

    /// Clips currently open (not closed)
    pub fn open_clips(&self) -> usize {
        lock(&self.state).open
    }

    /// Highest number of simultaneously open clips seen
    pub fn peak_open_clips(&self) -> usize {
        lock(&self.state).peak_open
    }

    /// Clips opened over the device's lifetime
    pub fn total_opened(&self) -> usize {
        lock(&self.state).total_opened
    }

    /// Play `frames` frames of the most recently opened clip
    ///
    /// Has no effect if that clip is stopped. Reaching the end stops the clip
    /// with its position at the length.
    pub fn advance(&self, frames: u64) {
        let state = lock(&self.state);
        if let Some(clip) = state.current() {
            let mut clip = lock(clip);
            if clip.running {
                clip.position = clip.position.saturating_add(frames).min(clip.length);
                if clip.position >= clip.length {
                    clip.running = false;
                }
            }
        }
    }

    /// Position of the most recently opened clip
    pub fn current_position(&self) -> Option<u64> {
        let state = lock(&self.state);
        state.current().map(|clip| lock(clip).position)
    }

    /// Whether the most recently opened clip is running
    pub fn current_running(&self) -> Option<bool> {
        let state = lock(&self.state);
        state.current().map(|clip| lock(clip).running)
    }
}

impl OutputDevice for VirtualDevice {
    fn open_clip(&mut self, pcm: PcmBuffer) -> Result<Box<dyn DeviceClip>> {
        let mut state = lock(&self.state);
        if state.fail_next {
            state.fail_next = false;
            return Err(RiffError::device("virtual device unavailable"));
        }

        let range = state.gain_range.unwrap_or_default();
        let clip = Arc::new(Mutex::new(ClipState {
            length: pcm.frames() as u64,
            format: pcm.format,
            position: 0,
            running: false,
            gain: range.default_gain(),
            closed: false,
        }));

        state.clips.push(Arc::clone(&clip));
        state.open += 1;
        state.total_opened += 1;
        state.peak_open = state.peak_open.max(state.open);

        Ok(Box::new(VirtualClip {
            clip,
            device: Arc::clone(&self.state),
            range,
        }))
    }
}

/// Clip handed out by [`VirtualDevice`]
#[derive(Debug)]
pub struct VirtualClip {
    clip: Arc<Mutex<ClipState>>,
    device: Arc<Mutex<DeviceState>>,
    range: GainRange,
}

impl DeviceClip for VirtualClip {
    fn start(&mut self) {
        let mut clip = lock(&self.clip);
        if !clip.closed {
            clip.running = true;
        }
    }

    fn stop(&mut self) {
        lock(&self.clip).running = false;
    }

    fn is_running(&self) -> bool {
        lock(&self.clip).running
    }

    fn frame_length(&self) -> u64 {
        lock(&self.clip).length
    }

    fn frame_position(&self) -> u64 {
        lock(&self.clip).position
    }

    fn set_frame_position(&mut self, frame: u64) {
        let mut clip = lock(&self.clip);
        clip.position = frame.min(clip.length);
    }

    fn format(&self) -> PcmFormat {
        lock(&self.clip).format
    }

    fn gain_range(&self) -> GainRange {
        self.range
    }

    fn gain(&self) -> f32 {
        lock(&self.clip).gain
    }

    fn set_gain(&mut self, db: f32) {
        lock(&self.clip).gain = self.range.clamp(db);
    }

    fn close(&mut self) {
        // Lock order: device before clip, same as `advance`
        let mut device = lock(&self.device);
        let mut clip = lock(&self.clip);
        if clip.closed {
            return;
        }
        clip.closed = true;
        clip.running = false;
        device.open = device.open.saturating_sub(1);
    }
}

#[derive(Debug)]
struct DecoderState {
    default_frames: usize,
    sample_rate: SampleRate,
    channels: u16,
    frames: HashMap<PathBuf, usize>,
    failing: HashSet<PathBuf>,
    unsupported: HashSet<PathBuf>,
    decoded: Vec<PathBuf>,
}

/// Decoder producing silent PCM without reading any file
#[derive(Debug, Clone)]
pub struct StubDecoder {
    state: Arc<Mutex<DecoderState>>,
}

impl StubDecoder {
    /// One second of stereo CD-quality audio for every path
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(DecoderState {
                default_frames: 44_100,
                sample_rate: SampleRate::CD_QUALITY,
                channels: 2,
                frames: HashMap::new(),
                failing: HashSet::new(),
                unsupported: HashSet::new(),
                decoded: Vec::new(),
            })),
        }
    }

    /// Length in frames for paths without an explicit length
    pub fn with_default_frames(self, frames: usize) -> Self {
        lock(&self.state).default_frames = frames;
        self
    }

    /// Length in frames for one path
    pub fn with_frames(self, path: impl AsRef<Path>, frames: usize) -> Self {
        lock(&self.state)
            .frames
            .insert(path.as_ref().to_path_buf(), frames);
        self
    }

    /// Sample rate and channel count of produced PCM
    pub fn with_format(self, sample_rate: SampleRate, channels: u16) -> Self {
        {
            let mut state = lock(&self.state);
            state.sample_rate = sample_rate;
            state.channels = channels;
        }
        self
    }

    /// Make decoding of `path` fail
    pub fn fail_on(&self, path: impl AsRef<Path>) {
        lock(&self.state)
            .failing
            .insert(path.as_ref().to_path_buf());
    }

    /// Report `path` as an unsupported format
    pub fn reject_format(&self, path: impl AsRef<Path>) {
        lock(&self.state)
            .unsupported
            .insert(path.as_ref().to_path_buf());
    }

    /// Paths successfully decoded so far, in order
    pub fn decoded(&self) -> Vec<PathBuf> {
        lock(&self.state).decoded.clone()
    }
}

impl Default for StubDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioDecoder for StubDecoder {
    fn decode(&mut self, path: &Path) -> Result<PcmBuffer> {
        let mut state = lock(&self.state);
        if state.failing.contains(path) {
            return Err(RiffError::decode(format!(
                "stub decode failure: {}",
                path.display()
            )));
        }

        let frames = state
            .frames
            .get(path)
            .copied()
            .unwrap_or(state.default_frames);
        let format = PcmFormat::s16_le(state.sample_rate, state.channels);
        state.decoded.push(path.to_path_buf());

        Ok(PcmBuffer::new(
            vec![0; frames * state.channels as usize],
            format,
        ))
    }

    fn supports_format(&self, path: &Path) -> bool {
        !lock(&self.state).unsupported.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_stops_at_end() {
        let mut device = VirtualDevice::new();
        let pcm = PcmBuffer::new(vec![0; 200], PcmFormat::s16_le(SampleRate::CD_QUALITY, 2));
        let mut clip = device.open_clip(pcm).unwrap();

        device.advance(50);
        assert_eq!(clip.frame_position(), 0);

        clip.start();
        device.advance(50);
        assert_eq!(clip.frame_position(), 50);
        device.advance(500);
        assert_eq!(clip.frame_position(), 100);
        assert!(!clip.is_running());
    }

    #[test]
    fn close_is_idempotent() {
        let mut device = VirtualDevice::new();
        let pcm = PcmBuffer::new(vec![0; 20], PcmFormat::cd_quality());
        let mut clip = device.open_clip(pcm).unwrap();
        clip.close();
        clip.close();
        assert_eq!(device.open_clips(), 0);
        assert_eq!(device.total_opened(), 1);
    }

    #[test]
    fn stub_decoder_lengths() {
        let mut decoder = StubDecoder::new().with_frames("short.wav", 10);
        assert_eq!(decoder.decode(Path::new("short.wav")).unwrap().frames(), 10);
        assert_eq!(decoder.decode(Path::new("other.wav")).unwrap().frames(), 44_100);
        assert_eq!(decoder.decoded().len(), 2);
    }
}
