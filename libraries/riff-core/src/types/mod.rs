mod audio;
mod gain;
mod track;

pub use audio::{PcmBuffer, PcmFormat, SampleRate};
pub use gain::GainRange;
pub use track::TrackRef;
