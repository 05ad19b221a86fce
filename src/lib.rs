pub mod algorithms;
pub mod config;
pub mod playback;
pub mod request;
pub mod trace;
pub mod util;

pub use config::Config;
pub use playback::{PlaybackController, Visualization};
pub use request::{AnyTrace, RequestError, Run, TraceRequest};
pub use trace::{Recorder, Step, Trace, TraceError};
