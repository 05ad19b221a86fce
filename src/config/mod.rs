mod settings;

pub use settings::{Config, HeapConfig, ListConfig, PlaybackConfig, EXAMPLE_CONFIG};
