pub mod paths;

pub use paths::DataPaths;
