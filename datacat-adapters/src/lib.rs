pub mod codec;
pub mod config;
pub mod options;
pub mod yaml;

pub use codec::{Codec, CodecError, SafeYamlCodec};
pub use config::YamlDatasetConfig;
pub use options::{default_save_args, FlowStyle, SaveOptions};
pub use yaml::YamlDataset;
