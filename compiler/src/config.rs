use crate::protoc::ProtocConfig;

/// Directory, relative to the input file, that receives generated documents.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "pb";

/// Settings for one generator run, shared by every input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenConfig {
    pub output_subdir: String,
    /// `None` skips the schema compiler.
    pub protoc:        Option<ProtocConfig>,
    /// Comment out extracted messages in the source afterwards.
    pub rewrite:       bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        GenConfig {
            output_subdir: DEFAULT_OUTPUT_SUBDIR.to_string(),
            protoc:        Some(ProtocConfig::default()),
            rewrite:       true,
        }
    }
}
