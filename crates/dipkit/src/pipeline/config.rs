use std::path::PathBuf;

use dipkit_imgproc::region_grow::DEFAULT_REGION_SEED;

use super::PipelineError;

/// Environment variable overriding [`PipelineConfig::output_dir`].
pub const ENV_OUTPUT_DIR: &str = "DIPKIT_OUTPUT_DIR";
/// Environment variable overriding [`PipelineConfig::mask_dir`].
pub const ENV_MASK_DIR: &str = "DIPKIT_MASK_DIR";
/// Environment variable overriding [`PipelineConfig::seed`].
pub const ENV_SEED: &str = "DIPKIT_SEED";
/// Environment variable setting [`PipelineConfig::resources`].
pub const ENV_RESOURCES: &str = "DIPKIT_RESOURCES";

/// Settings of a pipeline run that do not come from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Directory the artefacts are written to.
    pub output_dir: PathBuf,
    /// Directory `maskpass` looks up `<name>.bmp` in.
    pub mask_dir: PathBuf,
    /// Seed of the region colouring generator.
    pub seed: u64,
    /// Optional JSON document replacing the embedded masks and structuring elements.
    pub resources: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            mask_dir: PathBuf::from("masks"),
            seed: DEFAULT_REGION_SEED,
            resources: None,
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the mask directory.
    pub fn with_mask_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.mask_dir = dir.into();
        self
    }

    /// Set the region colouring seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the resource document path.
    pub fn with_resources(mut self, path: impl Into<PathBuf>) -> Self {
        self.resources = Some(path.into());
        self
    }

    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidArgument`] if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Unset and empty variables keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PipelineError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get(ENV_MASK_DIR) {
            config.mask_dir = PathBuf::from(dir);
        }
        if let Some(seed) = get(ENV_SEED) {
            config.seed = parse_seed(&seed)?;
        }
        if let Some(path) = get(ENV_RESOURCES) {
            config.resources = Some(PathBuf::from(path));
        }

        Ok(config)
    }
}

/// Decimal or `0x`-prefixed hexadecimal seed.
fn parse_seed(text: &str) -> Result<u64, PipelineError> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse::<u64>(),
    };
    parsed.map_err(|e| PipelineError::InvalidArgument(format!("{ENV_SEED}='{text}': {e}")))
}
