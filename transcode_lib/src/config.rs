use tracing::level_filters::LevelFilter;

/// How strictly artifacts are checked while transcoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compat {
    /// Overflow and malformed sections are errors; only affine coordinates are emitted.
    #[default]
    Strict,
    /// Reproduces previously generated artifacts byte for byte: wide values are
    /// truncated to their low bytes and every section drops its last entry.
    Legacy,
}

#[derive(Debug, Clone, Copy)]
pub struct TranscodeOptions {
    pub compat: Compat,
    /// Per-element tracing is only produced at `DEBUG` or finer.
    pub log_level: LevelFilter,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            compat: Compat::Strict,
            log_level: LevelFilter::WARN,
        }
    }
}

impl TranscodeOptions {
    pub fn legacy() -> Self {
        Self {
            compat: Compat::Legacy,
            ..Self::default()
        }
    }

    pub fn with_log_level(mut self, log_level: LevelFilter) -> Self {
        self.log_level = log_level;
        self
    }

    pub(crate) fn traces(&self) -> bool {
        self.log_level >= LevelFilter::DEBUG
    }
}
