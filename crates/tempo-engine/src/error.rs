use std::fmt;

/// Startup phase that failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InitStage {
    /// Rate or window configuration was rejected.
    Config,
    /// The platform window (or its event loop) could not be created.
    Window,
    /// The graphics device/surface could not be brought up.
    Graphics,
    /// The renderer's own `init` failed.
    Renderer,
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InitStage::Config => "configuration",
            InitStage::Window => "window",
            InitStage::Graphics => "graphics context",
            InitStage::Renderer => "renderer",
        };
        f.write_str(name)
    }
}

/// Unrecoverable startup failure.
///
/// Never retried: these come from the environment (no display, no usable
/// GPU adapter) rather than from anything the loop can fix.
#[derive(Debug)]
pub struct FatalInitError {
    pub stage: InitStage,
    pub source: anyhow::Error,
}

impl FatalInitError {
    pub fn new(stage: InitStage, source: impl Into<anyhow::Error>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

impl fmt::Display for FatalInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to initialize {}: {:#}", self.stage, self.source)
    }
}

impl std::error::Error for FatalInitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let source: &(dyn std::error::Error + 'static) = &*self.source;
        Some(source)
    }
}
