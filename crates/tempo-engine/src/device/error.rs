/// What the window system should do after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; the next frame can be acquired normally.
    Reconfigured,
    /// Transient error; drop this frame and keep looping.
    SkipFrame,
    /// Unrecoverable (commonly OOM); ask the window to close.
    Fatal,
}
