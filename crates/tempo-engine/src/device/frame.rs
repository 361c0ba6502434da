/// A single acquired frame being recorded.
///
/// Short-lived: holding the surface texture blocks acquisition of the next one.
/// After [`Gpu::submit`](super::Gpu::submit) the texture is parked on the `Gpu`
/// until the window system presents it.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
