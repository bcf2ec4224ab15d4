/// Represents a single acquired surface frame.
///
/// This object lives for exactly one tick. It must be finalized promptly:
/// holding the surface texture blocks acquisition of subsequent frames, and
/// the view has to be dropped before the texture it was created from.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
