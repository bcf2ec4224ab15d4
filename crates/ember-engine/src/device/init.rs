/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// FIFO is vsync-locked and supported everywhere.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is
    /// selected instead.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Adapter power preference.
    pub power_preference: wgpu::PowerPreference,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::HighPerformance,
            desired_maximum_frame_latency: 2,
        }
    }
}

/// Down-scopes adapter limits to what the demo actually uses.
///
/// Requesting minimal limits keeps the device request valid on the widest
/// range of hardware. Limits the demo does not exercise pass through from the
/// adapter unchanged; in particular texture dimensions stay untouched because
/// the swapchain textures count against them.
pub fn required_limits(supported: wgpu::Limits) -> wgpu::Limits {
    wgpu::Limits {
        // Interleaved position + uv, one vertex stream.
        max_vertex_attributes: 2,
        max_vertex_buffers: 1,
        max_vertex_buffer_array_stride: (4 * std::mem::size_of::<f32>()) as u32,
        max_buffer_size: 64 << 10,
        // One bind group: uniform buffer, sampled texture, sampler.
        max_bind_groups: 1,
        max_bindings_per_bind_group: 3,
        max_uniform_buffers_per_shader_stage: 1,
        max_uniform_buffer_binding_size: 256,
        max_sampled_textures_per_shader_stage: 1,
        max_samplers_per_shader_stage: 1,
        ..supported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_init_is_fifo_and_srgb() {
        let init = GpuInit::default();
        assert!(init.prefer_srgb);
        assert_eq!(init.present_mode, wgpu::PresentMode::Fifo);
        assert_eq!(init.alpha_mode, None);
    }

    #[test]
    fn limits_are_downscoped_to_demo_needs() {
        let limits = required_limits(wgpu::Limits::default());

        assert_eq!(limits.max_vertex_attributes, 2);
        assert_eq!(limits.max_vertex_buffers, 1);
        assert_eq!(limits.max_vertex_buffer_array_stride, 16);
        assert_eq!(limits.max_buffer_size, 64 << 10);
        assert_eq!(limits.max_bind_groups, 1);
        assert_eq!(limits.max_bindings_per_bind_group, 3);
        assert_eq!(limits.max_uniform_buffers_per_shader_stage, 1);
        assert_eq!(limits.max_uniform_buffer_binding_size, 256);
        assert_eq!(limits.max_sampled_textures_per_shader_stage, 1);
        assert_eq!(limits.max_samplers_per_shader_stage, 1);
    }

    #[test]
    fn surface_sized_limits_pass_through() {
        let supported = wgpu::Limits::default();
        let limits = required_limits(supported.clone());

        assert_eq!(
            limits.max_texture_dimension_2d,
            supported.max_texture_dimension_2d
        );
        assert_eq!(limits.max_texture_dimension_1d, supported.max_texture_dimension_1d);
    }
}
