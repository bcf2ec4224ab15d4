use bytemuck::{Pod, Zeroable};

/// Per-frame shader uniforms.
///
/// Layout must match `shaders/quad.wgsl` exactly: `tint` is a `vec4<f32>` and
/// therefore 16-byte aligned, which the explicit padding guarantees on the
/// Rust side.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub aspect: f32,
    pub gamma: f32,
    pub _pad: [f32; 2],
    pub tint: [f32; 4],
}

impl Uniforms {
    pub fn new(aspect: f32, gamma: f32, tint: [f32; 4]) -> Self {
        Self {
            aspect,
            gamma,
            _pad: [0.0; 2],
            tint,
        }
    }

    /// Minimum binding size for the uniform buffer.
    pub fn min_binding_size() -> std::num::NonZeroU64 {
        std::num::NonZeroU64::new(std::mem::size_of::<Self>() as u64)
            .expect("Uniforms has non-zero size by construction")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, size_of};

    #[test]
    fn matches_wgsl_layout() {
        // scalar pair + pad + vec4 = 32 bytes, vec4 at offset 16.
        assert_eq!(size_of::<Uniforms>(), 32);
        assert_eq!(std::mem::offset_of!(Uniforms, tint), 16);
        assert_eq!(align_of::<Uniforms>(), 4);
    }

    #[test]
    fn min_binding_size_is_struct_size() {
        assert_eq!(Uniforms::min_binding_size().get(), 32);
    }
}
