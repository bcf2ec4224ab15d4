/// High-level response after a surface-texture acquisition error.
///
/// Acquisition failures never end the session; the worst case is one skipped
/// frame per tick. Device loss is the only session-fatal condition and is
/// reported through its own callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured for the current window size; skip this frame
    /// and retry on the next tick.
    Reconfigured,
    /// Skip the current frame; the next tick retries normally.
    SkipFrame,
}

/// Classifies a surface acquisition error.
///
/// Stale surfaces (resize in flight) want reconfiguration; everything else,
/// out-of-memory included, costs one frame.
pub(crate) fn classify_surface_error(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost
        | wgpu::SurfaceError::Outdated
        | wgpu::SurfaceError::Timeout => SurfaceErrorAction::Reconfigured,
        _ => SurfaceErrorAction::SkipFrame,
    }
}

pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        for f in preferred {
            if formats.contains(&f) {
                return Some(f);
            }
        }
    }

    Some(formats[0])
}

pub(crate) fn choose_alpha_mode(
    modes: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| modes.contains(m))
        .or_else(|| modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode, TextureFormat};

    // ── surface format ────────────────────────────────────────────────────

    #[test]
    fn prefers_bgra_srgb_when_available() {
        let formats = [
            TextureFormat::Rgba8Unorm,
            TextureFormat::Rgba8UnormSrgb,
            TextureFormat::Bgra8UnormSrgb,
        ];
        assert_eq!(
            choose_surface_format(&formats, true),
            Some(TextureFormat::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn falls_back_to_first_format_without_srgb() {
        let formats = [TextureFormat::Rgba16Float, TextureFormat::Rgba8Unorm];
        assert_eq!(
            choose_surface_format(&formats, true),
            Some(TextureFormat::Rgba16Float)
        );
    }

    #[test]
    fn srgb_preference_can_be_disabled() {
        let formats = [TextureFormat::Rgba8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(
            choose_surface_format(&formats, false),
            Some(TextureFormat::Rgba8Unorm)
        );
    }

    #[test]
    fn empty_format_list_is_none() {
        assert_eq!(choose_surface_format(&[], true), None);
    }

    // ── alpha mode ────────────────────────────────────────────────────────

    #[test]
    fn honors_supported_request() {
        let modes = [CompositeAlphaMode::Opaque, CompositeAlphaMode::PreMultiplied];
        assert_eq!(
            choose_alpha_mode(&modes, Some(CompositeAlphaMode::PreMultiplied)),
            CompositeAlphaMode::PreMultiplied
        );
    }

    #[test]
    fn unsupported_request_falls_back_to_first_supported() {
        let modes = [CompositeAlphaMode::Opaque];
        assert_eq!(
            choose_alpha_mode(&modes, Some(CompositeAlphaMode::PostMultiplied)),
            CompositeAlphaMode::Opaque
        );
    }

    #[test]
    fn no_modes_means_auto() {
        assert_eq!(choose_alpha_mode(&[], None), CompositeAlphaMode::Auto);
    }

    // ── surface error classification ──────────────────────────────────────

    #[test]
    fn stale_surfaces_want_reconfiguration() {
        for err in [
            wgpu::SurfaceError::Lost,
            wgpu::SurfaceError::Outdated,
            wgpu::SurfaceError::Timeout,
        ] {
            assert_eq!(
                classify_surface_error(&err),
                SurfaceErrorAction::Reconfigured
            );
        }
    }

    #[test]
    fn out_of_memory_costs_one_frame_not_the_session() {
        assert_eq!(
            classify_surface_error(&wgpu::SurfaceError::OutOfMemory),
            SurfaceErrorAction::SkipFrame
        );
    }

    #[test]
    fn other_errors_skip_the_frame() {
        assert_eq!(
            classify_surface_error(&wgpu::SurfaceError::Other),
            SurfaceErrorAction::SkipFrame
        );
    }
}
