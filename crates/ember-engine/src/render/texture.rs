use anyhow::Result;

/// Sampled 2D texture plus its view and sampler.
///
/// Populated by a single queued write at creation and immutable afterwards;
/// no mipmapping or streaming.
pub struct DemoTexture {
    // Declaration order is drop order: view and sampler before the texture.
    sampler: wgpu::Sampler,
    view: wgpu::TextureView,
    texture: wgpu::Texture,
}

impl DemoTexture {
    /// Creates an RGBA8 texture from tightly packed host pixels.
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "texture has zero size");
        anyhow::ensure!(
            pixels.len() == (4 * width * height) as usize,
            "pixel data length {} does not match {width}x{height} rgba8",
            pixels.len()
        );

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ember demo texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        // The byte layout of the source data must match the destination
        // region exactly: one row is 4 * width bytes, `height` rows total.
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ember demo sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            sampler,
            view,
            texture,
        })
    }

    /// Creates the demo checkerboard texture.
    pub fn checkerboard(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: u32,
        cell: u32,
    ) -> Result<Self> {
        let pixels = checkerboard_pixels(size, cell);
        Self::from_rgba8(device, queue, &pixels, size, size)
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.texture.format()
    }
}

/// Generates `size` x `size` RGBA8 checkerboard pixels with `cell`-pixel cells.
pub fn checkerboard_pixels(size: u32, cell: u32) -> Vec<u8> {
    let cell = cell.max(1);
    let mut pixels = Vec::with_capacity((4 * size * size) as usize);

    for y in 0..size {
        for x in 0..size {
            let light = ((x / cell) + (y / cell)) % 2 == 0;
            if light {
                pixels.extend_from_slice(&[0xe8, 0xe0, 0xd0, 0xff]);
            } else {
                pixels.extend_from_slice(&[0x50, 0x38, 0x30, 0xff]);
            }
        }
    }

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_is_tightly_packed_rgba8() {
        let pixels = checkerboard_pixels(8, 2);
        assert_eq!(pixels.len(), 4 * 8 * 8);
    }

    #[test]
    fn checkerboard_alternates_per_cell() {
        let pixels = checkerboard_pixels(4, 2);

        let at = |x: usize, y: usize| &pixels[4 * (y * 4 + x)..4 * (y * 4 + x) + 4];
        // Same cell, same color; next cell over flips.
        assert_eq!(at(0, 0), at(1, 1));
        assert_ne!(at(0, 0), at(2, 0));
        assert_eq!(at(2, 0), at(0, 2));
    }

    #[test]
    fn checkerboard_is_opaque() {
        let pixels = checkerboard_pixels(3, 1);
        assert!(pixels.chunks_exact(4).all(|px| px[3] == 0xff));
    }
}
