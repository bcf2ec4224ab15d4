use anyhow::Result;
use wgpu::util::DeviceExt;

const FLOAT_SIZE: u64 = std::mem::size_of::<f32>() as u64;

/// Validated interleaved vertex layout.
///
/// Derived from per-attribute component counts: attribute `i` gets shader
/// location `i`, a `Float32xN` format, and a byte offset computed from the
/// attributes before it. Construction fails when the flat element count does
/// not evenly divide into whole vertices.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    components: Vec<u32>,
    offsets: Vec<u64>,
    stride: u64,
    vertex_count: u32,
}

impl VertexLayout {
    pub fn new(components: &[u32], float_count: usize) -> Result<Self> {
        anyhow::ensure!(
            !components.is_empty(),
            "vertex layout needs at least one attribute"
        );
        for &c in components {
            anyhow::ensure!(
                (1..=4).contains(&c),
                "attribute component count {c} is out of range 1..=4"
            );
        }

        let per_vertex: u32 = components.iter().sum();
        anyhow::ensure!(
            float_count % per_vertex as usize == 0,
            "element count {float_count} is not divisible by {per_vertex} components per vertex"
        );

        let mut offsets = Vec::with_capacity(components.len());
        let mut cursor = 0u64;
        for &c in components {
            offsets.push(cursor);
            cursor += u64::from(c) * FLOAT_SIZE;
        }

        Ok(Self {
            components: components.to_vec(),
            offsets,
            stride: cursor,
            vertex_count: (float_count / per_vertex as usize) as u32,
        })
    }

    /// Byte stride of one vertex.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// wgpu attribute descriptors, shader locations assigned in order.
    pub fn attributes(&self) -> Vec<wgpu::VertexAttribute> {
        self.components
            .iter()
            .zip(&self.offsets)
            .enumerate()
            .map(|(location, (&components, &offset))| wgpu::VertexAttribute {
                format: vertex_format(components),
                offset,
                shader_location: location as u32,
            })
            .collect()
    }
}

fn vertex_format(components: u32) -> wgpu::VertexFormat {
    match components {
        1 => wgpu::VertexFormat::Float32,
        2 => wgpu::VertexFormat::Float32x2,
        3 => wgpu::VertexFormat::Float32x3,
        // Counts are validated to 1..=4 at layout construction.
        _ => wgpu::VertexFormat::Float32x4,
    }
}

/// Vertex + optional index buffer pair with its validated layout.
///
/// Buffers are created once from host slices; later updates go through
/// [`Mesh::write_vertices`] as queued writes.
pub struct Mesh {
    vertex: wgpu::Buffer,
    index: Option<wgpu::Buffer>,
    index_count: u32,
    layout: VertexLayout,
}

impl Mesh {
    pub fn new(
        device: &wgpu::Device,
        floats: &[f32],
        components: &[u32],
        indices: Option<&[u16]>,
    ) -> Result<Self> {
        let layout = VertexLayout::new(components, floats.len())?;

        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ember vertex buffer"),
            contents: bytemuck::cast_slice(floats),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let index = indices.map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("ember index buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            })
        });

        Ok(Self {
            vertex,
            index,
            index_count: indices.map_or(0, |i| i.len() as u32),
            layout,
        })
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex
    }

    pub fn index_buffer(&self) -> Option<&wgpu::Buffer> {
        self.index.as_ref()
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Overwrites vertex data starting at float offset `offset_floats`.
    ///
    /// The write is queued and takes effect with the next submission.
    pub fn write_vertices(&self, queue: &wgpu::Queue, offset_floats: usize, floats: &[f32]) {
        queue.write_buffer(
            &self.vertex,
            offset_floats as u64 * FLOAT_SIZE,
            bytemuck::cast_slice(floats),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── layout validation ─────────────────────────────────────────────────

    #[test]
    fn indivisible_element_count_fails() {
        // {2,3} sums to 5 components; 7 floats cannot form whole vertices.
        assert!(VertexLayout::new(&[2, 3], 7).is_err());
    }

    #[test]
    fn divisible_element_count_succeeds() {
        let layout = VertexLayout::new(&[2, 3], 10).expect("valid layout");
        assert_eq!(layout.vertex_count(), 2);
    }

    #[test]
    fn empty_attribute_list_fails() {
        assert!(VertexLayout::new(&[], 8).is_err());
    }

    #[test]
    fn component_count_out_of_range_fails() {
        assert!(VertexLayout::new(&[5], 10).is_err());
        assert!(VertexLayout::new(&[0, 2], 8).is_err());
    }

    // ── derived stride/offsets ────────────────────────────────────────────

    #[test]
    fn stride_and_offsets_are_derived() {
        let layout = VertexLayout::new(&[2, 2], 16).expect("valid layout");
        assert_eq!(layout.stride(), 16);
        assert_eq!(layout.offsets(), &[0, 8]);
        assert_eq!(layout.vertex_count(), 4);
    }

    #[test]
    fn attributes_carry_locations_and_formats() {
        let layout = VertexLayout::new(&[2, 3, 1], 12).expect("valid layout");
        let attrs = layout.attributes();

        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs[0].shader_location, 0);
        assert_eq!(attrs[0].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(attrs[0].offset, 0);
        assert_eq!(attrs[1].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(attrs[1].offset, 8);
        assert_eq!(attrs[2].format, wgpu::VertexFormat::Float32);
        assert_eq!(attrs[2].offset, 20);
    }
}
