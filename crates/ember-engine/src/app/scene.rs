use anyhow::Result;
use winit::window::Window;

use crate::device::{ErrorSink, Gpu, GpuFrame, GpuInit};
use crate::render::{DemoTexture, Mesh, QuadPipeline, Uniforms};

/// Interleaved x, y, u, v for a centered quad (counter-clockwise winding).
const QUAD_VERTICES: [f32; 16] = [
    -0.5, -0.5, 0.0, 1.0, //
    0.5, -0.5, 1.0, 1.0, //
    0.5, 0.5, 1.0, 0.0, //
    -0.5, 0.5, 0.0, 0.0,
];

const QUAD_COMPONENTS: [u32; 2] = [2, 2];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

const TEXTURE_SIZE: u32 = 64;
const TEXTURE_CELL: u32 = 8;

/// GPU context plus every resource the demo pass needs.
///
/// Construction order is fixed: context → mesh → texture → uniform buffer →
/// pipeline → binding group; any step failing aborts the rest. Declaration
/// order is the reverse, because declaration order is drop order and teardown
/// must mirror creation (the surface/device exception inside [`Gpu`] is
/// handled there).
pub struct Scene<'w> {
    bindings: wgpu::BindGroup,
    pipeline: QuadPipeline,
    uniforms: wgpu::Buffer,
    // Kept alive for the bind group; released between the uniform buffer and
    // the mesh on teardown.
    texture: DemoTexture,
    mesh: Mesh,
    gpu: Gpu<'w>,
}

impl<'w> Scene<'w> {
    pub async fn new(window: &'w Window, init: GpuInit, errors: ErrorSink) -> Result<Self> {
        let gpu = Gpu::new(window, init, errors).await?;

        let mesh = Mesh::new(
            gpu.device(),
            &QUAD_VERTICES,
            &QUAD_COMPONENTS,
            Some(&QUAD_INDICES),
        )?;

        let texture =
            DemoTexture::checkerboard(gpu.device(), gpu.queue(), TEXTURE_SIZE, TEXTURE_CELL)?;

        let uniforms = gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("ember uniform buffer"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let pipeline = QuadPipeline::new(gpu.device(), gpu.surface_format(), mesh.layout());
        let bindings = pipeline.bind(gpu.device(), &uniforms, &texture);

        Ok(Self {
            bindings,
            pipeline,
            uniforms,
            texture,
            mesh,
            gpu,
        })
    }

    pub fn gpu(&self) -> &Gpu<'w> {
        &self.gpu
    }

    pub fn gpu_mut(&mut self) -> &mut Gpu<'w> {
        &mut self.gpu
    }

    /// Records the demo pass into `frame`: uniform update, clear, one indexed
    /// draw over the quad.
    pub fn render(&self, frame: &mut GpuFrame, clear: wgpu::Color, uniforms: &Uniforms) {
        self.gpu
            .queue()
            .write_buffer(&self.uniforms, 0, bytemuck::bytes_of(uniforms));

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ember quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(self.pipeline.pipeline());
        rpass.set_bind_group(0, &self.bindings, &[]);
        rpass.set_vertex_buffer(0, self.mesh.vertex_buffer().slice(..));

        match self.mesh.index_buffer() {
            Some(index_buffer) => {
                rpass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..self.mesh.index_count(), 0, 0..1);
            }
            None => rpass.draw(0..self.mesh.layout().vertex_count(), 0..1),
        }
    }
}
