use std::sync::mpsc;

use anyhow::{bail, Context, Result};
use chi2_core::{Batch, ModelParameters, ObservationTriple, Scalar};
use chi2_shaders::compute::{CHI2_BATCH, CHI2_BATCH_ENTRY, CHI2_WORKGROUP_SIZE};
use tracing::debug;
use wgpu::util::DeviceExt;

use crate::chi2_gpu::{pack_observations, Chi2ConfigGpu};

/// Device, queue and compiled chi2 pipeline. Built once, then reused for
/// every dispatch so [`GpuChi2Runner::run`] covers only upload, compute and
/// readback.
pub struct GpuChi2Runner {
    device: wgpu::Device,
    queue: wgpu::Queue,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::ComputePipeline,
}

impl GpuChi2Runner {
    pub async fn new_async() -> Result<Self> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .context("no compatible GPU adapter found for chi2 lab")?;
        debug!(adapter = ?adapter.get_info().name, "requested GPU adapter");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("chi2_lab_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                ..Default::default()
            })
            .await
            .context("failed to request wgpu device")?;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Chi2BindGroupLayout"),
            entries: &[
                storage_entry(0, true),
                storage_entry(1, false),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Chi2PipelineLayout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Chi2Shader"),
            source: wgpu::ShaderSource::Wgsl(CHI2_BATCH.into()),
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Chi2Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some(CHI2_BATCH_ENTRY),
            compilation_options: Default::default(),
            cache: None,
        });

        Ok(Self {
            device,
            queue,
            bind_group_layout,
            pipeline,
        })
    }

    pub fn new() -> Result<Self> {
        pollster::block_on(Self::new_async())
    }

    /// Runs the chi2 batch kernel as one compute dispatch, one invocation per
    /// observation pair, and reads the results back.
    pub fn run(
        &self,
        x: &[ObservationTriple],
        y: &[ObservationTriple],
        params: ModelParameters,
    ) -> Result<Vec<Scalar>> {
        let batch = Batch::new(x, y)?;
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let count =
            u32::try_from(batch.len()).context("batch too large for a single dispatch")?;
        let workgroups = count.div_ceil(CHI2_WORKGROUP_SIZE);
        let max_workgroups = self.device.limits().max_compute_workgroups_per_dimension;
        if workgroups > max_workgroups {
            bail!(
                "{} observations need {workgroups} workgroups, device allows {max_workgroups}",
                batch.len()
            );
        }

        let payload = pack_observations(batch.x(), batch.y());
        let config = Chi2ConfigGpu::new(count, params);
        let device = &self.device;

        let observation_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Chi2Observations"),
            contents: bytemuck::cast_slice(&payload),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let result_buffer_size =
            (payload.len() * std::mem::size_of::<Scalar>()) as wgpu::BufferAddress;
        let result_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Chi2Results"),
            size: result_buffer_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Chi2Staging"),
            size: result_buffer_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let config_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Chi2Config"),
            contents: bytemuck::bytes_of(&config),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Chi2BindGroup"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: observation_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: result_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: config_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Chi2Encoder"),
        });

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor::default());
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(workgroups, 1, 1);
        }

        encoder.copy_buffer_to_buffer(&result_buffer, 0, &staging_buffer, 0, result_buffer_size);

        self.queue.submit(Some(encoder.finish()));

        let buffer_slice = staging_buffer.slice(..);
        let (tx, rx) = mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = device.poll(wgpu::PollType::Wait);
        rx.recv()
            .context("staging buffer map callback never fired")?
            .context("failed to map chi2 staging buffer")?;

        let data = buffer_slice.get_mapped_range();
        let mapped: &[Scalar] = bytemuck::cast_slice(&data);
        let results = mapped.to_vec();
        drop(data);
        staging_buffer.unmap();

        Ok(results)
    }
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}
