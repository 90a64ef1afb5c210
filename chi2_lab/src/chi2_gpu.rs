use chi2_core::{ModelParameters, ObservationTriple};
use glam::Vec3;

/// GPU-facing layout for one observation pair (std430-friendly).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObservationGpu {
    pub x: [f32; 4],
    pub y: [f32; 4],
}

const _: () = assert!(core::mem::size_of::<ObservationGpu>() == 32);

impl ObservationGpu {
    pub fn new(x: &ObservationTriple, y: &ObservationTriple) -> Self {
        Self {
            x: Vec3::from_array(*x).extend(0.0).to_array(),
            y: Vec3::from_array(*y).extend(0.0).to_array(),
        }
    }
}

/// Uniform block consumed by the chi2 compute kernel.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Chi2ConfigGpu {
    pub count: [u32; 4],
    pub params: [f32; 4],
}

impl Chi2ConfigGpu {
    pub fn new(count: u32, params: ModelParameters) -> Self {
        Self {
            count: [count, 0, 0, 0],
            params: [params.m, params.q, 0.0, 0.0],
        }
    }
}

pub fn pack_observations(x: &[ObservationTriple], y: &[ObservationTriple]) -> Vec<ObservationGpu> {
    x.iter()
        .zip(y.iter())
        .map(|(x, y)| ObservationGpu::new(x, y))
        .collect()
}
