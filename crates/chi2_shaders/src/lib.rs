//! WGSL sources for the GPU execution of the chi-squared batch kernel.

pub mod compute {
    pub const CHI2_BATCH: &str = include_str!("kernels/chi2_batch.wgsl");

    /// Entry point name inside [`CHI2_BATCH`].
    pub const CHI2_BATCH_ENTRY: &str = "chi2_batch_kernel";

    /// Must match `@workgroup_size` in [`CHI2_BATCH`].
    pub const CHI2_WORKGROUP_SIZE: u32 = 64;
}
