/// Initialization parameters for the GPU layer.
///
/// The mesh renderer needs no optional wgpu features, so none can be asked for.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// FIFO is supported everywhere and paces the AR frame loop to vsync.
    pub present_mode: wgpu::PresentMode,

    /// Falls back to a supported mode when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub power_preference: wgpu::PowerPreference,

    /// Frames the presentation engine may queue. Lower means fresher viewer poses.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::HighPerformance,
            desired_maximum_frame_latency: 1,
        }
    }
}
