/// Surface and device preferences for [`Gpu::new`](super::Gpu::new).
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends the instance may pick from.
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,

    /// Use an sRGB surface format when the surface offers one, otherwise a
    /// format without sRGB encoding.
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,

    /// Falls back to the first supported mode when unsupported or `None`.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Hint passed through to the surface configuration.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: true,
            // FIFO is the only mode every surface supports.
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
