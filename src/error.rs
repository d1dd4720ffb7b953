//! Errors raised at the platform boundary
//!
//! The simulation itself never fails; only GPU setup, frame presentation and
//! config loading can.

/// Crate error type
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Surface texture could not be acquired for this frame
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    /// Canvas/window surface could not be created
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    /// No compatible GPU adapter
    #[error("no compatible adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    /// Device request rejected by the adapter
    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// Malformed config or settings JSON
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Config file could not be read
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the surface should be reconfigured before the next frame
    pub fn needs_reconfigure(&self) -> bool {
        matches!(
            self,
            Error::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_lost_needs_reconfigure() {
        assert!(Error::Surface(wgpu::SurfaceError::Lost).needs_reconfigure());
        assert!(Error::Surface(wgpu::SurfaceError::Outdated).needs_reconfigure());
        assert!(!Error::Surface(wgpu::SurfaceError::Timeout).needs_reconfigure());
    }

    #[test]
    fn test_config_error_message() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::from(err);
        assert!(err.to_string().starts_with("config error"));
    }
}
