use std::fmt;
use viewer_assets::AssetError;

/// Renderer setup stages, in the order they run. Each depends on the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SetupStage {
    Device,
    BindGroupLayouts,
    Assets,
    DepthBuffer,
    Pipeline,
    BindGroup,
}

impl SetupStage {
    pub const ALL: [SetupStage; 6] = [
        Self::Device,
        Self::BindGroupLayouts,
        Self::Assets,
        Self::DepthBuffer,
        Self::Pipeline,
        Self::BindGroup,
    ];
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Device => "device",
            Self::BindGroupLayouts => "bind group layouts",
            Self::Assets => "assets",
            Self::DepthBuffer => "depth buffer",
            Self::Pipeline => "pipeline",
            Self::BindGroup => "bind group",
        };
        f.write_str(name)
    }
}

/// Why a setup stage failed.
#[derive(Debug, thiserror::Error)]
pub enum SetupFailure {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    UnsupportedSurface,
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("validation error: {0}")]
    Validation(String),
}

/// Errors from the render backend.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("renderer setup failed at {stage} stage: {source}")]
    Setup {
        stage: SetupStage,
        #[source]
        source: SetupFailure,
    },
    #[error("out of memory while acquiring the next surface texture")]
    OutOfMemory,
}

impl RenderError {
    /// The setup stage that failed, if this is a setup error.
    pub fn stage(&self) -> Option<SetupStage> {
        match self {
            Self::Setup { stage, .. } => Some(*stage),
            Self::OutOfMemory => None,
        }
    }
}

/// Tag a setup result with the stage it belongs to.
pub(crate) trait AtStage<T> {
    fn at(self, stage: SetupStage) -> Result<T, RenderError>;
}

impl<T, E: Into<SetupFailure>> AtStage<T> for Result<T, E> {
    fn at(self, stage: SetupStage) -> Result<T, RenderError> {
        self.map_err(|e| RenderError::Setup {
            stage,
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_ordered() {
        let mut sorted = SetupStage::ALL;
        sorted.sort();
        assert_eq!(sorted, SetupStage::ALL);
        assert_eq!(SetupStage::ALL[0], SetupStage::Device);
        assert_eq!(SetupStage::ALL[5], SetupStage::BindGroup);
    }

    #[test]
    fn setup_error_names_stage() {
        let result: Result<(), SetupFailure> = Err(SetupFailure::NoAdapter);
        let err = result.at(SetupStage::Device).unwrap_err();
        assert_eq!(err.stage(), Some(SetupStage::Device));
        let message = err.to_string();
        assert!(message.contains("device stage"), "{message}");
    }

    #[test]
    fn asset_errors_convert() {
        let result: Result<(), AssetError> = Err(AssetError::EmptyMesh("pot".into()));
        let err = result.at(SetupStage::Assets).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Setup {
                stage: SetupStage::Assets,
                source: SetupFailure::Asset(_)
            }
        ));
    }
}
