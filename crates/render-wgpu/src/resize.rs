/// Surface size in physical pixels (already scaled by the device pixel ratio).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    /// Zero-sized surfaces are not allowed by wgpu, so each side is at least 1.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Queues resize requests from the window and hands them to the renderer at
/// the next frame boundary.
///
/// Several requests between two frames collapse into the last one, and a
/// request for the current size is dropped, so each frame triggers at most
/// one surface reconfigure and depth-target rebuild.
#[derive(Debug, Clone)]
pub struct ResizeTracker {
    current: SurfaceSize,
    pending: Option<SurfaceSize>,
    recreations: u64,
}

impl ResizeTracker {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            current: size,
            pending: None,
            recreations: 0,
        }
    }

    pub fn current(&self) -> SurfaceSize {
        self.current
    }

    /// Number of resizes applied so far.
    pub fn recreations(&self) -> u64 {
        self.recreations
    }

    pub fn request(&mut self, size: SurfaceSize) {
        self.pending = Some(size);
    }

    /// Take the pending size if it differs from the current one.
    pub fn take_resize(&mut self) -> Option<SurfaceSize> {
        let size = self.pending.take().filter(|s| *s != self.current)?;
        self.current = size;
        self.recreations += 1;
        Some(size)
    }
}
