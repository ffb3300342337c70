/// Movement keys, independent of physical key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
}

/// A high-level action produced from raw window input.
///
/// The scene and renderer consume actions, never raw input events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// A movement key was pressed or released.
    Move { key: MoveKey, pressed: bool },
    /// Raw mouse motion in pixels.
    Look { dx: f32, dy: f32 },
    /// Grab and hide the cursor so mouse motion drives the camera.
    CapturePointer,
    /// Release a grabbed cursor.
    ReleasePointer,
    /// Show or hide the help overlay.
    ToggleHelp,
    /// Switch between windowed and borderless fullscreen.
    ToggleFullscreen,
}
