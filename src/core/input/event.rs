//=========================================================================
// Input Events
//=========================================================================
//
// The engine's own vocabulary for keyboard and mouse input. The platform
// layer translates window events into these; the keyboard and mouse
// managers fold them into per-frame state.
//
// Only keys some controller binds are named. Anything else is dropped
// at the platform boundary.
//
//=========================================================================

//=== MouseButton =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Picks and clicks menu buttons.
    Left,
    /// Holds and drags picked bodies.
    Middle,
    Right,
}

//=== KeyCode =============================================================

/// Physical key position, independent of layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Movement (WASD set) ----------------------------------------------
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    KeyC,
    Space,

    //--- Movement (arrow set) ---------------------------------------------
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ControlLeft,

    //--- Vehicle ----------------------------------------------------------
    KeyU,
    KeyJ,
    KeyH,
    KeyK,
}

//=== InputEvent ==========================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown { key: KeyCode },
    KeyUp { key: KeyCode },
    MouseButtonDown { button: MouseButton },
    MouseButtonUp { button: MouseButton },

    /// Cursor position in window pixels, top-left origin.
    MouseMoved { x: f32, y: f32 },

    /// Wheel travel in 120ths of a notch; positive rolls away from the user.
    MouseWheel { delta: i32 },
}
