//! Keyboard Input Module
//!
//! Contains keyboard state tracking for the avatar's movement keys and the
//! jump-input edge latch. Decoupled from the windowing system via generic
//! key codes.

/// Generic key codes for the keys the simulator binds, independent of the
/// windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Movement keys
    W,
    A,
    S,
    D,
    Space,
    ShiftLeft,
    ShiftRight,

    /// Hover key (rise steadily, skipping normal physics)
    H,

    /// Catch-all for unhandled keys
    Unknown,
}

/// Tracks the current state of the avatar's movement keys.
///
/// The GUI shell forwards raw key events through [`MovementKeys::handle_key`];
/// the simulation reads the booleans once per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementKeys {
    /// W key - walk camera-forward
    pub forward: bool,
    /// S key - walk camera-backward
    pub backward: bool,
    /// A key - strafe left
    pub left: bool,
    /// D key - strafe right
    pub right: bool,
    /// Shift - sprint
    pub sprint: bool,
    /// Space - jump (held state; edge detection happens in [`JumpEdge`])
    pub jump: bool,
    /// H - hover (rise steadily, skipping normal physics)
    pub hover: bool,
}

impl MovementKeys {
    /// Create a new movement keys state with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update movement state based on a key press/release.
    ///
    /// Returns `true` if the key was a movement key and was handled,
    /// `false` otherwise.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::W => {
                self.forward = pressed;
                true
            }
            KeyCode::S => {
                self.backward = pressed;
                true
            }
            KeyCode::A => {
                self.left = pressed;
                true
            }
            KeyCode::D => {
                self.right = pressed;
                true
            }
            KeyCode::Space => {
                self.jump = pressed;
                true
            }
            KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                self.sprint = pressed;
                true
            }
            KeyCode::H => {
                self.hover = pressed;
                true
            }
            _ => false,
        }
    }

    /// Check if any directional key is currently pressed.
    pub fn any_direction(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Forward axis as -1, 0, or 1 (W minus S).
    pub fn forward_axis(&self) -> i32 {
        (self.forward as i32) - (self.backward as i32)
    }

    /// Right axis as -1, 0, or 1 (D minus A).
    pub fn right_axis(&self) -> i32 {
        (self.right as i32) - (self.left as i32)
    }
}

/// Edge-detected jump input.
///
/// The retail game only arms a jump on jump-key *release*: holding the key
/// across a landing never buffers another jump. `armed` starts false, so a
/// press before the first release does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct JumpEdge {
    /// Whether the jump key is currently held.
    pub held: bool,
    /// True once the key has been released; cleared when a jump is consumed.
    pub armed: bool,
}

impl JumpEdge {
    /// Create a new latch; disarmed until the first release.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current held state for this tick.
    pub fn update(&mut self, held: bool) {
        if self.held && !held {
            self.armed = true;
        }
        self.held = held;
    }

    /// True when a jump may start this tick (key held and latch armed).
    pub fn wants_jump(&self) -> bool {
        self.held && self.armed
    }

    /// Consume the armed latch when a jump starts.
    pub fn consume(&mut self) {
        self.armed = false;
    }
}
