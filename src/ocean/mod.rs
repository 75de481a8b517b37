//! Ocean and pool scenes: one height-field generator plus optional caustics.

mod hooks;
mod system;

// Re-export public types
pub use hooks::ShaderReload;
pub use system::OceanController;

/// Scene toggles consumed by the render layer
///
/// Caustics are only recomputed while both `draw_sea_floor` and
/// `enable_caustics` are set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawFlags {
    pub draw_sea_surface: bool,
    pub draw_sea_floor: bool,
    pub enable_caustics: bool,
}

impl Default for DrawFlags {
    fn default() -> Self {
        Self {
            draw_sea_surface: true,
            draw_sea_floor: true,
            enable_caustics: true,
        }
    }
}

impl DrawFlags {
    /// Whether the caustic texture needs refreshing this frame
    pub fn caustics_active(&self) -> bool {
        self.draw_sea_floor && self.enable_caustics
    }
}
