//! Render-side collaborators the controller forwards to.

use std::error::Error;

/// Shader reloading owned by the rendering layer
///
/// The controller only forwards requests; compiling and swapping programs is
/// entirely up to the implementor.
pub trait ShaderReload {
    fn reload_shaders(&mut self) -> Result<(), Box<dyn Error>>;
}
