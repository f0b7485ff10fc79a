/// Front-end display state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Enable debug mode
    pub debug: bool,
    /// Simulation paused
    pub paused: bool,
    /// Wireframe mode enabled
    pub wireframe: bool,
    /// Zoom level
    pub zoom: f64,
    /// Light position in world space
    pub light_position: [f64; 3],
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            debug: false,
            paused: false,
            wireframe: false,
            zoom: 1.0,
            light_position: [2.0, 2.0, -5.0],
        }
    }
}
