/// Vertex structure with world position and projected screen position
pub struct Vertex {
    pub position: [f64; 3],
    pub screen_position: [f64; 2],
}
