pub use super::*;

#[derive(Clone, Debug)]
pub struct RenderInput<B: Backend> {
    pub device: B::Device,
    /// `N`
    pub batch_size: u32,
    /// `F`
    pub face_count: u32,
    /// `V`
    pub vertex_count: u32,
    /// `I_x`
    pub image_size_x: u32,
    /// `I_y`
    pub image_size_y: u32,
    /// `[N, F, 3]`
    pub faces: Vec<i32>,
    /// `[N, F, 3, 3]`
    pub face_vertices: Vec<f32>,
    /// `[N, I_y, I_x]`
    pub face_index_maps: Vec<i32>,
    /// `[N, I_y, I_x]` (`0` or `255`)
    pub silhouettes: Vec<i32>,
}

#[derive(Clone, Debug)]
pub struct RenderOutput<B: Backend> {
    /// `[N, V, 3]`
    pub vertices_grad: Tensor<B, 3>,
    /// `[N, I_y, I_x]`
    pub debug_grad_maps: Tensor<B, 3>,
}
