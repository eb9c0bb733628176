pub use super::*;

#[derive(Clone, Debug)]
pub struct RenderInput<B: Backend> {
    /// `[N, F, 3]`
    pub faces: Tensor<B, 3, Int>,
    /// `[N, V, 3]`
    pub vertices: Tensor<B, 3>,
}

#[derive(Clone, Debug)]
pub struct RenderOutput<B: Backend> {
    /// `[N, I_y, I_x]`
    pub depth_maps: Tensor<B, 3>,
    /// `[N, I_y, I_x]`
    pub face_index_maps: Tensor<B, 3, Int>,
    /// `[N, I_y, I_x]`
    pub silhouettes: Tensor<B, 3>,
    pub state: backward::RenderInput<B>,
}
