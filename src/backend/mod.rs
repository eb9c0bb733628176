pub use burn::{
    backend::ndarray::{NdArray, NdArrayDevice},
    tensor::backend::Backend,
};

use burn::backend::autodiff;

pub type Autodiff<B> = autodiff::Autodiff<B>;
