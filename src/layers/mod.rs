pub mod traits;
pub mod dense;
pub mod initialization;

pub use traits::Layer as LayerTrait;
pub use dense::DenseLayer;
pub use initialization::he_normal;
