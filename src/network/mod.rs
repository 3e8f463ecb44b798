pub mod archive;
pub mod gradcheck;
pub mod network;
pub mod spec;

pub use archive::ParameterArchive;
pub use gradcheck::{check_gradients, numerical_gradients, GradientCheck};
pub use network::{BackProp, LayerGradients, Network};
pub use spec::NetworkSpec;
