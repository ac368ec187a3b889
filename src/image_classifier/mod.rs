pub mod confidence;
pub mod impl_fake;
pub mod impl_tract;
pub mod interface;
pub mod pipeline;
pub mod postprocess;
pub mod preprocess;
