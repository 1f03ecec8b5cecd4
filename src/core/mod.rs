// Core modules: document model, decoders, the generic tree, and error modeling.
pub mod decode;
pub mod error;
pub mod fields;
pub mod node;
pub mod paint;
pub mod text;
pub mod tree;
pub mod value;
