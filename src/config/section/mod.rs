//! Configuration section definitions.

mod images;
mod minify;

pub use images::ImagesConfig;
pub use minify::{MinifyConfig, minified_name};
