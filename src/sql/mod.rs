//! Template binding: values are always parameters, `{*raw}` text is trusted input.

mod binder;
pub mod params;
pub mod processors;
mod value;
pub use binder::*;
pub use params::bind_all;
pub use value::*;
