mod arguments;
mod dependency;
mod object;
mod options;

pub use arguments::*;
pub use dependency::*;
pub use object::*;
pub use options::*;
