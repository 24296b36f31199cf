mod class;
mod factory;
mod injectable;
mod service;

pub use class::*;
pub use factory::*;
pub use injectable::*;
pub use service::*;
