
pub use faulty::Faulty;

pub use log::*;
