mod standalone;

pub use standalone::*;
