pub mod buffer;
pub mod channel;
pub mod histogram;
pub mod isolate;
pub mod split;

pub use buffer::*;
pub use channel::*;
pub use histogram::*;
pub use isolate::*;
pub use split::*;
