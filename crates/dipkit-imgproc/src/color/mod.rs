mod binary;
mod gray;
mod hsv;

pub use binary::*;
pub use gray::*;
pub use hsv::*;
