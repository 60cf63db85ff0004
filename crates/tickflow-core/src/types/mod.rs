//! Market data payload types.

mod candle;
mod level1;

pub use candle::Candle;
pub use level1::{Level1Field, Level1Update};
