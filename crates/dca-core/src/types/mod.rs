//! 시뮬레이터 전반에서 사용되는 공통 타입.

mod decimal;
mod price;

pub use decimal::*;
pub use price::*;
