//! 재고 운영을 위한 도메인 모델.

mod movement;
mod order;
mod product;
mod user;

pub use movement::*;
pub use order::*;
pub use product::*;
pub use user::*;
