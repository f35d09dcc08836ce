pub mod emit_price;
pub mod initialize;
pub mod stake;
pub mod unstake;
pub mod withdraw_nested;

pub use emit_price::*;
pub use initialize::*;
pub use stake::*;
pub use unstake::*;
pub use withdraw_nested::*;
