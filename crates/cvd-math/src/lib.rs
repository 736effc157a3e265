//! CVD risk math utilities.

pub mod math;

pub use math::composition::*;
pub use math::rounding::*;
pub use math::survival::*;
