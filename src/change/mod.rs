pub mod compute;
pub mod normalize;

pub use compute::{compute_changes, Change, ChangeFormat};
pub use normalize::{normalize, Value, NO_DATA};
