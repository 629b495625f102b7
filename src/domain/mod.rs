pub mod item;
pub mod review;
pub mod state;

pub use item::ReviewableItem;
pub use review::Grade;
pub use state::ReviewState;
