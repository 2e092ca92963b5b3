mod price;
mod tracked_item;

pub use price::{PriceBook, PriceQuote};
pub use tracked_item::{TrackedItem, TrackedItems};
