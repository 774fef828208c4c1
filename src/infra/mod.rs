pub mod kawadi;
pub mod markup;
pub mod refresher;
