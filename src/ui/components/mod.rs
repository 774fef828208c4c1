pub mod alert;
pub mod charts;
pub mod confirm;
pub mod estimate_display;
pub mod loading;
pub mod stat_card;
pub mod toast;
pub mod tooltip;
