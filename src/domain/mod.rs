pub mod app_state;
pub mod entities;
pub mod estimate;
pub mod pickup_form;
pub mod stats;

pub use app_state::{AppState, ClientSettings, DashboardState, PersistedState, PickupPageState};
pub use entities::{
    AlertKind, CategoryOption, ChartData, FlashMessage, ImpactSummary, TrendPoint, WasteCategory,
};
pub use estimate::{
    apply_category_rates, estimate_for_selection, EstimateOutcome, ESTIMATE_HEADING,
};
pub use pickup_form::{FieldMark, FieldMarks, PickupField, PickupForm};
pub use stats::{is_dashboard_path, StatBoard, StatCard, StatKey};
