pub mod dashboard;
pub mod pickup;
pub mod settings;

pub use dashboard::DashboardPage;
pub use pickup::PickupPage;
pub use settings::SettingsPage;
