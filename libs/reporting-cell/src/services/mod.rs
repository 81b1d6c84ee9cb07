pub mod dashboard;
pub mod payments;

pub use dashboard::DashboardService;
pub use payments::PaymentsReportService;
