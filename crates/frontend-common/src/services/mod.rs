pub mod auth;
pub mod dashboard;
pub mod journal;
pub mod parcelle;
pub mod programme;

pub use auth::AuthService;
pub use dashboard::{ActivityKind, DashboardService, DashboardStats, RecentActivity};
pub use journal::JournalService;
pub use parcelle::ParcelleService;
pub use programme::ProgrammeService;
