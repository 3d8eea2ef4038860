//! One repository per entity, each owning a clone of the shared pool.

pub mod admins;
pub(crate) mod dates;
pub mod customers;
pub mod customizations;
pub mod dashboard;
pub mod orders;
pub mod products;

pub use admins::AdminRepository;
pub use customers::CustomerRepository;
pub use customizations::CustomizationRepository;
pub use dashboard::DashboardRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
