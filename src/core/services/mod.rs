pub mod health;
pub mod identity;

pub use health::HealthService;
pub use identity::FaceAuthService;
