// Re-export glam for convenience
pub use glam::*;

// Pinhole math types
mod ray;
pub use ray::Ray;
