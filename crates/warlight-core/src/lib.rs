pub mod belief;
pub mod map;
pub mod standing;
