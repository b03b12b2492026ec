pub mod protocol;
pub mod transform;
