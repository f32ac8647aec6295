mod aabb;
mod angles;
mod color;
mod ray;

pub use aabb::AABB;
pub use angles::{deg_to_rad3, rad_to_deg3};
pub use color::{Color, ParseColorError};
pub use ray::{intersect_aabb, Ray};
