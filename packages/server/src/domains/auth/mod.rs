pub mod jwt;
pub mod routes;

pub use jwt::{Claims, JwtService};
