pub mod page;
#[cfg(feature = "viewer")]
pub mod window;
