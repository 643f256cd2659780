pub mod delay;
pub mod page_driver;

pub use page_driver::PageDriver;
