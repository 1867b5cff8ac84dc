//! Production [`MilpBackend`](welfaresel_core::lp::MilpBackend) implementations.

mod microlp;

pub use microlp::MicroLpBackend;
