//! Reusable test harnesses for downstream crates

pub mod storage;
