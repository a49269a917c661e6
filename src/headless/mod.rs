//! Headless rendering engine
//!
//! A dependency-free implementation of [`MapEngine`](crate::traits::MapEngine)
//! and [`MapFactory`](crate::traits::MapFactory) that renders nothing but
//! models load state, render events, projection and attached controls.

pub mod factory;
pub mod map;

pub use factory::HeadlessFactory;
pub use map::HeadlessMap;
