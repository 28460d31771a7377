//! Phoenix Flame: a torch with a small pool of additive fire sprites.
pub mod glow;
pub mod particle;
pub mod system;
