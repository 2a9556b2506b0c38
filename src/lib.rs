//! First person grid raycaster.
//!
//! A [`Map`] of tile codes and a [`Player`] go in, a list of [`DrawCommand`]s
//! for one frame comes out. Walls are found by a [`Caster`] (grid traversal, or
//! fixed-step marching as a cross-check) and turned into screen slabs by a
//! [`Projector`]. Nothing here touches a window; see the `sdl` feature for that.

pub mod caster;
pub mod config;
pub mod frame;
pub mod map;
pub mod player;
pub mod projection;
pub mod ray;
pub mod timing;

pub use caster::{Cast, CastStats, Caster, Strategy};
pub use config::Config;
pub use frame::{render_frame, DrawCommand, Frame, FrameStats, Overlay, Rect};
pub use map::{levels, Map};
pub use player::{normalize_angle, Intent, Player};
pub use projection::{Projector, Rgb, ShadingMode, WallSlab};
pub use ray::{Hit, Ray, Side};
pub use timing::FrameTimes;
