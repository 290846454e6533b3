//! GROUNDTRACK - autonomous ground-track sampling loop.
//!
//! Fixed-duration experiment controller for an orbiting platform: each cycle
//! reads the magnetometer, computes the ground-track position and the sun's
//! apparent altitude/azimuth for that point and instant, captures a
//! geotagged photograph, and appends one row to the sample log. Two
//! consecutive night-side photos (by brightness) make the loop reuse the
//! photo slot instead of advancing it, stretching a limited storage budget
//! through orbital night while still logging every cycle.
//!
//! Hardware and time sit behind traits ([`position::GroundTrack`],
//! [`sensor::FieldSensor`], [`camera::CameraSink`],
//! [`controller::TimeSource`]); production wiring binds real drivers, tests
//! bind the deterministic fakes in [`mock`].

pub mod camera;
pub mod config;
pub mod controller;
pub mod error;
pub mod geotag;
pub mod mock;
pub mod night;
pub mod position;
pub mod recorder;
pub mod sensor;
pub mod solar;
pub mod state;
pub mod store;

pub use crate::config::RunConfig;
pub use crate::controller::{LoopController, RunSummary, SystemClock, TimeSource};
pub use crate::error::{Result, SamplerError};
pub use crate::state::{LoopState, NightFlag, RunPhase};
