//! Blink and head-tilt gesture detection from facial landmark streams.
//!
//! This library turns a stream of face landmark frames into two discrete
//! gestures for hands-free control of a review UI:
//! - a blink, from the eye aspect ratio of six points per eye
//! - a head tilt left or right, from the roll of the line between the ears
//!
//! The detection pipeline consists of:
//! 1. Pure landmark geometry (openness ratio, roll angle)
//! 2. Per-gesture classifiers that confirm a signal over consecutive frames,
//!    debounce it and fire once per gesture
//! 3. A session that wraps both classifiers and runs blink calibration
//! 4. A throttled frame pump that feeds the session from a frame source
//!
//! Camera capture and landmark inference are external; frames arrive through
//! the [`pump::FrameSource`] trait.
//!
//! # Examples
//!
//! ## Driving a session directly
//!
//! ```
//! use face_gestures::{
//!     config::Config,
//!     landmarks::{LandmarkFrame, Point},
//!     session::GestureSession,
//! };
//!
//! let mut config = Config::default();
//! config.calibration.enabled = false;
//!
//! let mut session = GestureSession::new(&config);
//! session.start();
//!
//! // A frame without enough points reads as eyes open and head level
//! let frame = LandmarkFrame::new(vec![Point::new(0.5, 0.5); 10]);
//! let outcome = session.evaluate(Some(&frame), 0);
//! assert!(outcome.face_present);
//! assert!(outcome.blink.is_none());
//! assert!(outcome.tilt.is_none());
//!
//! // No face: classifiers keep their state
//! let outcome = session.evaluate(None, 50);
//! assert!(!outcome.face_present);
//! ```
//!
//! ## Geometry
//!
//! ```
//! use face_gestures::{geometry::head_roll_angle, landmarks::Point};
//!
//! let roll = head_roll_angle(Some(Point::new(0.0, 0.0)), Some(Point::new(1.0, 1.0)));
//! assert!((roll - 45.0).abs() < 1e-9);
//! ```

/// Landmark frame, point and index-layout types
pub mod landmarks;

/// Eye openness and head roll computations
pub mod geometry;

/// Blink classifier
pub mod blink;

/// Head tilt classifier
pub mod tilt;

/// Blink calibration state machine
pub mod calibration;

/// Session combining classifiers and calibration
pub mod session;

/// Frame sources and the throttled frame pump
pub mod pump;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
