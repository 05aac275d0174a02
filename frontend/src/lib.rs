//! # BizPulse Frontend Core
//!
//! UI-framework-independent application core for the dashboard:
//!
//! - `state` - explicit state containers with read/update operations,
//!   replacing ambient globals
//! - `views` - pure view-model builders, render functions of state that are
//!   testable without any UI toolkit
//! - `services` - the typed REST client and incremental change-feed sync
//!
//! A rendering shell (native or web) owns an [`state::AppContext`], feeds
//! user interactions into it, and draws whatever the view builders return.

pub mod services;
pub mod state;
pub mod views;
