//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod event;
pub mod leaderboard;
pub mod theme;
pub mod user;

// Re-export commonly used models
pub use event::{
    CreateEventRequest, Event, EventRegistration, RegistrationStatus, UpdateEventRequest,
};
pub use leaderboard::{LeaderboardEntry, RankedEntry, UpsertEntryRequest};
pub use theme::{ThemeSettings, UpdateThemeRequest};
pub use user::{CreateUserRequest, UpdateUserRequest, User, UserRole};
