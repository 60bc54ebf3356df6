//! Typed ID definitions for all domain entities.
//!
//! This module defines type aliases for each domain entity, providing
//! compile-time type safety for ID usage throughout the application.
//!
//! # Example
//!
//! ```rust
//! use server_core::common::{MenuItemId, ReviewId};
//!
//! // These are incompatible types - compiler prevents mixing them up
//! let review_id: ReviewId = ReviewId::from_raw(1);
//! let item_id: MenuItemId = MenuItemId::from_raw(1);
//!
//! // This would be a compile error:
//! // let wrong: MenuItemId = review_id;
//! ```

// Re-export the core Id type
pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for User entities.
pub struct User;

/// Marker type for MenuItem entities.
pub struct MenuItem;

/// Marker type for Review entities.
pub struct Review;

/// Marker type for AliasProposal entities.
pub struct AliasProposal;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for User entities.
pub type UserId = Id<User>;

/// Typed ID for MenuItem entities.
pub type MenuItemId = Id<MenuItem>;

/// Typed ID for Review entities.
pub type ReviewId = Id<Review>;

/// Typed ID for AliasProposal entities.
pub type ProposalId = Id<AliasProposal>;
