//! # lostfound Core
//!
//! Data model shared by every lostfound crate.
//!
//! - [`Item`] - an immutable lost or found report with its feature vectors
//! - [`VisualVector`] - fixed-length color histogram + gradient descriptor
//! - [`TextVector`] - normalized token weights of a description
//! - [`CandidateSource`] - where the matcher gets its candidate pool from
//! - [`codec`] - lossless blob encoding of feature vectors
//!
//! ## Example
//!
//! ```rust
//! use lostfound_core::{Category, CandidateSource, Item, ItemId, OwnerId, Polarity, TextVector};
//!
//! let pool = vec![Item {
//!     id: ItemId(1),
//!     owner: OwnerId(7),
//!     polarity: Polarity::Found,
//!     category: Category::Backpack,
//!     description: "blue backpack".to_string(),
//!     image_ref: None,
//!     visual: None,
//!     text: TextVector::from_counts(vec![("blue".to_string(), 1), ("backpack".to_string(), 1)]),
//!     contact: "desk@campus.edu".to_string(),
//! }];
//!
//! // Someone who lost a backpack searches the FOUND reports
//! let candidates = pool.candidates(Polarity::Lost.opposite());
//! assert_eq!(candidates.len(), 1);
//! ```

pub mod codec;
pub mod error;
pub mod item;
pub mod vector;

pub use error::{Error, Result};
pub use item::{CandidateSource, Category, Item, ItemDraft, ItemId, OwnerId, Polarity};
pub use vector::{TextVector, VisualVector};
