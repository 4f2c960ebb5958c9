//! Foundation types for the items API.
//!
//! This crate provides the record, wire, and action types shared by the
//! store and the HTTP server. Every other items crate depends on
//! `items-types`.
//!
//! # Key Types
//!
//! - [`ItemId`] — Integer identifier assigned by the store
//! - [`Item`] — Internal, store-owned mutable record
//! - [`NewItem`] / [`ItemPatch`] — Inputs to create and partial update
//! - [`ItemView`] — External response shape
//! - [`CreateItem`] / [`UpdateItem`] — Incoming request bodies
//! - [`ItemAction`] / [`ActionResult`] — Prefixed action queries and their result

pub mod action;
pub mod error;
pub mod item;
pub mod view;

pub use action::{ActionResult, ItemAction, ACTION_PREFIX};
pub use error::{TypeError, TypeResult};
pub use item::{Item, ItemId, ItemPatch, NewItem};
pub use view::{CreateItem, ItemView, UpdateItem};
