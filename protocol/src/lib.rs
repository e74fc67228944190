//! Shared wire types for the collaborative board.
//!
//! This crate defines everything that crosses a process boundary: the element
//! model ([`element::Element`] and its closed [`element::Shape`] variant set),
//! sparse updates ([`element::ElementPatch`]), the client/server event
//! vocabulary ([`events::ClientEvent`], [`events::ServerEvent`]), and the
//! persisted snapshot record ([`events::BoardSnapshot`]).
//!
//! Wire conventions: JSON with camelCase field names and kebab-case tags, as
//! produced and consumed by every client. Deserialization ignores unknown
//! fields so older peers can read frames from newer ones.

pub mod element;
pub mod events;

pub use element::{Element, ElementKind, ElementPatch, Point, Shape, Style};
pub use events::{BoardSnapshot, ClientEvent, ServerEvent};
