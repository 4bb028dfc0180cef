//! Placement board core: spawn pieces, drag them, snap them onto an anchor grid.
//!
//! The crate owns every piece of board logic that carries real invariants. The
//! host (page, toolbar, renderer) feeds it canvas sizes and pointer events and
//! applies the returned [`engine::Action`]s; it never touches geometry itself.
//! All piece and anchor geometry lives in unscaled local space. The viewport
//! scale only affects how screen pixels map into that space.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Board lifecycle and the in-process API ([`engine::BoardCore`]) |
//! | [`viewport`] | Scale tracking and screen/local coordinate conversion |
//! | [`grid`] | Anchor grid layout |
//! | [`input`] | Pointer event types and the drag state machine |
//! | [`snap`] | Bounding boxes and the snap resolver |
//! | [`ledger`] | Spawn quotas and live piece identities |
//! | [`piece`] | Piece kinds and the live piece store |
//! | [`diagnostics`] | Read-only snapshot for diagnostics overlays |
//! | [`config`] | Board configuration and environment overrides |
//! | [`script`] | Headless replay of scripted board events |
//! | [`consts`] | Shared numeric constants |

pub mod config;
pub mod consts;
pub mod diagnostics;
pub mod engine;
pub mod grid;
pub mod input;
pub mod ledger;
pub mod piece;
pub mod script;
pub mod snap;
pub mod viewport;
