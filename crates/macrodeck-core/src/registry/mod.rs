mod action;
mod store;

pub use {
    action::{Action, ActionKind},
    store::MacroRegistry,
};
