//! The page the controller renders into: fixed containers, a selected flag, a blocking alert.

use shared::{domain::MisuseCaseId, protocol::Fragment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    ItemList,
    Detail,
    Modal,
}

pub trait PageSurface: Send + Sync {
    /// Replaces everything inside `container` with `fragment`.
    fn mount(&self, container: Container, fragment: &Fragment);

    /// Clears the flag on `previous` (if any) and sets it on `current` (if any).
    fn mark_selected(&self, previous: Option<&MisuseCaseId>, current: Option<&MisuseCaseId>);

    fn alert(&self, message: &str);
}
