//! Class handlers
//!
//! A handler transforms one class at a time while borrowing the whole
//! container, so it can look up and read other classes as it goes.

pub mod class_extension;

pub use class_extension::{
    ClassExtensionHandler, ComplexAction, ExtensionKind, ResolveSummary, SimpleAction,
};

use crate::config::ExtensionOrder;
use crate::container::ClassContainer;
use crate::error::Result;
use crate::models::ClassId;

/// A pass over the classes of a container
pub trait ClassHandler {
    /// Process the target class in place
    fn process(&mut self, container: &mut ClassContainer, target: ClassId) -> Result<()>;
}

/// Resolve every extension edge in the container, declared order
pub fn resolve_extensions(container: &mut ClassContainer) -> Result<ResolveSummary> {
    resolve_extensions_with(container, ExtensionOrder::default())
}

/// Resolve every extension edge in the container with the given order
pub fn resolve_extensions_with(
    container: &mut ClassContainer,
    order: ExtensionOrder,
) -> Result<ResolveSummary> {
    let mut handler = ClassExtensionHandler::new().with_order(order);
    container.process(&mut handler)?;

    let summary = handler.summary();
    tracing::info!(
        retained = summary.retained,
        flattened = summary.flattened,
        removed = summary.removed,
        native = summary.native,
        missing = summary.missing,
        "resolved class extensions"
    );

    Ok(summary)
}
