//! Presentation seam
//!
//! Widget rendering lives outside this crate; a [`ScreenProvider`] is
//! the contract a settings UI consumes. Components can ship their own
//! provider, everyone else gets [`GeneratedScreenProvider`] backed
//! directly by their option set.

use std::sync::Arc;

use crate::bounds::{FloatBounds, IntBounds};
use crate::container::ConfigContainer;
use crate::value::OptionValue;

/// Everything a generic settings UI needs to render one option.
#[derive(Debug, Clone)]
pub struct OptionView {
    pub id: String,
    pub label: String,
    pub description: String,
    pub value: OptionValue,
    /// Slider hints for whole-number options
    pub int_bounds: Option<IntBounds>,
    /// Slider hints for float options
    pub float_bounds: Option<FloatBounds>,
    pub is_default: bool,
}

/// Supplies the edit surface for one component's config.
pub trait ScreenProvider: Send + Sync {
    /// Snapshot of the options to display, in declaration order
    fn option_views(&self) -> Vec<OptionView>;

    /// Whether edits are currently allowed. An unavailable config is
    /// still listed, just not editable.
    fn editable(&self) -> bool {
        true
    }
}

/// Default provider for components without a custom one, backed by the
/// component's own option set.
pub struct GeneratedScreenProvider {
    container: Arc<ConfigContainer>,
}

impl GeneratedScreenProvider {
    pub fn new(container: Arc<ConfigContainer>) -> Self {
        Self { container }
    }
}

impl ScreenProvider for GeneratedScreenProvider {
    fn option_views(&self) -> Vec<OptionView> {
        self.container
            .storage()
            .iter()
            .map(|option| OptionView {
                id: option.id().to_string(),
                label: option.label().to_string(),
                description: option.description().to_string(),
                value: option.get(),
                int_bounds: option.ty().and_then(|ty| ty.int_bounds().copied()),
                float_bounds: option.ty().and_then(|ty| ty.float_bounds().copied()),
                is_default: option.is_default(),
            })
            .collect()
    }

    fn editable(&self) -> bool {
        self.container.is_available()
    }
}
