//! The marker type of one link.

use irlink_core::{IrType, MarkerType};
use irlink_registry::IrBuiltIns;

/// Owns the single marker type of a link session.
///
/// Types that could not be resolved are replaced with this marker. The
/// predicate matches this handler's marker only: a marker minted anywhere
/// else never qualifies, even if it erases to the same class.
#[derive(Debug)]
pub struct MarkerTypeHandler {
    marker: MarkerType,
}

impl MarkerTypeHandler {
    /// Mint the marker. It erases to the root class.
    pub fn new(builtins: &IrBuiltIns) -> Self {
        Self {
            marker: MarkerType::mint(builtins.any_class),
        }
    }

    /// The marker type.
    pub fn marker_type(&self) -> IrType {
        IrType::Marker(self.marker)
    }

    /// Whether `ty` is this handler's marker.
    pub fn is_marker_type(&self, ty: &IrType) -> bool {
        match ty {
            IrType::Marker(marker) => marker.token() == self.marker.token(),
            IrType::Simple(_) => false,
        }
    }
}
