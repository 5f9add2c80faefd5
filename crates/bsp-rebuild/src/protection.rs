//! Detection of brushes added by map protection tools.

use crate::map::Brush;

/// Heuristic query telling whether a brush was added to protect the map
/// against decompiling. Affects only editor metadata, never geometry.
pub trait ProtectionClassifier {
    fn is_protected_brush(&self, brush: &Brush) -> bool;
}

/// Treats no brush as protected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProtection;

impl ProtectionClassifier for NoProtection {
    fn is_protected_brush(&self, _brush: &Brush) -> bool {
        false
    }
}

impl<F> ProtectionClassifier for F
where
    F: Fn(&Brush) -> bool,
{
    fn is_protected_brush(&self, brush: &Brush) -> bool {
        self(brush)
    }
}
