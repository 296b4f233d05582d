//! Glyph metrics collaborators: shaping/measurement and font lookup.

/// Font lookup by name.
pub mod fonts;
/// Shaped-text measurement and glyph positioning.
pub mod shaper;
