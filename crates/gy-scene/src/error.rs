use thiserror::Error;

/// Fautes levées pendant un tick de la scène.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// A node transform stopped being finite (NaN or infinity).
    #[error("Transform non fini sur le nœud '{node}'")]
    NonFinite {
        /// Name of the offending node.
        node: &'static str,
    },

    /// Render target does not match the rasterizer's resolution.
    #[error("Cible de rendu {actual_w}×{actual_h}, attendu {expected_w}×{expected_h}")]
    TargetMismatch {
        /// Expected width.
        expected_w: u32,
        /// Expected height.
        expected_h: u32,
        /// Actual width.
        actual_w: u32,
        /// Actual height.
        actual_h: u32,
    },
}
