/// Moteur de conversion pixel→texte de gyroscii.
///
/// Convertit la cible off-screen en bloc de glyphes par luminance, ou en
/// demi-blocs colorés quand le texte est vide.
pub mod halfblock;
pub mod mapper;

pub use mapper::GlyphMapper;
