/// Surface terminal de gyroscii.
///
/// Écrit la grille de glyphes dans un buffer ratatui, le panneau de debug,
/// la bannière d'erreur et l'aide.
pub mod canvas;
pub mod fps;
pub mod ui;
