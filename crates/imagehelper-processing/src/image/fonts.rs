//! Font lookup for text watermarks
//!
//! Fonts are resolved by family name from the fonts installed on the host.
//! The system font database is scanned once, on first use, and shared
//! read-only afterwards.

use ab_glyph::FontVec;
use fontdb::{Database, Family, Query};
use imagehelper_core::ImagingError;
use std::sync::{Arc, OnceLock};

/// Resolves a font family name to a rasterisable font
pub trait FontResolver: Send + Sync {
    fn resolve(&self, family: &str) -> Result<FontVec, ImagingError>;
}

/// Resolver over the host's installed fonts
#[derive(Clone, Default)]
pub struct SystemFontResolver {
    db: Arc<OnceLock<Database>>,
}

impl SystemFontResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve from a prepared database instead of scanning the host
    pub fn from_database(db: Database) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(db);
        Self { db: Arc::new(cell) }
    }

    fn database(&self) -> &Database {
        self.db.get_or_init(|| {
            let mut db = Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "Loaded system fonts");
            db
        })
    }

    /// Family names of every installed face, sorted and deduplicated
    pub fn families(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .database()
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl FontResolver for SystemFontResolver {
    fn resolve(&self, family: &str) -> Result<FontVec, ImagingError> {
        let family = family.trim();
        if family.is_empty() {
            return Err(ImagingError::FontResolution(
                "font name is empty".to_string(),
            ));
        }

        let db = self.database();
        let exact = db.query(&Query {
            families: &[Family::Name(family)],
            ..Query::default()
        });

        // fontdb matches family names exactly; fall back to a case-insensitive scan
        let id = exact.or_else(|| {
            db.faces()
                .find(|face| {
                    face.families
                        .iter()
                        .any(|(name, _)| name.eq_ignore_ascii_case(family))
                })
                .map(|face| face.id)
        });

        let id = id.ok_or_else(|| {
            ImagingError::FontResolution(format!("font '{}' is not installed", family))
        })?;

        let font = db
            .with_face_data(id, |data, index| {
                FontVec::try_from_vec_and_index(data.to_vec(), index)
            })
            .ok_or_else(|| {
                ImagingError::FontResolution(format!("font '{}' could not be read", family))
            })?
            .map_err(|e| {
                ImagingError::FontResolution(format!("font '{}' is invalid: {}", family, e))
            })?;

        tracing::debug!(family = %family, "Resolved font");
        Ok(font)
    }
}
