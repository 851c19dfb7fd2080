//! Media type allow-list.

use crate::error::AssetError;
use crate::resolve::ResolvedAsset;
use glob::{Pattern, PatternError};

/// Glob patterns over bare media types, e.g. `text/*` or `image/png`.
///
/// An empty filter allows everything.
#[derive(Debug, Clone, Default)]
pub struct MediaTypeFilter {
    patterns: Vec<Pattern>,
}

impl MediaTypeFilter {
    /// Filter that allows every media type.
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn new<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn allows(&self, media_type: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.matches(media_type))
    }

    /// Reject an asset whose media type matches no pattern.
    pub fn check(&self, asset: &ResolvedAsset) -> Result<(), AssetError> {
        if self.allows(&asset.media_type) {
            return Ok(());
        }
        Err(AssetError::DisallowedMediaType {
            path: asset.diagnostic_path(),
            media_type: asset.media_type.clone(),
        })
    }
}
