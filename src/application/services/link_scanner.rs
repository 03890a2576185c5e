//! In-page anchor rewriting.

use std::collections::HashSet;
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

use tracing::{debug, warn};
use url::Url;

use crate::domain::dom::{DomSurface, NodeId};
use crate::domain::entities::{AffiliateTag, Settings};
use crate::error::AppError;
use crate::utils::domain_matcher::has_storefront_marker;
use crate::utils::product_id::{extract_from_path, has_product_path};
use crate::utils::url_rewriter::{RewriteResult, retag_in_place, rewrite_url};

/// How an eligible anchor's href is rewritten.
///
/// Whole-page navigations are always canonicalized to `/dp/<id>`. Anchors
/// keep their original path by default and only get the `tag` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnchorRewriteMode {
    /// Keep scheme, host, path and other parameters; set `tag` only.
    #[default]
    Preserve,
    /// Same canonical form as whole-page navigation.
    Canonical,
}

impl FromStr for AnchorRewriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "preserve" => Ok(Self::Preserve),
            "canonical" => Ok(Self::Canonical),
            other => Err(format!(
                "expected 'preserve' or 'canonical', got '{}'",
                other
            )),
        }
    }
}

impl fmt::Display for AnchorRewriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preserve => f.write_str("preserve"),
            Self::Canonical => f.write_str("canonical"),
        }
    }
}

/// Counters from one or more scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub rewritten: usize,
    pub skipped: usize,
    pub already_processed: usize,
    pub failed: usize,
}

impl AddAssign for ScanReport {
    fn add_assign(&mut self, other: Self) {
        self.rewritten += other.rewritten;
        self.skipped += other.skipped;
        self.already_processed += other.already_processed;
        self.failed += other.failed;
    }
}

/// Whether an href looks like a storefront product link.
///
/// Requires a parsable URL whose host carries the storefront marker and whose
/// path contains `/dp/` or `/gp/product/`. A well-formed identifier is not
/// required at this stage.
pub fn is_eligible_link(href: &str) -> bool {
    let Ok(url) = Url::parse(href) else {
        return false;
    };

    url.host_str().is_some_and(has_storefront_marker) && has_product_path(url.path())
}

/// Rewrites storefront anchors of one page, at most once per element.
///
/// Owns the set of already-rewritten elements, keyed by [`NodeId`] rather
/// than href since hrefs change after rewriting. Dropping the scanner (page
/// teardown) forgets the set.
///
/// Elements that are ineligible, lack an identifier, or fail to update are
/// not remembered, so a later scan retries them.
pub struct LinkScanner {
    affiliate_id: AffiliateTag,
    mode: AnchorRewriteMode,
    processed: HashSet<NodeId>,
}

impl LinkScanner {
    pub fn new(affiliate_id: AffiliateTag, mode: AnchorRewriteMode) -> Self {
        Self {
            affiliate_id,
            mode,
            processed: HashSet::new(),
        }
    }

    /// Builds a scanner from a settings snapshot, or `None` when rewriting is disabled.
    pub fn from_settings(settings: &Settings, mode: AnchorRewriteMode) -> Option<Self> {
        settings
            .enabled
            .then(|| Self::new(settings.affiliate_id.clone(), mode))
    }

    pub fn affiliate_id(&self) -> &AffiliateTag {
        &self.affiliate_id
    }

    pub fn is_processed(&self, node: NodeId) -> bool {
        self.processed.contains(&node)
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    /// Rewrites every eligible, not-yet-processed anchor in `anchors`.
    ///
    /// Errors are logged per element and never abort the scan.
    pub fn scan<D: DomSurface + ?Sized>(&mut self, doc: &mut D, anchors: &[NodeId]) -> ScanReport {
        let mut report = ScanReport::default();

        for &node in anchors {
            if self.processed.contains(&node) {
                report.already_processed += 1;
                continue;
            }

            match self.rewrite_anchor(doc, node) {
                Ok(true) => {
                    self.processed.insert(node);
                    report.rewritten += 1;
                }
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    warn!(node = node.0, code = e.code(), error = %e, "Failed to rewrite anchor");
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Computes the href an anchor would get, without touching the document.
    ///
    /// Returns `Ok(None)` for ineligible links, links without an identifier,
    /// and (in canonical mode) links outside the supported storefronts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Parse`] if an eligible href cannot be rewritten,
    /// e.g. a non-HTTP(S) scheme.
    pub fn anchor_href(&self, href: &str) -> Result<Option<String>, AppError> {
        if !is_eligible_link(href) {
            return Ok(None);
        }

        let has_identifier = Url::parse(href)
            .ok()
            .and_then(|u| extract_from_path(u.path()))
            .is_some();
        if !has_identifier {
            debug!(href = %href, "Product link without identifier");
            return Ok(None);
        }

        let new_href = match self.mode {
            AnchorRewriteMode::Preserve => retag_in_place(href, &self.affiliate_id)?,
            AnchorRewriteMode::Canonical => match rewrite_url(href, &self.affiliate_id)? {
                RewriteResult::Rewritten(url) => url,
                RewriteResult::Unchanged(_) => return Ok(None),
            },
        };

        Ok(Some(new_href))
    }

    /// Returns `Ok(true)` if the href was written.
    fn rewrite_anchor<D: DomSurface + ?Sized>(
        &self,
        doc: &mut D,
        node: NodeId,
    ) -> Result<bool, AppError> {
        let Some(href) = doc.href(node) else {
            return Ok(false);
        };
        let Some(new_href) = self.anchor_href(&href)? else {
            return Ok(false);
        };

        doc.set_href(node, &new_href)?;
        debug!(node = node.0, from = %href, to = %new_href, "Anchor rewritten");
        Ok(true)
    }
}
