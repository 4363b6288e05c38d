//! Tag flattening.
//!
//! Fetch parks every repository's tags in a staging namespace keyed by
//! repository name, so identically-named tags from different
//! repositories never meet. Once all repositories are integrated, this
//! phase moves each staged tag into the global namespace under
//! `<repository>-<normalized name>` and deletes the staging area.

use log::{debug, info};
use regex::Regex;

use crate::error::{Error, Result};
use crate::vcs::Vcs;

/// Strip one leading `v` from a version-like tag name.
///
/// `v1.2.3` becomes `1.2.3`; names where the `v` does not front a dotted
/// number (`release-7`, `version-x`, `vendor`) pass through unchanged.
pub fn normalize_version(raw: &str) -> &str {
    let version_like =
        Regex::new(r"^v[0-9]+(\.[0-9]+)*([.+-].*)?$").expect("version pattern is valid");
    if version_like.is_match(raw) {
        &raw[1..]
    } else {
        raw
    }
}

/// Final global name for a staged tag of `repository`.
pub fn final_tag_name(repository: &str, raw: &str) -> String {
    format!("{}-{}", repository, normalize_version(raw))
}

/// Move every staged tag into the global namespace, then delete the
/// staging area. Returns the number of tags processed.
///
/// A final tag that already exists and points at the same object is
/// skipped; that is what a resumed run produces. One pointing elsewhere
/// is a collision and fatal.
pub fn flatten(vcs: &mut dyn Vcs) -> Result<usize> {
    let staged = vcs.staged_tags()?;
    for tag in &staged {
        let final_name = final_tag_name(&tag.repository, &tag.name);
        match vcs.tag_target(&final_name)? {
            Some(existing) if existing == tag.target => {
                debug!("tag {} already placed", final_name);
            }
            Some(existing) => {
                return Err(Error::TagCollision {
                    tag: final_name,
                    existing,
                    incoming: tag.target.clone(),
                });
            }
            None => {
                debug!("tag {}/{} -> {}", tag.repository, tag.name, final_name);
                vcs.create_tag(&final_name, &tag.target)?;
            }
        }
    }
    vcs.drop_staged_tags()?;
    info!("flattened {} tags", staged.len());
    Ok(staged.len())
}
