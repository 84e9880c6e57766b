//! Reference Planner (spec §4.C): map an advertised `RefSet` into the local
//! ref set, given a refspec and options.
//!
//! A pure function over data, by design (spec §9 "Refspec as data") so it
//! is testable without a real remote.

use super::model::{Ref, RefSet, Refspec};

pub struct PlanOptions<'a> {
    pub single_branch: bool,
    pub branch: Option<&'a str>,
    pub mirror: bool,
}

/// The outcome of planning: the refs to materialize locally, and what our
/// HEAD should point at.
pub struct RefPlan {
    pub mapped: Vec<Ref>,
    /// The *local* ref name our HEAD should track, if any ref was chosen.
    pub head_target: Option<String>,
    /// The advertised HEAD's direct object id, used when no branch was
    /// chosen at all (detached HEAD at the remote's HEAD).
    pub remote_head_oid: Option<gix::ObjectId>,
}

/// Locate the advertised HEAD ref (spec §4.C step 1).
fn find_advertised_head(refs: &RefSet) -> Option<&Ref> {
    refs.find("HEAD")
}

/// Run the Reference Planner.
pub fn plan(refs: &RefSet, refspec: &Refspec, opts: &PlanOptions) -> anyhow::Result<RefPlan> {
    let advertised_head = find_advertised_head(refs);
    let remote_head_oid = advertised_head.map(|r| r.target);

    if opts.single_branch {
        let chosen = if let Some(branch) = opts.branch {
            refs.find(&format!("refs/heads/{branch}"))
                .or_else(|| refs.find(&format!("refs/tags/{branch}")))
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "remote branch or tag '{branch}' not found among advertised refs"
                    )
                })?
        } else {
            let target_name = advertised_head
                .and_then(|h| h.symref_target.as_deref())
                .ok_or_else(|| anyhow::anyhow!("remote did not advertise a HEAD symref hint"))?;
            refs.find(target_name).ok_or_else(|| {
                anyhow::anyhow!("advertised HEAD target '{target_name}' not found in ref set")
            })?
        };

        // "plus the tag refspec restricted to that ref" — a chosen tag maps
        // through the identity tag refspec (`refs/tags/*:refs/tags/*`)
        // rather than the heads refspec passed in, since the latter's
        // pattern never matches a `refs/tags/` source.
        let mapped_ref = if chosen.name.starts_with("refs/tags/") {
            chosen.clone()
        } else {
            apply_refspec_to_one(chosen, refspec)?
        };
        let head_target = mapped_ref.name.clone();
        let mapped = vec![mapped_ref];

        Ok(RefPlan {
            mapped,
            head_target: Some(head_target),
            remote_head_oid,
        })
    } else {
        let mut mapped = Vec::new();
        for r in &refs.refs {
            if r.name == "HEAD" {
                continue;
            }
            if let Some(mapped_ref) = try_apply_refspec(r, refspec) {
                mapped.push(mapped_ref);
            } else if !opts.mirror && r.name.starts_with("refs/tags/") {
                // Tag refspec: tags pass through under their own name even
                // if the main refspec pattern didn't match them.
                mapped.push(r.clone());
            }
        }

        let head_target = advertised_head
            .and_then(|h| h.symref_target.as_deref())
            .and_then(|target| mapped.iter().find(|r| r.name == target))
            .map(|r| r.name.clone());

        Ok(RefPlan {
            mapped,
            head_target,
            remote_head_oid,
        })
    }
}

fn apply_refspec_to_one(r: &Ref, refspec: &Refspec) -> anyhow::Result<Ref> {
    try_apply_refspec(r, refspec)
        .ok_or_else(|| anyhow::anyhow!("refspec does not match ref '{}'", r.name))
}

/// Apply a single glob refspec (`+refs/heads/*:refs/remotes/origin/*`) to one
/// ref, returning a ref with its local name substituted in.
fn try_apply_refspec(r: &Ref, refspec: &Refspec) -> Option<Ref> {
    let src_pattern = &refspec.source;
    let dst_pattern = &refspec.destination;

    if let (Some(src_prefix), Some(dst_prefix)) =
        (src_pattern.strip_suffix('*'), dst_pattern.strip_suffix('*'))
    {
        let suffix = r.name.strip_prefix(src_prefix)?;
        Some(Ref {
            name: format!("{dst_prefix}{suffix}"),
            target: r.target,
            symref_target: r.symref_target.clone(),
        })
    } else if r.name == *src_pattern {
        Some(Ref {
            name: dst_pattern.clone(),
            target: r.target,
            symref_target: r.symref_target.clone(),
        })
    } else {
        None
    }
}
