//! Orchestrator (spec §4.F): sequences the whole clone operation end to end.
//!
//! Grounded in `daft::git::clone`'s subprocess-dispatch style for the heavy
//! git plumbing (init/fetch/checkout/repack/submodule-update) and in
//! `daft::git::oxide`'s dual gitoxide-for-reads/CLI-for-mutation split: ref
//! listing goes through `GitCommand::ls_remote_all`, ref/HEAD installation
//! goes through `crate::git::refstore`'s gix transactions, and everything
//! else shells out to `git` with an explicit `--git-dir`/`-C`, since the
//! destination is not the process's current directory during a clone.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::cli::Args;
use crate::config;
use crate::errors::CloneError;
use crate::git::{refstore, GitCommand, IpVersion};

use super::config_writer;
use super::destination::{self, PlanOptions as DestPlanOptions};
use super::junk::JunkTracker;
use super::local_clone;
use super::model::{AltResource, DestinationLayout, JunkMode, Ref, RemoteConfig, Refspec};
use super::primer::{self, PrimerPaths, PrimerPhase};
use super::refplan::{self, PlanOptions as RefPlanOptions, RefPlan};
use super::ProgressSink;

/// What the Orchestrator produced, for the command layer to report.
pub struct CloneOutcome {
    pub work_dir: PathBuf,
    pub git_dir: PathBuf,
    pub bare: bool,
    /// Checkout failed but the repository itself is intact and usable
    /// (§4.F step 13's `LeaveRepo` case).
    pub checkout_failed: bool,
}

/// A primer that was downloaded, indexed, and pinned under temporary refs.
struct PrimerAdoption {
    paths: PrimerPaths,
    temp_refs: Vec<String>,
    phase: PrimerPhase,
}

/// Run the clone pipeline end to end (spec §4.F).
pub fn run(args: &Args, progress: &mut dyn ProgressSink) -> Result<CloneOutcome> {
    args.validate()
        .map_err(|e| CloneError::Validation(e.to_string()))?;

    let git = GitCommand::new(args.quiet);

    if args.resume {
        run_resume(args, &git, progress)
    } else {
        run_fresh(args, &git, progress)
    }
}

fn run_fresh(args: &Args, git: &GitCommand, progress: &mut dyn ProgressSink) -> Result<CloneOutcome> {
    let bare = args.bare || args.mirror;

    let local_source = destination::resolve_local_source(&args.repo)
        .map_err(|e| CloneError::Validation(e.to_string()))?;
    let use_local_clone = match (&local_source, args.local_override()) {
        (Some(_), Some(false)) => false,
        (Some((path, is_bundle)), _) => !is_bundle && !local_clone::is_shallow(&resolve_local_git_dir(path)),
        (None, Some(true)) => {
            return Err(CloneError::Validation(
                "--local requires a local source repository".to_string(),
            )
            .into())
        }
        (None, _) => false,
    };

    let url = match &local_source {
        Some((path, _)) => path
            .canonicalize()
            .unwrap_or_else(|_| path.clone())
            .display()
            .to_string(),
        None => args.repo.clone(),
    };

    let dest_opts = DestPlanOptions {
        bare,
        mirror: args.mirror,
        separate_git_dir: args.separate_git_dir.clone(),
        resume: false,
    };
    let explicit_dest = args.dir.as_ref().map(|d| d.to_string_lossy().into_owned());
    let layout = destination::plan_fresh(&args.repo, explicit_dest.as_deref(), &dest_opts)
        .map_err(|e| CloneError::Validation(e.to_string()))?;

    if let Some(parent) = layout.work_dir.parent() {
        crate::ensure_directory_exists(parent).map_err(|e| CloneError::Environment(e.to_string()))?;
    }

    // Register junk before any further side effects touch the filesystem.
    JunkTracker::register(
        layout.git_dir.clone(),
        if layout.bare {
            None
        } else {
            Some(layout.work_dir.clone())
        },
    );

    progress.on_step(&format!(
        "initializing repository at {}",
        layout.work_dir.display()
    ));
    let initial_branch = args
        .branch
        .as_deref()
        .unwrap_or(config::clone::FALLBACK_BRANCH);
    git.init_repo(
        &layout.work_dir,
        layout.bare,
        initial_branch,
        args.separate_git_dir.as_deref(),
        args.template.as_deref(),
    )
    .map_err(|e| CloneError::Environment(e.to_string()))?;

    if !args.config.is_empty() {
        config_writer::write_custom_config(&layout.git_dir, &args.config)
            .map_err(|e| CloneError::Environment(e.to_string()))?;
    }

    let ip_version = IpVersion::from_flags(args.ipv4, args.ipv6);

    let mirror_refspec = Refspec {
        source: "refs/*".into(),
        destination: "refs/*".into(),
        force: true,
    };
    let general_refspec = Refspec {
        source: "refs/heads/*".into(),
        destination: format!("refs/remotes/{}/*", args.origin),
        force: true,
    };
    let initial_refspec = if args.mirror {
        mirror_refspec.clone()
    } else {
        general_refspec.clone()
    };

    config_writer::write_remote_config(
        &layout.git_dir,
        &RemoteConfig {
            remote_name: args.origin.clone(),
            url: url.clone(),
            fetch_refspecs: vec![initial_refspec.clone()],
            mirror: args.mirror,
            bare: layout.bare,
        },
    )
    .map_err(|e| CloneError::Environment(e.to_string()))?;

    for reference in &args.reference {
        add_reference_repo(&layout.git_dir, reference)?;
    }

    // Primer discovery, then the advertised ref list. Local sources have no
    // transport and so no primer to discover.
    let mut primer_adoption = None;
    if !use_local_clone {
        if let Some(resource) = primer::discover(args.prime_clone.as_deref())
            .map_err(|e| CloneError::Primer(e.to_string()))?
        {
            primer_adoption = attempt_primer(&layout.git_dir, &args.origin, &resource, false, progress)?;
        }
    }

    let refs = git
        .ls_remote_all(&url, args.upload_pack.as_deref(), ip_version)
        .map_err(|e| CloneError::Connectivity(e.to_string()))?;
    if refs.refs.is_empty() {
        progress.on_warning("remote repository is empty; nothing to fetch");
    }

    // §4.F step 6: a null object id among the advertised refs means objects
    // must be fetched before remote HEAD can be computed; otherwise fetching
    // after planning (the usual order) is fine.
    let fetch_before_plan = refs.has_null_oid();
    if fetch_before_plan && !refs.refs.is_empty() && !use_local_clone {
        progress.on_step("fetching objects");
        git.fetch_objects(
            &layout.git_dir,
            &url,
            &[initial_refspec.to_string()],
            args.depth,
            !args.single_branch_resolved(),
            args.upload_pack.as_deref(),
            ip_version,
        )
        .map_err(|e| CloneError::Transport(e.to_string()))?;
    }

    let refspec_for_plan = if args.mirror {
        &mirror_refspec
    } else {
        &general_refspec
    };
    let refplan_opts = RefPlanOptions {
        single_branch: args.single_branch_resolved(),
        branch: args.branch.as_deref(),
        mirror: args.mirror,
    };
    let plan = if refs.refs.is_empty() {
        empty_plan()
    } else {
        refplan::plan(&refs, refspec_for_plan, &refplan_opts)
            .map_err(|e| CloneError::Validation(e.to_string()))?
    };

    // Persist the refspec actually in effect: single-branch mode rewrites
    // the general pattern written above to a literal one-ref mapping.
    if !refs.refs.is_empty() {
        let persisted_refspec = if args.single_branch_resolved() {
            single_branch_refspec(&plan, &args.origin).unwrap_or_else(|| initial_refspec.clone())
        } else {
            initial_refspec.clone()
        };
        config_writer::write_remote_config(
            &layout.git_dir,
            &RemoteConfig {
                remote_name: args.origin.clone(),
                url: url.clone(),
                fetch_refspecs: vec![persisted_refspec],
                mirror: args.mirror,
                bare: layout.bare,
            },
        )
        .map_err(|e| CloneError::Environment(e.to_string()))?;
    }

    if !refs.refs.is_empty() {
        if use_local_clone {
            progress.on_step("mirroring local object store");
            let (source_path, _) = local_source.as_ref().expect("use_local_clone implies a local source");
            let source_git_dir = resolve_local_git_dir(source_path);
            let source_objects = local_clone::objects_dir_for(&source_git_dir);
            let dest_objects = local_clone::objects_dir_for(&layout.git_dir);
            if args.shared {
                local_clone::link_shared(&layout.git_dir, &source_objects)
            } else {
                local_clone::mirror_object_store(&source_objects, &dest_objects, !args.no_hardlinks, progress)
            }
            .map_err(|e| CloneError::Environment(e.to_string()))?;
        } else if !fetch_before_plan {
            progress.on_step("fetching objects");
            git.fetch_objects(
                &layout.git_dir,
                &url,
                &[initial_refspec.to_string()],
                args.depth,
                !args.single_branch_resolved(),
                args.upload_pack.as_deref(),
                ip_version,
            )
            .map_err(|e| CloneError::Transport(e.to_string()))?;
        }
    }

    let repo = install_refs_and_head(&layout, &args.origin, args.mirror, &plan)?;

    if args.dissociate {
        progress.on_step("dissociating from reference repositories");
        git.repack_consolidate(&layout.git_dir)
            .map_err(|e| CloneError::Environment(e.to_string()))?;
        let alternates = layout.git_dir.join("objects").join("info").join("alternates");
        let _ = fs::remove_file(alternates);
    }

    let has_checkout_target = plan.head_target.is_some() || plan.remote_head_oid.is_some();
    let checkout_failed = perform_checkout(git, &layout, args, has_checkout_target, progress);

    JunkTracker::remove_resume_record(&layout.git_dir);
    JunkTracker::set_resume_record(None);
    finish_primer(&repo, primer_adoption.take());

    Ok(CloneOutcome {
        work_dir: layout.work_dir,
        git_dir: layout.git_dir,
        bare: layout.bare,
        checkout_failed,
    })
}

fn run_resume(args: &Args, git: &GitCommand, progress: &mut dyn ProgressSink) -> Result<CloneOutcome> {
    let layout = destination::plan_resume(&args.repo)
        .map_err(|e| CloneError::Validation(e.to_string()))?;

    let resume_path = layout.git_dir.join(config::primer::RESUME_RECORD_FILE);
    let contents = fs::read_to_string(&resume_path).map_err(|_| {
        CloneError::Primer(format!("no resume record found at {}", resume_path.display()))
    })?;
    let record: crate::core::model::ResumeRecord = contents
        .parse()
        .map_err(|e: anyhow::Error| CloneError::Primer(e.to_string()))?;

    JunkTracker::register(
        layout.git_dir.clone(),
        if layout.bare {
            None
        } else {
            Some(layout.work_dir.clone())
        },
    );
    JunkTracker::set_resume_record(Some(record.clone()));
    JunkTracker::advance(JunkMode::LeaveResumable);

    let origin = config::clone::DEFAULT_REMOTE_NAME;
    let url = git
        .config_get_at(&layout.git_dir, &format!("remote.{origin}.url"))
        .map_err(|e| CloneError::Environment(e.to_string()))?
        .ok_or_else(|| {
            CloneError::Environment(format!("remote.{origin}.url not found in resumed repository"))
        })?;
    let mirror = git
        .config_get_at(&layout.git_dir, &format!("remote.{origin}.mirror"))
        .unwrap_or(None)
        .map(|v| v == "true")
        .unwrap_or(false);

    let ip_version = IpVersion::from_flags(args.ipv4, args.ipv6);

    let resource = primer::resource_from_resume_record(&record);
    let adoption = attempt_primer(&layout.git_dir, origin, &resource, true, progress)?;
    let adoption = match adoption {
        Some(adoption) => adoption,
        None => {
            let err = CloneError::Primer("resumed primer could not be adopted".to_string());
            debug_assert!(err.primer_is_fatal(true));
            return Err(err.into());
        }
    };

    let refs = git
        .ls_remote_all(&url, None, ip_version)
        .map_err(|e| CloneError::Connectivity(e.to_string()))?;

    let refspec_for_plan = if mirror {
        Refspec {
            source: "refs/*".into(),
            destination: "refs/*".into(),
            force: true,
        }
    } else {
        Refspec {
            source: "refs/heads/*".into(),
            destination: format!("refs/remotes/{origin}/*"),
            force: true,
        }
    };

    // §4.F step 6, same rule as the fresh-clone path: a null object id
    // among the advertised refs means objects must be fetched before the
    // plan/remote HEAD is computed.
    let fetch_before_plan = refs.has_null_oid();
    if fetch_before_plan && !refs.refs.is_empty() {
        progress.on_step("fetching objects");
        git.fetch_objects(
            &layout.git_dir,
            &url,
            &[refspec_for_plan.to_string()],
            args.depth,
            !args.single_branch_resolved(),
            None,
            ip_version,
        )
        .map_err(|e| CloneError::Transport(e.to_string()))?;
    }

    let refplan_opts = RefPlanOptions {
        single_branch: args.single_branch_resolved(),
        branch: args.branch.as_deref(),
        mirror,
    };
    let plan = if refs.refs.is_empty() {
        empty_plan()
    } else {
        refplan::plan(&refs, &refspec_for_plan, &refplan_opts)
            .map_err(|e| CloneError::Validation(e.to_string()))?
    };

    if !refs.refs.is_empty() && !fetch_before_plan {
        progress.on_step("fetching objects");
        git.fetch_objects(
            &layout.git_dir,
            &url,
            &[refspec_for_plan.to_string()],
            args.depth,
            !args.single_branch_resolved(),
            None,
            ip_version,
        )
        .map_err(|e| CloneError::Transport(e.to_string()))?;
    }

    let repo = install_refs_and_head(&layout, origin, mirror, &plan)?;

    let has_checkout_target = plan.head_target.is_some() || plan.remote_head_oid.is_some();
    let checkout_failed = perform_checkout(git, &layout, args, has_checkout_target, progress);

    JunkTracker::remove_resume_record(&layout.git_dir);
    JunkTracker::set_resume_record(None);
    finish_primer(&repo, Some(adoption));

    Ok(CloneOutcome {
        work_dir: layout.work_dir,
        git_dir: layout.git_dir,
        bare: layout.bare,
        checkout_failed,
    })
}

/// Returns the shape `refplan::plan` would produce for a genuinely empty
/// remote: nothing mapped, no HEAD to point at.
fn empty_plan() -> RefPlan {
    RefPlan {
        mapped: vec![],
        head_target: None,
        remote_head_oid: None,
    }
}

/// Borrow objects from an alternate reference repository (spec §4.F step 3,
/// "Reference repositories"): resolve it to a real git-dir, reject shapes
/// this subsystem can't safely borrow from, then add a single alternates
/// entry.
fn add_reference_repo(dest_git_dir: &Path, reference: &str) -> Result<()> {
    let reference_path = Path::new(reference);
    let real_path = reference_path.canonicalize().map_err(|_| {
        CloneError::Environment(format!("reference repository '{reference}' does not exist"))
    })?;
    let git_dir = resolve_local_git_dir(&real_path);

    if local_clone::is_shallow(&git_dir) {
        return Err(CloneError::Environment(format!(
            "reference repository '{reference}' is shallow; shallow reference repositories are not supported"
        ))
        .into());
    }
    if git_dir.join("commondir").exists() {
        return Err(CloneError::Environment(format!(
            "reference repository '{reference}' is a linked worktree; linked checkouts cannot be used as a reference"
        ))
        .into());
    }
    if git_dir.join("info").join("grafts").exists() {
        return Err(CloneError::Environment(format!(
            "reference repository '{reference}' uses grafts, which is unsupported"
        ))
        .into());
    }

    let objects_dir = local_clone::objects_dir_for(&git_dir);
    local_clone::link_shared(dest_git_dir, &objects_dir)
        .map_err(|e| CloneError::Environment(e.to_string()))?;
    Ok(())
}

/// Follow a possible `.git` file/directory (and, inside it, a `gitdir:`
/// indirection) down to the actual git directory backing a local path.
fn resolve_local_git_dir(path: &Path) -> PathBuf {
    let dot_git = path.join(".git");
    if dot_git.is_dir() {
        return dot_git;
    }
    if dot_git.is_file() {
        if let Ok(contents) = fs::read_to_string(&dot_git) {
            if let Some(target) = contents.trim().strip_prefix("gitdir: ") {
                let target_path = PathBuf::from(target);
                return if target_path.is_absolute() {
                    target_path
                } else {
                    path.join(target_path)
                };
            }
        }
    }
    path.to_path_buf()
}

/// Reconstruct the literal (non-glob) refspec §4.F step 7 says a
/// single-branch clone persists in place of the general pattern, from the
/// Reference Planner's resolved mapping.
fn single_branch_refspec(plan: &RefPlan, origin: &str) -> Option<Refspec> {
    let mapped = plan.mapped.first()?;
    let remotes_prefix = format!("refs/remotes/{origin}/");
    if let Some(branch) = mapped.name.strip_prefix(&remotes_prefix) {
        Some(Refspec {
            source: format!("refs/heads/{branch}"),
            destination: mapped.name.clone(),
            force: true,
        })
    } else if mapped.name.starts_with("refs/tags/") {
        Some(Refspec {
            source: mapped.name.clone(),
            destination: mapped.name.clone(),
            force: false,
        })
    } else {
        None
    }
}

/// Run the Primer Subsystem's Fetching -> Indexing -> Installing sequence
/// (§4.D) for one discovered resource. Returns `None` (after abandoning any
/// partial artifacts) if the primer could not be adopted; the caller decides
/// whether that is fatal.
fn attempt_primer(
    git_dir: &Path,
    origin: &str,
    resource: &AltResource,
    resume_requested: bool,
    progress: &mut dyn ProgressSink,
) -> Result<Option<PrimerAdoption>> {
    if !primer::is_supported_filetype(resource) {
        progress.on_warning(&format!(
            "primer filetype '{}' is not supported; ignoring",
            resource.filetype
        ));
        return Ok(None);
    }

    JunkTracker::set_resume_record(Some(crate::core::model::ResumeRecord {
        primer_url: resource.url.clone(),
        primer_filetype: resource.filetype.clone(),
    }));
    JunkTracker::advance(JunkMode::LeaveResumable);

    let name = Uuid::now_v7().simple().to_string();
    let paths = PrimerPaths::new(git_dir, &name);

    let mut phase = PrimerPhase::Idle;
    let outcome = (|| -> Result<Vec<String>> {
        if let Some(parent) = paths.pack.parent() {
            fs::create_dir_all(parent)?;
        }
        phase = PrimerPhase::Fetching;
        progress.on_step(&format!("downloading primer from {}", resource.url));
        primer::download_primer(resource, &paths.pack)?;
        fs::copy(&paths.pack, &paths.bndl)?;

        phase = PrimerPhase::Indexing;
        progress.on_step("indexing primer pack");
        primer::index_pack(&paths.pack, &paths.idx)?;

        let header_bytes = read_bundle_header_bytes(&paths.bndl)?;
        let tips = primer::parse_bundle_header(&header_bytes)?;

        phase = PrimerPhase::Installing;
        let repo = refstore::open(git_dir)?;
        let mut names = Vec::new();
        for tip in &tips {
            let oid = gix::ObjectId::from_hex(tip.oid.as_bytes())
                .with_context(|| format!("invalid object id in bundle header: {}", tip.oid))?;
            let ref_name = primer::temp_ref_name(origin, &name);
            refstore::pin_temp_ref(&repo, &ref_name, oid)?;
            names.push(ref_name);
        }
        Ok(names)
    })();

    match outcome {
        Ok(temp_refs) => {
            phase = PrimerPhase::Done;
            progress.on_step(&format!("adopted primer from {}", resource.url));
            Ok(Some(PrimerAdoption {
                paths,
                temp_refs,
                phase,
            }))
        }
        Err(e) => {
            let failure = CloneError::Primer(e.to_string());
            progress.on_warning(&format!(
                "primer adoption failed during {phase:?}, falling back to full fetch: {e}"
            ));
            if failure.primer_is_fatal(resume_requested) {
                return Err(failure.into());
            }
            phase = PrimerPhase::Abandon;
            progress.on_warning(&format!("abandoning primer ({phase:?})"));
            primer::abandon(&paths, resume_requested)?;
            Ok(None)
        }
    }
}

/// Read just the text header of a bundle file: lines up to and including the
/// first blank line precede the binary packfile data and must not be handed
/// to a UTF-8 parser together with it.
fn read_bundle_header_bytes(path: &Path) -> Result<Vec<u8>> {
    use std::io::{BufRead, BufReader};

    let file = fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut header = Vec::new();
    loop {
        let mut line = Vec::new();
        let n = reader.read_until(b'\n', &mut line)?;
        if n == 0 {
            break;
        }
        let is_blank = line == b"\n" || line == b"\r\n";
        header.extend_from_slice(&line);
        if is_blank {
            break;
        }
    }
    Ok(header)
}

/// Install the Reference Planner's mapped refs, the remote-tracking HEAD
/// symref, and the local HEAD/branch (§4.F steps 10-11). Shared between the
/// fresh-clone and resume paths.
fn install_refs_and_head(
    layout: &DestinationLayout,
    origin: &str,
    mirror: bool,
    plan: &RefPlan,
) -> Result<gix::Repository> {
    let repo = refstore::open(&layout.git_dir).map_err(|e| CloneError::RefStore(e.to_string()))?;
    refstore::install_refs(&repo, &plan.mapped).map_err(|e| CloneError::RefStore(e.to_string()))?;

    let remotes_prefix = format!("refs/remotes/{origin}/");

    if !mirror {
        if let Some(target) = &plan.head_target {
            if target.starts_with(&remotes_prefix) {
                let remote_head_name = format!("refs/remotes/{origin}/HEAD");
                refstore::create_symref(&repo, &remote_head_name, target)
                    .map_err(|e| CloneError::RefStore(e.to_string()))?;
            }
        }
    }

    if layout.bare {
        return Ok(repo);
    }

    match &plan.head_target {
        Some(target) => {
            let Some(mapped) = plan.mapped.iter().find(|r| &r.name == target) else {
                return Ok(repo);
            };
            if let Some(branch_name) = target.strip_prefix(&remotes_prefix) {
                let local_branch_ref = format!("refs/heads/{branch_name}");
                refstore::install_refs(
                    &repo,
                    &[Ref {
                        name: local_branch_ref.clone(),
                        target: mapped.target,
                        symref_target: None,
                    }],
                )
                .map_err(|e| CloneError::RefStore(e.to_string()))?;
                refstore::set_head(&repo, Some(&local_branch_ref), None)
                    .map_err(|e| CloneError::RefStore(e.to_string()))?;
                config_writer::write_branch_tracking(&layout.git_dir, origin, branch_name)
                    .map_err(|e| CloneError::Environment(e.to_string()))?;
            } else {
                refstore::set_head(&repo, None, Some(mapped.target))
                    .map_err(|e| CloneError::RefStore(e.to_string()))?;
            }
        }
        None => {
            if let Some(oid) = plan.remote_head_oid {
                refstore::set_head(&repo, None, Some(oid)).map_err(|e| CloneError::RefStore(e.to_string()))?;
            }
        }
    }

    Ok(repo)
}

/// Materialize the working tree (spec §4.F step 13). Advances the Junk
/// Tracker to `LeaveRepo` first, so an interrupted or failed checkout still
/// leaves a usable bare-equivalent repository; advances to `LeaveAll` only
/// once checkout (and `--recursive` submodule init) succeed, or there was
/// nothing to check out at all.
fn perform_checkout(
    git: &GitCommand,
    layout: &DestinationLayout,
    args: &Args,
    has_checkout_target: bool,
    progress: &mut dyn ProgressSink,
) -> bool {
    JunkTracker::advance(JunkMode::LeaveRepo);
    let mut checkout_failed = false;

    if !layout.bare && !args.no_checkout && has_checkout_target {
        progress.on_step("updating working tree");
        match git.checkout_head(&layout.work_dir) {
            Ok(()) => {
                if args.recursive && layout.work_dir.join(".gitmodules").exists() {
                    progress.on_step("updating submodules");
                    if let Err(e) = git.submodule_update_recursive(&layout.work_dir) {
                        progress.on_warning(&format!("submodule update failed: {e}"));
                    }
                }
            }
            Err(e) => {
                let is_checkout_failure = e
                    .downcast_ref::<CloneError>()
                    .map(|ce| ce.is_checkout_failure())
                    .unwrap_or(true);
                progress.on_warning(&format!("checkout failed, repository left intact: {e}"));
                checkout_failed = is_checkout_failure;
            }
        }
    }

    if !checkout_failed {
        JunkTracker::advance(JunkMode::LeaveAll);
    }
    checkout_failed
}

/// Delete a successfully-adopted primer's temporary refs and drop its now
/// unneeded bundle-header copy (§4.D "Done"), once the main fetch (or the
/// resume's continued fetch) has succeeded.
fn finish_primer(repo: &gix::Repository, adoption: Option<PrimerAdoption>) {
    if let Some(adoption) = adoption {
        debug_assert_eq!(adoption.phase, PrimerPhase::Done);
        for name in &adoption.temp_refs {
            let _ = refstore::delete_ref(repo, name);
        }
        let _ = primer::finalize(&adoption.paths);
    }
}
