//! Shared data model for the clone pipeline (see spec §3).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use gix::ObjectId;

/// The repository the user asked to clone, before any probing.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    /// The literal string the user passed on the command line.
    pub raw: String,
    /// Whether `raw` resolves to a local filesystem path rather than a URL.
    pub is_local_path: bool,
}

impl SourceSpec {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let is_local_path = !raw.contains("://")
            && !raw.starts_with("ssh://")
            && (raw.starts_with('/')
                || raw.starts_with("./")
                || raw.starts_with("../")
                || std::path::Path::new(&raw).exists());
        Self { raw, is_local_path }
    }
}

/// Where the clone will land on disk.
#[derive(Debug, Clone)]
pub struct DestinationLayout {
    /// The top-level directory the user sees.
    pub work_dir: PathBuf,
    /// The actual git directory: `work_dir` itself for `--bare`/`--mirror`,
    /// `work_dir/.git` otherwise, or the `--separate-git-dir` target.
    pub git_dir: PathBuf,
    /// True for `--bare`/`--mirror` clones (no working tree materialized).
    pub bare: bool,
}

/// A single advertised or resolved reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ref {
    pub name: String,
    pub target: ObjectId,
    /// Present when this ref is itself a symbolic reference (e.g. HEAD).
    pub symref_target: Option<String>,
}

/// The set of refs advertised by a remote (or resolved locally).
#[derive(Debug, Clone, Default)]
pub struct RefSet {
    pub refs: Vec<Ref>,
}

impl RefSet {
    pub fn find(&self, name: &str) -> Option<&Ref> {
        self.refs.iter().find(|r| r.name == name)
    }

    pub fn heads(&self) -> impl Iterator<Item = &Ref> {
        self.refs.iter().filter(|r| r.name.starts_with("refs/heads/"))
    }

    /// Whether any advertised ref has the all-zero object id. Real
    /// transports advertise this for a ref whose object the server can't
    /// resolve locally (e.g. a dumb-HTTP alternate); §4.F step 6 requires
    /// fetching before remote HEAD is computed whenever this happens, rather
    /// than the usual plan-then-fetch order.
    pub fn has_null_oid(&self) -> bool {
        self.refs
            .iter()
            .any(|r| r.target.as_bytes().iter().all(|&b| b == 0))
    }
}

/// A fetch refspec in `+src:dst` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refspec {
    pub source: String,
    pub destination: String,
    pub force: bool,
}

impl fmt::Display for Refspec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.force {
            write!(f, "+{}:{}", self.source, self.destination)
        } else {
            write!(f, "{}:{}", self.source, self.destination)
        }
    }
}

/// The optional out-of-band primer resource a transport can advertise
/// (spec §3, §4.D): a prebuilt pack+bundle that seeds most of the object
/// graph before the ordinary fetch negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltResource {
    pub url: String,
    pub filetype: String,
}

/// The on-disk record a resumable clone uses to recover its primer state
/// after interruption. Two lines: the primer URL, then its filetype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeRecord {
    pub primer_url: String,
    pub primer_filetype: String,
}

impl fmt::Display for ResumeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.primer_url)?;
        writeln!(f, "{}", self.primer_filetype)
    }
}

impl FromStr for ResumeRecord {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines();
        let primer_url = lines
            .next()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| anyhow::anyhow!("resume record is missing the primer URL line"))?
            .to_string();
        let primer_filetype = lines
            .next()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| anyhow::anyhow!("resume record is missing the primer filetype line"))?
            .to_string();
        Ok(ResumeRecord {
            primer_url,
            primer_filetype,
        })
    }
}

/// The monotonic state of the Junk Tracker (see spec §4.B).
///
/// Transitions only ever widen what survives a teardown: `None` ->
/// `LeaveResumable` -> `LeaveRepo` -> `LeaveAll`. There is no path backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum JunkMode {
    /// Delete everything created so far on teardown.
    None,
    /// Keep only the resume record and bare git directory needed to resume.
    LeaveResumable,
    /// Keep the whole git repository, but not the working tree.
    LeaveRepo,
    /// Keep everything, including a partially checked out working tree.
    LeaveAll,
}

impl JunkMode {
    /// Attempt to move to `next`. Returns `false` (and leaves `self`
    /// unchanged) if `next` would be a regression.
    pub fn advance_to(&mut self, next: JunkMode) -> bool {
        if next > *self {
            *self = next;
            true
        } else {
            false
        }
    }

    /// Force a transition regardless of ordering. The Primer Subsystem's
    /// Abandon path (§4.D) is the one place the spec allows a backward
    /// move: `LeaveResumable -> None` when a not-yet-adopted primer is
    /// discarded before anything worth resuming was persisted.
    pub fn force_to(&mut self, next: JunkMode) {
        *self = next;
    }
}

/// The remote configuration block the Config Writer installs (spec §4.G).
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub remote_name: String,
    pub url: String,
    pub fetch_refspecs: Vec<Refspec>,
    pub mirror: bool,
    pub bare: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn junk_mode_is_monotonic() {
        let mut mode = JunkMode::None;
        assert!(mode.advance_to(JunkMode::LeaveRepo));
        assert_eq!(mode, JunkMode::LeaveRepo);
        assert!(!mode.advance_to(JunkMode::LeaveResumable));
        assert_eq!(mode, JunkMode::LeaveRepo);
        assert!(mode.advance_to(JunkMode::LeaveAll));
        assert_eq!(mode, JunkMode::LeaveAll);
    }

    #[test]
    fn resume_record_round_trips() {
        let record = ResumeRecord {
            primer_url: "https://example.com/repo.pack".to_string(),
            primer_filetype: "pack".to_string(),
        };
        let rendered = record.to_string();
        let parsed: ResumeRecord = rendered.parse().unwrap();
        assert_eq!(record, parsed);
    }

    #[test]
    fn detects_null_oid_among_refs() {
        let clean = RefSet {
            refs: vec![Ref {
                name: "refs/heads/main".into(),
                target: ObjectId::from_bytes_or_panic(&[1; 20]),
                symref_target: None,
            }],
        };
        assert!(!clean.has_null_oid());

        let with_null = RefSet {
            refs: vec![
                Ref {
                    name: "refs/heads/main".into(),
                    target: ObjectId::from_bytes_or_panic(&[1; 20]),
                    symref_target: None,
                },
                Ref {
                    name: "refs/heads/unresolved".into(),
                    target: ObjectId::from_bytes_or_panic(&[0; 20]),
                    symref_target: None,
                },
            ],
        };
        assert!(with_null.has_null_oid());
    }

    #[test]
    fn refspec_display_respects_force() {
        let forced = Refspec {
            source: "refs/heads/*".into(),
            destination: "refs/remotes/origin/*".into(),
            force: true,
        };
        assert_eq!(forced.to_string(), "+refs/heads/*:refs/remotes/origin/*");

        let unforced = Refspec {
            force: false,
            ..forced
        };
        assert_eq!(unforced.to_string(), "refs/heads/*:refs/remotes/origin/*");
    }
}
