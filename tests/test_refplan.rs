use gitclone::core::model::{Ref, RefSet, Refspec};
use gitclone::core::refplan::{self, PlanOptions};
use gix::ObjectId;

fn oid(byte: u8) -> ObjectId {
    ObjectId::from_bytes_or_panic(&[byte; 20])
}

fn mirror_refspec() -> Refspec {
    Refspec {
        source: "refs/*".into(),
        destination: "refs/*".into(),
        force: true,
    }
}

/// A `--mirror` clone maps every advertised ref (heads and tags alike) to
/// the identical local name, with no `refs/remotes/<origin>/` indirection.
#[test]
fn mirror_maps_refs_verbatim() {
    let refs = RefSet {
        refs: vec![
            Ref {
                name: "HEAD".into(),
                target: oid(1),
                symref_target: Some("refs/heads/main".into()),
            },
            Ref {
                name: "refs/heads/main".into(),
                target: oid(1),
                symref_target: None,
            },
            Ref {
                name: "refs/tags/v1".into(),
                target: oid(2),
                symref_target: None,
            },
        ],
    };

    let plan = refplan::plan(
        &refs,
        &mirror_refspec(),
        &PlanOptions {
            single_branch: false,
            branch: None,
            mirror: true,
        },
    )
    .unwrap();

    let names: Vec<_> = plan.mapped.iter().map(|r| r.name.as_str()).collect();
    assert!(names.contains(&"refs/heads/main"));
    assert!(names.contains(&"refs/tags/v1"));
    assert_eq!(plan.head_target.as_deref(), Some("refs/heads/main"));
}

/// An empty remote (no advertised refs at all) should plan cleanly into an
/// empty mapping with nothing to check out, rather than erroring.
#[test]
fn empty_remote_plans_to_nothing() {
    let refs = RefSet { refs: vec![] };
    let refspec = Refspec {
        source: "refs/heads/*".into(),
        destination: "refs/remotes/origin/*".into(),
        force: true,
    };

    let plan = refplan::plan(
        &refs,
        &refspec,
        &PlanOptions {
            single_branch: false,
            branch: None,
            mirror: false,
        },
    )
    .unwrap();

    assert!(plan.mapped.is_empty());
    assert!(plan.head_target.is_none());
    assert!(plan.remote_head_oid.is_none());
}

/// When the remote advertises no HEAD symref hint at all (e.g. only tags,
/// no branches), a non-single-branch plan should still map every ref
/// without a head_target, rather than failing.
#[test]
fn no_head_hint_still_maps_refs_without_a_head_target() {
    let refs = RefSet {
        refs: vec![Ref {
            name: "refs/tags/v1".into(),
            target: oid(3),
            symref_target: None,
        }],
    };
    let refspec = Refspec {
        source: "refs/heads/*".into(),
        destination: "refs/remotes/origin/*".into(),
        force: true,
    };

    let plan = refplan::plan(
        &refs,
        &refspec,
        &PlanOptions {
            single_branch: false,
            branch: None,
            mirror: false,
        },
    )
    .unwrap();

    assert_eq!(plan.mapped.len(), 1);
    assert_eq!(plan.mapped[0].name, "refs/tags/v1");
    assert!(plan.head_target.is_none());
}

/// `--single-branch` with no explicit branch and no HEAD symref hint at all
/// must fail rather than silently picking an arbitrary ref.
#[test]
fn single_branch_without_head_hint_fails() {
    let refs = RefSet {
        refs: vec![Ref {
            name: "refs/heads/main".into(),
            target: oid(1),
            symref_target: None,
        }],
    };
    let refspec = Refspec {
        source: "refs/heads/*".into(),
        destination: "refs/remotes/origin/*".into(),
        force: true,
    };

    let result = refplan::plan(
        &refs,
        &refspec,
        &PlanOptions {
            single_branch: true,
            branch: None,
            mirror: false,
        },
    );

    assert!(result.is_err());
}
