use gitclone::extract_repo_name;

/// `extract_repo_name` (and the `guess_dir_name` it wraps) must never let a
/// hostile source string escape into something that could be used as a
/// path-traversal or shell-injection payload for the destination directory.
#[test]
fn test_malicious_repository_urls() {
    let malicious_urls = vec![
        "https://github.com/user/../../../etc/passwd.git",
        "git@github.com:user/../../../etc/passwd.git",
        "https://github.com/user/repo/../../../etc/passwd.git",
        "https://github.com/user/repo\0.git",
        "git@github.com:user/repo\0.git",
        "https://github.com/user/repo;rm -rf /.git",
        "https://github.com/user/repo&&whoami.git",
        "https://github.com/user/repo|cat /etc/passwd.git",
        "https://github.com/user/rep\u{200B}o.git",
        "https://github.com/user/rep\u{FEFF}o.git",
        "https://github.com/user/repo with spaces.git",
        "https://github.com/user/repo<script>alert('xss')</script>.git",
    ];

    for url in malicious_urls {
        match extract_repo_name(url) {
            Ok(repo_name) => {
                assert!(!repo_name.contains(".."), "path traversal in extracted name: {repo_name}");
                assert!(!repo_name.contains('\0'), "null byte in extracted name: {repo_name}");
                assert!(repo_name.len() < 256, "extracted name too long: {} chars", repo_name.len());
            }
            Err(_) => {
                // Rejecting clearly malicious input outright is fine too.
            }
        }
    }
}

/// Path traversal and absolute-looking sources must never resolve to a
/// destination name that escapes the current directory.
#[test]
fn test_path_traversal_never_escapes() {
    let traversal_sources = vec![
        "https://github.com/user/../../../etc/passwd.git",
        "/etc/../../passwd",
        "../../../etc/passwd",
    ];

    for source in traversal_sources {
        if let Some(name) = gitclone::core::destination::guess_dir_name(source, false) {
            assert!(!name.contains(".."), "derived name contains '..': {name}");
            assert!(!name.contains('/'), "derived name contains '/': {name}");
        }
    }
}

/// Legitimate repository URLs should always resolve to a sensible name.
#[test]
fn test_legitimate_inputs_still_work() {
    let valid_urls = vec![
        "https://github.com/user/valid-repo.git",
        "git@github.com:user/valid-repo.git",
        "https://gitlab.com/group/subgroup/project.git",
        "git@bitbucket.org:team/project.git",
    ];

    for url in valid_urls {
        let result = extract_repo_name(url);
        assert!(result.is_ok(), "valid URL was rejected: {url}");
    }
}

/// Extremely large inputs must never panic, only succeed or error cleanly.
#[test]
fn test_large_input_handling() {
    let large_url = format!("https://github.com/user/{}.git", "a".repeat(2000));
    let _ = extract_repo_name(&large_url);
}
