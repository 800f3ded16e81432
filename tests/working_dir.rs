// Everything touching the process working directory lives in one test so
// nothing else in this binary can move it underneath us.

use std::{env, fs};

use procwrap::{working_dir::WorkingDirGuard, CommandRunner, ErrorKind, RealCommandRunner};

const NO_ARGS: &[&str] = &[];

#[test]
fn test_directory_scoped_runs() {
    let runner = RealCommandRunner;
    let before = env::current_dir().unwrap();
    let work = tempfile::tempdir().unwrap();

    // the child sees the requested directory, every variant
    let expected = fs::canonicalize(work.path()).unwrap();
    let script = format!("test \"$(pwd -P)\" = '{}'", expected.display());
    runner
        .run_in_dir(work.path(), "sh", &["-c", script.as_str()])
        .unwrap();
    runner
        .run_in_dir_with_bound_output(work.path(), "sh", &["-c", script.as_str()])
        .unwrap();
    runner
        .run_in_dir_with_bound_input_output(work.path(), "sh", &["-c", script.as_str()])
        .unwrap();
    assert_eq!(env::current_dir().unwrap(), before);

    // a relative path in the child lands inside the directory
    runner
        .run_in_dir(work.path(), "touch", &["created.txt"])
        .unwrap();
    assert!(work.path().join("created.txt").exists());

    // restored after the program fails
    let err = runner.run_in_dir(work.path(), "false", NO_ARGS).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::NonZeroExit { .. }));
    assert_eq!(env::current_dir().unwrap(), before);

    // restored after the program cannot be started
    let err = runner
        .run_in_dir(work.path(), "procwrap-no-such-program", NO_ARGS)
        .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Spawn { .. }));
    assert_eq!(env::current_dir().unwrap(), before);

    // a missing directory fails before anything is spawned
    let missing = work.path().join("missing");
    let marker = work.path().join("marker");
    let err = runner
        .run_in_dir(&missing, "touch", &[marker.as_os_str()])
        .unwrap_err();
    assert!(err
        .to_string()
        .starts_with(&format!("Unable to chdir to {}: ", missing.display())));
    match err.into_kind() {
        ErrorKind::ChangeDir { dir, cause } => {
            assert_eq!(dir, missing);
            assert_eq!(cause.kind, std::io::ErrorKind::NotFound);
            // the OS wording survives, not just the kind
            assert_eq!(cause.message, std::io::Error::from_raw_os_error(2).to_string());
        }
        other => panic!("expected a chdir error, got {:?}", other),
    }
    assert!(!marker.exists());
    assert_eq!(env::current_dir().unwrap(), before);

    // the guard on its own
    {
        let _guard = WorkingDirGuard::enter(work.path()).unwrap();
        assert_eq!(
            fs::canonicalize(env::current_dir().unwrap()).unwrap(),
            expected
        );
    }
    assert_eq!(env::current_dir().unwrap(), before);

    // a panic while inside the directory still restores it, and the
    // poisoned lock does not block later calls
    let work_path = work.path().to_path_buf();
    let panicked = std::thread::spawn(move || {
        let _guard = WorkingDirGuard::enter(&work_path).unwrap();
        panic!("boom");
    })
    .join();
    assert!(panicked.is_err());
    assert_eq!(env::current_dir().unwrap(), before);
    runner.run_in_dir(work.path(), "true", NO_ARGS).unwrap();
    assert_eq!(env::current_dir().unwrap(), before);
}
