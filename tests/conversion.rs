// tests/conversion.rs

//! End-to-end conversion pipeline tests over fixture package trees.

mod common;

use common::{build_package, write_manifest, write_entry};
use repoconv::{
    ContentPackage, Converter, ConvertConfig, DirPackage, Error, FailurePolicy, FsDeployer,
    JsonManifest,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const USER_ENTRY: &str = "id = \"svc-base\"\npath = \"/home/users/system/base\"\n";

const BASE_POLICY: &str = r#"
[[entry]]
user = "svc-base"
allow = true
privileges = "jcr:read,rep:write"
path = "/content/shared"
"#;

const APP_POLICY: &str = r#"
[[entry]]
user = "svc-base"
allow = true
privileges = "jcr:read"
path = "/content/app"
"#;

fn open(path: &Path) -> Box<dyn ContentPackage> {
    Box::new(DirPackage::open(path).unwrap())
}

fn run(
    config: &ConvertConfig,
    packages: Vec<Box<dyn ContentPackage>>,
) -> repoconv::Result<(JsonManifest, repoconv::ConvertReport)> {
    let mut manifest = JsonManifest::new();
    let mut deployer = FsDeployer::new(&config.output_dir);
    let report = {
        let mut converter = Converter::new(config, &mut manifest, &mut deployer);
        converter.convert(packages)?
    };
    Ok((manifest, report))
}

#[test]
fn test_two_package_conversion_orders_and_synthesizes() {
    let fixtures = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let base = build_package(
        fixtures.path(),
        "base",
        "com.example",
        "base",
        "1.0.0",
        &[],
        &[
            ("apps/security/svc.user.toml", USER_ENTRY),
            ("config/base.policy.toml", BASE_POLICY),
            ("content/shared/.content.toml", "primary = \"app:Shared\"\n"),
            ("libs/base.txt", "base content"),
        ],
    );
    let app = build_package(
        fixtures.path(),
        "app",
        "com.example",
        "app",
        "1.0.0",
        &["com.example:base:[1.0,2.0)"],
        &[
            ("config/app.policy.toml", APP_POLICY),
            ("apps/app.txt", "app content"),
        ],
    );

    let mut config = ConvertConfig::default();
    config.output_dir = out.path().to_path_buf();

    // The dependent package comes first in the input on purpose
    let (manifest, report) = run(&config, vec![open(&app), open(&base)]).unwrap();

    let converted: Vec<String> = report.converted.iter().map(|i| i.to_string()).collect();
    assert_eq!(
        converted,
        vec!["com.example:base:1.0.0", "com.example:app:1.0.0"]
    );
    assert!(report.failed.is_empty());

    let scripts = manifest.scripts_for(None);
    assert_eq!(scripts.len(), 2);

    let expected_base = "create path (rep:AuthorizableFolder) /home/users/system/base\n\
                         create service user svc-base with path /home/users/system/base\n\
                         create path (sling:Folder) /content\n\
                         create path (app:Shared) /content/shared\n\
                         set ACL for svc-base\n\
                         allow jcr:read,rep:write on /content/shared\n\
                         end\n";
    assert_eq!(scripts[0], expected_base);

    // The user was registered while converting base; the app package only
    // contributes its statements, and /content is not created twice.
    let expected_app = "create path (sling:Folder) /content/app\n\
                        set ACL for svc-base\n\
                        allow jcr:read on /content/app\n\
                        end\n";
    assert_eq!(scripts[1], expected_app);

    // Residual entries are deployed, consumed entries are not
    let base_out = out.path().join("com.example/base/1.0.0");
    assert_eq!(
        fs::read_to_string(base_out.join("libs/base.txt")).unwrap(),
        "base content"
    );
    assert!(base_out.join("content/shared/.content.toml").exists());
    assert!(!base_out.join("apps/security/svc.user.toml").exists());
    assert!(!base_out.join("config/base.policy.toml").exists());
}

#[test]
fn test_sub_packages_recurse_into_their_own_buffer() {
    let fixtures = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let parent = build_package(
        fixtures.path(),
        "bundle",
        "com.example",
        "bundle",
        "2.0",
        &[],
        &[("libs/outer.txt", "outer")],
    );
    // Embedded sub-package with its own manifest and content
    let inner = parent.join("content/apps/inner.pkg");
    write_manifest(&inner, "com.example", "inner", "0.5", &[]);
    write_entry(&inner, "inner.txt", "inner");
    write_entry(
        &inner,
        "security/svc.user.toml",
        "id = \"svc-inner\"\npath = \"/home/users/system/inner\"\n",
    );

    let mut config = ConvertConfig::default();
    config.output_dir = out.path().to_path_buf();

    let (manifest, report) = run(&config, vec![open(&parent)]).unwrap();
    assert_eq!(report.converted.len(), 1);

    // Sub-package discoveries land in the same top-level script
    let scripts = manifest.scripts_for(None);
    assert_eq!(scripts.len(), 1);
    assert!(scripts[0]
        .contains("create service user svc-inner with path /home/users/system/inner\n"));

    // Each package's residual content is deployed under its own identity
    assert!(out
        .path()
        .join("com.example/bundle/2.0/libs/outer.txt")
        .exists());
    assert!(out
        .path()
        .join("com.example/inner/0.5/inner.txt")
        .exists());
}

#[test]
fn test_empty_ledger_appends_no_script() {
    let fixtures = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let quiet = build_package(
        fixtures.path(),
        "quiet",
        "com.example",
        "quiet",
        "1.0",
        &[],
        &[("libs/file.txt", "nothing declarative here")],
    );

    let mut config = ConvertConfig::default();
    config.output_dir = out.path().to_path_buf();

    let (manifest, report) = run(&config, vec![open(&quiet)]).unwrap();
    assert_eq!(report.converted.len(), 1);
    assert!(manifest.scripts_for(None).is_empty());
}

#[test]
fn test_cycle_aborts_before_converting_anything() {
    let fixtures = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let a = build_package(
        fixtures.path(),
        "a",
        "com.example",
        "a",
        "1.0",
        &["com.example:b"],
        &[("libs/a.txt", "a")],
    );
    let b = build_package(
        fixtures.path(),
        "b",
        "com.example",
        "b",
        "1.0",
        &["com.example:a"],
        &[("libs/b.txt", "b")],
    );

    let mut config = ConvertConfig::default();
    config.output_dir = out.path().to_path_buf();

    let result = run(&config, vec![open(&a), open(&b)]);
    assert!(matches!(result, Err(Error::CyclicDependency(_))));
    assert!(!out.path().join("com.example").exists());
}

#[test]
fn test_failure_policy_abort_and_continue() {
    let fixtures = TempDir::new().unwrap();

    let broken = build_package(
        fixtures.path(),
        "broken",
        "com.example",
        "broken",
        "1.0",
        &[],
        &[("apps/bad.policy.toml", "this is not toml [")],
    );
    let good = build_package(
        fixtures.path(),
        "good",
        "com.example",
        "good",
        "1.0",
        &[],
        &[("libs/ok.txt", "ok")],
    );

    // Default policy: the first failure aborts the run
    let out_abort = TempDir::new().unwrap();
    let mut config = ConvertConfig::default();
    config.output_dir = out_abort.path().to_path_buf();
    let result = run(&config, vec![open(&broken), open(&good)]);
    assert!(matches!(result, Err(Error::DescriptorParse { .. })));

    // Continue policy: the failure is recorded and the run goes on
    let out_continue = TempDir::new().unwrap();
    config.output_dir = out_continue.path().to_path_buf();
    config.failure_policy = FailurePolicy::Continue;
    let (_, report) = run(&config, vec![open(&broken), open(&good)]).unwrap();
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0.name, "broken");
    assert_eq!(report.converted.len(), 1);
    assert_eq!(report.converted[0].name, "good");
    assert!(out_continue
        .path()
        .join("com.example/good/1.0/libs/ok.txt")
        .exists());
    // Nothing of the broken package was deployed
    assert!(!out_continue.path().join("com.example/broken").exists());
}

#[test]
fn test_run_mode_scopes_the_script() {
    let fixtures = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let base = build_package(
        fixtures.path(),
        "base",
        "com.example",
        "base",
        "1.0",
        &[],
        &[("apps/svc.user.toml", USER_ENTRY)],
    );

    let mut config = ConvertConfig::default();
    config.output_dir = out.path().to_path_buf();
    config.run_mode = Some("author".to_string());

    let (manifest, _) = run(&config, vec![open(&base)]).unwrap();
    assert!(manifest.scripts_for(None).is_empty());
    assert_eq!(manifest.scripts_for(Some("author")).len(), 1);
}
