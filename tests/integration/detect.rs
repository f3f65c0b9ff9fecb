//! Detection over real workspace folders.

use sam_detect::detect::{
    DetectOptions, FailureKind, FailurePolicy, LocalFunctionRecord, detect, detect_local_functions,
};
use sam_detect::template::TemplateDocument;
use sam_detect::test_utils::{TemplateFixture, init_test_logging};
use sam_detect::workspace::WorkspaceFolder;
use tempfile::TempDir;

fn workspace(dirs: &[&TempDir]) -> Vec<WorkspaceFolder> {
    WorkspaceFolder::from_paths(dirs.iter().map(|d| d.path()))
}

#[tokio::test]
async fn test_no_workspace_open() {
    init_test_logging(None);

    assert!(detect_local_functions(None).await.is_empty());
}

#[tokio::test]
async fn test_empty_workspace() {
    init_test_logging(None);

    assert!(detect_local_functions(Some(&[][..])).await.is_empty());
}

#[tokio::test]
async fn test_folder_without_template() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("README.md"), "# not a template\n").unwrap();

    let records = detect_local_functions(Some(workspace(&[&temp]).as_slice())).await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_empty_template() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("template.yml"), "").unwrap();

    let report = detect(Some(workspace(&[&temp]).as_slice()), &DetectOptions::default()).await.unwrap();
    assert!(report.records.is_empty());
    assert!(report.is_complete());
}

#[tokio::test]
async fn test_template_yml() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    let template_path =
        TemplateFixture::with_functions(["MyFunction"]).write_to(temp.path(), "template.yml").unwrap();

    let records = detect_local_functions(Some(workspace(&[&temp]).as_slice())).await;
    assert_eq!(
        records,
        vec![LocalFunctionRecord {
            name: "MyFunction".to_string(),
            template_path,
        }]
    );
}

#[tokio::test]
async fn test_template_yaml() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    let template_path =
        TemplateFixture::with_functions(["MyFunction"]).write_to(temp.path(), "template.yaml").unwrap();

    let records = detect_local_functions(Some(workspace(&[&temp]).as_slice())).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "MyFunction");
    assert_eq!(records[0].template_path, template_path);
}

#[tokio::test]
async fn test_yml_takes_precedence_over_yaml() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    let yml = TemplateFixture::with_functions(["FromYml"]).write_to(temp.path(), "template.yml").unwrap();
    TemplateFixture::with_functions(["FromYaml"]).write_to(temp.path(), "template.yaml").unwrap();

    let records = detect_local_functions(Some(workspace(&[&temp]).as_slice())).await;
    assert_eq!(
        records,
        vec![LocalFunctionRecord {
            name: "FromYml".to_string(),
            template_path: yml,
        }]
    );
}

#[tokio::test]
async fn test_multiple_folders_keep_folder_order() {
    init_test_logging(None);
    let first = TempDir::new().unwrap();
    let first_template = TemplateFixture::with_functions(["MyFunction1"])
        .write_to(first.path(), "template.yaml")
        .unwrap();
    let second = TempDir::new().unwrap();
    let second_template = TemplateFixture::with_functions(["MyFunction2"])
        .write_to(second.path(), "template.yml")
        .unwrap();

    let records = detect_local_functions(Some(workspace(&[&first, &second]).as_slice())).await;
    assert_eq!(
        records,
        vec![
            LocalFunctionRecord {
                name: "MyFunction1".to_string(),
                template_path: first_template,
            },
            LocalFunctionRecord {
                name: "MyFunction2".to_string(),
                template_path: second_template,
            },
        ]
    );
}

#[tokio::test]
async fn test_order_is_stable_under_concurrency() {
    init_test_logging(None);
    let dirs: Vec<TempDir> = (0..12).map(|_| TempDir::new().unwrap()).collect();
    for (i, dir) in dirs.iter().enumerate() {
        TemplateFixture::with_functions([format!("Function{i}a"), format!("Function{i}b")])
            .write_to(dir.path(), "template.yml")
            .unwrap();
    }
    let folders = WorkspaceFolder::from_paths(dirs.iter().map(TempDir::path));

    let report = detect(Some(folders.as_slice()), &DetectOptions::default().with_max_concurrency(4))
        .await
        .unwrap();

    let expected: Vec<String> =
        (0..12).flat_map(|i| [format!("Function{i}a"), format!("Function{i}b")]).collect();
    let names: Vec<String> = report.records.into_iter().map(|r| r.name).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_non_function_resources_excluded() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    TemplateFixture::with_functions(["HelloWorldFunction"])
        .with_resource("ItemsTable", "AWS::DynamoDB::Table")
        .with_resource("Bucket", "AWS::S3::Bucket")
        .with_resource("LegacyFunction", "AWS::Lambda::Function")
        .write_to(temp.path(), "template.yml")
        .unwrap();

    let records = detect_local_functions(Some(workspace(&[&temp]).as_slice())).await;
    let names: Vec<_> = records.iter().map(LocalFunctionRecord::label).collect();
    assert_eq!(names, vec!["HelloWorldFunction"]);
}

#[tokio::test]
async fn test_detection_is_idempotent() {
    init_test_logging(None);
    let first = TempDir::new().unwrap();
    TemplateFixture::with_functions(["A", "B"]).write_to(first.path(), "template.yml").unwrap();
    let second = TempDir::new().unwrap();
    TemplateFixture::with_functions(["C"]).write_to(second.path(), "template.yaml").unwrap();
    let folders = workspace(&[&first, &second]);

    let once = detect_local_functions(Some(folders.as_slice())).await;
    let twice = detect_local_functions(Some(folders.as_slice())).await;
    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_broken_template_does_not_hide_other_folders() {
    init_test_logging(None);
    let broken = TempDir::new().unwrap();
    std::fs::write(broken.path().join("template.yml"), "Resources:\n  A: [unclosed\n").unwrap();
    let good = TempDir::new().unwrap();
    TemplateFixture::with_functions(["Survivor"]).write_to(good.path(), "template.yml").unwrap();

    let report =
        detect(Some(workspace(&[&broken, &good]).as_slice()), &DetectOptions::default()).await.unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].name, "Survivor");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind(), FailureKind::MalformedDocument);
    assert_eq!(report.failures[0].folder.root, broken.path());

    let err = detect(
        Some(workspace(&[&broken, &good]).as_slice()),
        &DetectOptions::default().with_policy(FailurePolicy::Abort),
    )
    .await
    .unwrap_err();
    assert_eq!(err.path(), Some(broken.path().join("template.yml").as_path()));
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_template_does_not_hide_other_folders() {
    init_test_logging(None);
    let looped = TempDir::new().unwrap();
    let template = looped.path().join("template.yml");
    std::os::unix::fs::symlink(&template, &template).unwrap();
    let good = TempDir::new().unwrap();
    TemplateFixture::with_functions(["Survivor"]).write_to(good.path(), "template.yml").unwrap();

    let report = detect(Some(workspace(&[&good, &looped]).as_slice()), &DetectOptions::default())
        .await
        .unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].name, "Survivor");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].kind(), FailureKind::AccessFailure);
    assert_eq!(report.failures[0].folder.index, 1);
    assert!(!report.all_failed());
}

#[tokio::test]
async fn test_numeric_logical_id_is_reported() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("template.yml"),
        "Resources:\n  123:\n    Type: AWS::Serverless::Function\n  Fn2:\n    Type: AWS::Serverless::Function\n",
    )
    .unwrap();

    let records = detect_local_functions(Some(workspace(&[&temp]).as_slice())).await;
    let names: Vec<_> = records.iter().map(LocalFunctionRecord::label).collect();
    assert_eq!(names, vec!["123", "Fn2"]);
}

#[tokio::test]
async fn test_malformed_second_document_is_a_failure() {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    let content = "Resources:\n  Fn:\n    Type: AWS::Serverless::Function\n---\nResources: [unclosed\n";
    assert!(TemplateDocument::parse(content.as_bytes()).is_err());
    std::fs::write(temp.path().join("template.yml"), content).unwrap();

    let report = detect(Some(workspace(&[&temp]).as_slice()), &DetectOptions::default())
        .await
        .unwrap();
    assert!(report.records.is_empty());
    assert_eq!(report.failures[0].kind(), FailureKind::MalformedDocument);
}
