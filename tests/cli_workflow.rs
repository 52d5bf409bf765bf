mod common;

use common::*;

#[test]
fn test_workflow_renders_to_stdout() {
    let env = TestEnv::new();
    let result = env.run(&["workflow", "--branch", "release"]);
    assert!(result.success, "{}", result.combined_output());

    let yaml: serde_yaml_ng::Value = serde_yaml_ng::from_str(&result.stdout).unwrap();
    assert_eq!(yaml["on"]["push"]["branches"][0].as_str(), Some("release"));
    assert!(result.stdout.contains("rankdeploy deploy"));
    assert!(result.stdout.contains("id-token: write"));
}

#[test]
fn test_workflow_writes_file() {
    let env = TestEnv::new();
    let result = env.run(&["workflow", "-o", ".github/workflows/deploy.yml"]);
    assert!(result.success, "{}", result.combined_output());

    let written = env.read_project_file(".github/workflows/deploy.yml");
    assert!(written.contains("workflow_dispatch"));
}
