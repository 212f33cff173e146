mod common;

use std::fs;
use std::path::Path;

use common::{bundled_templates, template_at, write_tree, RecordingGateway};
use create_kang_app::error::Error;
use create_kang_app::pipeline::{StageReport, StageState};
use create_kang_app::provisioner::{
    build_stages, copy_template, provision, ProvisionPlan, LINT_CONFIG_KEY, LINT_KEY,
    TEMPLATE_FILES_KEY,
};
use create_kang_app::renderer::TokenRenderer;
use create_kang_app::reporter::summarize;
use create_kang_app::template::{configs_dir, projects_dir, Template};
use create_kang_app::tooling::PackageManager;
use create_kang_app::variables::VariableSet;
use tempfile::TempDir;

fn plan_for(
    template: Template,
    configs: &Path,
    project_dir: &Path,
    package_manager: PackageManager,
    lint: bool,
) -> ProvisionPlan {
    ProvisionPlan {
        variables: VariableSet::for_project(project_dir).unwrap(),
        template,
        project_dir: project_dir.to_path_buf(),
        configs_dir: configs.to_path_buf(),
        package_manager,
        lint,
    }
}

fn write_lint_configs(root: &Path) {
    write_tree(root, &[(".eslintrc.js", "module.exports = {};\n"), (".prettierrc", "{}\n")]);
}

#[test_log::test]
fn test_next_ts_layout_is_rendered() {
    let templates = bundled_templates();
    let workspace = TempDir::new().unwrap();
    let project_dir = workspace.path().join("my-app");
    let template = Template::load(projects_dir(&templates), "next-ts").unwrap();
    let plan = plan_for(template, &configs_dir(&templates), &project_dir, PackageManager::Npm, false);

    assert_eq!(plan.variables.get("name"), Some("my-app"));
    assert_eq!(plan.variables.get("description"), Some("my-app 프로젝트입니다."));

    let gateway = RecordingGateway::new();
    let mut reports: Vec<StageReport> = Vec::new();
    let context = provision(&plan, &TokenRenderer::new(), &gateway, &mut reports).unwrap();

    let layout = project_dir.join("src/app/layout.tsx");
    assert!(layout.is_file());
    assert!(!project_dir.join("src/app/_layout.tsx").exists());
    let content = fs::read_to_string(layout).unwrap();
    assert!(content.contains("title: 'my-app'"));
    assert!(content.contains("description: 'my-app 프로젝트입니다.'"));

    let package_json = fs::read_to_string(project_dir.join("package.json")).unwrap();
    assert!(package_json.contains("\"name\": \"my-app\""));
    assert!(project_dir.join("src/app/page.tsx").is_file());
    assert!(!project_dir.join("template.yaml").exists());

    assert!(context.count(TEMPLATE_FILES_KEY).unwrap() >= 5);
}

#[test]
fn test_npm_success_without_lint() {
    let templates = bundled_templates();
    let workspace = TempDir::new().unwrap();
    let project_dir = workspace.path().join("my-app");
    let template = Template::load(projects_dir(&templates), "next-ts").unwrap();
    let plan = plan_for(template, &configs_dir(&templates), &project_dir, PackageManager::Npm, false);

    let gateway = RecordingGateway::new();
    let mut reports: Vec<StageReport> = Vec::new();
    let context = provision(&plan, &TokenRenderer::new(), &gateway, &mut reports).unwrap();

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "npm");
    assert_eq!(calls[0].args, vec!["install"]);
    assert_eq!(calls[0].cwd, project_dir);

    assert_eq!(context.flag("npm"), Some(true));
    assert_eq!(context.get(LINT_CONFIG_KEY), None);
    assert_eq!(context.get(LINT_KEY), None);
    assert!(!reports.iter().any(|r| r.title.contains("lint")));

    let summary = summarize(&context, &plan.template, &[PackageManager::Npm], "my-app");
    assert_eq!(summary.dev_command.as_deref(), Some("npm run dev"));
}

#[test]
fn test_failed_install_is_skipped() {
    let templates = bundled_templates();
    let workspace = TempDir::new().unwrap();
    let project_dir = workspace.path().join("my-app");
    let template = Template::load(projects_dir(&templates), "next-ts").unwrap();
    let plan = plan_for(template, &configs_dir(&templates), &project_dir, PackageManager::Yarn, false);

    let gateway = RecordingGateway::failing(&["yarn"]);
    let mut reports: Vec<StageReport> = Vec::new();
    let context = provision(&plan, &TokenRenderer::new(), &gateway, &mut reports).unwrap();

    assert_eq!(context.flag("yarn"), Some(false));
    assert_eq!(context.skip_reasons().len(), 1);
    assert!(reports
        .iter()
        .any(|r| r.title.contains("yarn") && r.state == StageState::Skipped));

    let summary = summarize(&context, &plan.template, &[PackageManager::Yarn], "my-app");
    assert_eq!(summary.dev_command, None);
    assert_eq!(summary.next_step().as_deref(), Some("cd my-app"));
}

#[test]
fn test_every_package_manager_failing() {
    let templates = bundled_templates();
    let workspace = TempDir::new().unwrap();

    for package_manager in PackageManager::ALL {
        let project_dir = workspace.path().join(format!("app-{package_manager}"));
        let template = Template::load(projects_dir(&templates), "vite-ts").unwrap();
        let plan = plan_for(template, &configs_dir(&templates), &project_dir, package_manager, true);
        let gateway = RecordingGateway::failing(&["npm", "yarn", "pnpm", "eslint", "prettier"]);

        let context = provision(
            &plan,
            &TokenRenderer::new(),
            &gateway,
            &mut Vec::<StageReport>::new(),
        )
        .unwrap();

        assert_eq!(context.flag(package_manager.as_str()), Some(false));
        assert_eq!(context.flag(LINT_CONFIG_KEY), Some(false));
        assert_eq!(context.flag(LINT_KEY), Some(false));

        let summary = summarize(&context, &plan.template, &PackageManager::ALL, "app");
        assert_eq!(summary.dev_command, None);
    }
}

#[test]
fn test_lint_stages() {
    let templates = bundled_templates();
    let workspace = TempDir::new().unwrap();
    let project_dir = workspace.path().join("web");
    let template = Template::load(projects_dir(&templates), "vite-ts").unwrap();
    let plan = plan_for(template, &configs_dir(&templates), &project_dir, PackageManager::Pnpm, true);

    let gateway = RecordingGateway::new();
    let mut reports: Vec<StageReport> = Vec::new();
    let context = provision(&plan, &TokenRenderer::new(), &gateway, &mut reports).unwrap();

    let calls = gateway.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0].args, vec!["install"]);
    assert_eq!(calls[1].program, "pnpm");
    assert_eq!(&calls[1].args[..2], &["add".to_string(), "-D".to_string()]);
    assert!(calls[1].args.contains(&"@typescript-eslint/parser".to_string()));
    assert_eq!(calls[2].program, project_dir.join("node_modules/.bin/eslint").to_string_lossy());
    assert_eq!(calls[2].args, vec!["--fix", "."]);
    assert_eq!(calls[3].program, project_dir.join("node_modules/.bin/prettier").to_string_lossy());
    assert_eq!(calls[3].args, vec!["--write", "."]);

    assert!(project_dir.join(".eslintrc.cjs").is_file());
    assert!(!project_dir.join(".eslintrc.js").exists());
    assert!(project_dir.join(".prettierrc").is_file());

    let index = fs::read_to_string(project_dir.join("index.html")).unwrap();
    assert!(index.contains("<title>web</title>"));

    assert_eq!(context.flag("pnpm"), Some(true));
    assert_eq!(context.flag(LINT_CONFIG_KEY), Some(true));
    assert_eq!(context.flag(LINT_KEY), Some(true));
    assert_eq!(reports.iter().filter(|r| r.state == StageState::Succeeded).count(), 4);
}

#[test]
fn test_npm_adds_lint_with_install() {
    let source = TempDir::new().unwrap();
    let configs = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    write_tree(source.path(), &[("index.js", "")]);
    write_lint_configs(configs.path());
    let project_dir = workspace.path().join("lib");
    let plan = plan_for(
        template_at(source.path(), "node-js"),
        configs.path(),
        &project_dir,
        PackageManager::Npm,
        true,
    );

    let gateway = RecordingGateway::new();
    provision(&plan, &TokenRenderer::new(), &gateway, &mut Vec::<StageReport>::new()).unwrap();

    let calls = gateway.calls();
    assert_eq!(&calls[1].args[..2], &["install".to_string(), "-D".to_string()]);
    assert!(project_dir.join(".eslintrc.js").is_file());
}

#[test]
fn test_failed_lint_install_skips_only_that_stage() {
    let source = TempDir::new().unwrap();
    let configs = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    write_tree(source.path(), &[("index.ts", "")]);
    write_lint_configs(configs.path());
    let project_dir = workspace.path().join("svc");
    let plan = plan_for(
        template_at(source.path(), "node-ts"),
        configs.path(),
        &project_dir,
        PackageManager::Npm,
        true,
    );

    // A missing configs directory makes Add Lint Config fail after its install.
    fs::remove_dir_all(configs.path()).unwrap();

    let gateway = RecordingGateway::new();
    let context =
        provision(&plan, &TokenRenderer::new(), &gateway, &mut Vec::<StageReport>::new()).unwrap();

    assert_eq!(context.flag("npm"), Some(true));
    assert_eq!(context.flag(LINT_CONFIG_KEY), Some(false));
    assert_eq!(context.flag(LINT_KEY), Some(true));
    assert_eq!(gateway.programs().len(), 4);
}

#[test]
fn test_undefined_variable_aborts_before_install() {
    let source = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    write_tree(
        source.path(),
        &[("README.md", "# readme"), ("_package.json", "{\"version\": \"%VERSION%\"}")],
    );
    let project_dir = workspace.path().join("broken");
    let plan = plan_for(
        template_at(source.path(), "next-ts"),
        source.path(),
        &project_dir,
        PackageManager::Npm,
        true,
    );

    let gateway = RecordingGateway::new();
    let mut reports: Vec<StageReport> = Vec::new();
    let result = provision(&plan, &TokenRenderer::new(), &gateway, &mut reports);

    assert!(matches!(result, Err(Error::UndefinedVariable { ref token }) if token == "VERSION"));
    assert!(gateway.calls().is_empty());
    assert_eq!(reports.last().unwrap().state, StageState::Failed);
    // No rollback: plain files copied before the failure stay in place.
    assert!(project_dir.join("README.md").is_file());
}

#[test]
fn test_copy_template_reports_first_failure_in_path_order() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    write_tree(
        source.path(),
        &[("a/_one.txt", "%FIRST%"), ("b/_two.txt", "%SECOND%"), ("c/_three.txt", "%NAME%")],
    );
    let template = template_at(source.path(), "custom");
    let variables = VariableSet::from_iter([("name", "demo")]);

    let err = copy_template(&template, dest.path(), &TokenRenderer::new(), &variables).unwrap_err();

    match err {
        Error::UndefinedVariable { token } => assert_eq!(token, "FIRST"),
        other => panic!("Expected UndefinedVariable, got {other:?}"),
    }
    // Every worker is joined, so independent files are still written.
    assert_eq!(fs::read_to_string(dest.path().join("c/three.txt")).unwrap(), "demo");
}

#[test]
fn test_copy_template_honors_ignore_file() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    write_tree(
        source.path(),
        &[
            (".kangignore", "*.log\n_draft.md\n"),
            ("app.log", ""),
            ("_draft.md", "%UNDEFINED%"),
            ("_README.md", "# %NAME%"),
            ("src/.DS_Store", ""),
            ("src/index.ts", "export {};"),
        ],
    );
    let template = template_at(source.path(), "custom");
    let variables = VariableSet::from_iter([("name", "demo")]);

    let written = copy_template(&template, dest.path(), &TokenRenderer::new(), &variables).unwrap();

    assert_eq!(written, 2);
    assert_eq!(fs::read_to_string(dest.path().join("README.md")).unwrap(), "# demo");
    assert!(dest.path().join("src/index.ts").is_file());
    assert!(!dest.path().join("app.log").exists());
    assert!(!dest.path().join("draft.md").exists());
    assert!(!dest.path().join("src/.DS_Store").exists());
    assert!(!dest.path().join(".kangignore").exists());
}

#[test]
fn test_marked_file_rendering_onto_plain_file_is_rejected() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    write_tree(
        source.path(),
        &[("_a.ts", "FIRST %NAME%"), ("a_.ts", "SECOND %NAME%"), ("a.ts", "PLAIN")],
    );
    let template = template_at(source.path(), "custom");
    let variables = VariableSet::from_iter([("name", "demo")]);

    let err = copy_template(&template, dest.path(), &TokenRenderer::new(), &variables).unwrap_err();

    assert!(matches!(err, Error::TemplateError(_)));
    // Nothing is written once a collision is found.
    assert!(!dest.path().join("a.ts").exists());
}

#[test]
fn test_marked_files_sharing_a_target_are_rejected() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    write_tree(
        source.path(),
        &[("src/_a.ts", "FIRST %NAME%"), ("src/a_.ts", "SECOND %NAME%"), ("b.ts", "PLAIN")],
    );
    let template = template_at(source.path(), "custom");
    let variables = VariableSet::from_iter([("name", "demo")]);

    let err = copy_template(&template, dest.path(), &TokenRenderer::new(), &variables).unwrap_err();

    match err {
        Error::TemplateError(message) => assert!(message.contains("both render to")),
        other => panic!("Expected TemplateError, got {other:?}"),
    }
    assert!(!dest.path().join("src/a.ts").exists());
    assert!(!dest.path().join("b.ts").exists());
}

#[test]
fn test_build_stages_layout() {
    let templates = bundled_templates();
    let template = Template::load(projects_dir(&templates), "next-ts").unwrap();
    let workspace = TempDir::new().unwrap();
    let gateway = RecordingGateway::new();
    let renderer = TokenRenderer::new();

    let plan = plan_for(
        template.clone(),
        &configs_dir(&templates),
        &workspace.path().join("x"),
        PackageManager::Npm,
        false,
    );
    let stages = build_stages(&plan, &renderer, &gateway);
    let layout: Vec<(bool, bool)> =
        stages.iter().map(|s| (s.is_skippable(), s.is_enabled())).collect();
    assert_eq!(layout, vec![(false, true), (true, true), (true, false), (true, false)]);

    let plan = plan_for(
        template,
        &configs_dir(&templates),
        &workspace.path().join("y"),
        PackageManager::Npm,
        true,
    );
    let stages = build_stages(&plan, &renderer, &gateway);
    assert!(stages.iter().all(|s| s.is_enabled()));
    assert_eq!(stages[1].title(), "Installing dependencies with npm");
}
