//! create-kang-app's main application entry point.
//! Collects the run choices, provisions the project and prints the summary.

use create_kang_app::{
    cli::{get_args, Args},
    error::{default_error_handler, Result},
    gateway::SystemGateway,
    logger::init_logger,
    prompt::{choose_package_manager, choose_template, confirm_lint, DialoguerPrompter},
    provisioner::{provision, ProvisionPlan},
    renderer::TokenRenderer,
    reporter::{relative_project_path, summarize, ConsoleObserver},
    template::{available_templates, configs_dir, projects_dir, Template, TemplatesDir},
    variables::VariableSet,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Resolves the project and templates directories
/// 2. Asks for the template, package manager and lint choice when not given
/// 3. Builds the variables of the project
/// 4. Runs the provisioning pipeline
/// 5. Prints the summary
fn run(args: Args) -> Result<()> {
    let prompt = DialoguerPrompter::new();
    let cwd = std::env::current_dir()?;
    let project_dir = args.project_dir(&cwd);
    let templates = TemplatesDir::resolve(args.templates_dir.clone())?;
    let templates_dir = templates.path();
    let projects_root = projects_dir(templates_dir);

    let template_name = match &args.template {
        Some(name) => name.clone(),
        None => choose_template(&prompt, &available_templates(&projects_root)?)?,
    };
    let package_manager = match args.package_manager {
        Some(package_manager) => package_manager,
        None => choose_package_manager(&prompt)?,
    };
    let lint = match args.lint_choice() {
        Some(lint) => lint,
        None => confirm_lint(&prompt)?,
    };

    let plan = ProvisionPlan {
        template: Template::load(&projects_root, &template_name)?,
        variables: VariableSet::for_project(&project_dir)?,
        configs_dir: configs_dir(templates_dir),
        project_dir,
        package_manager,
        lint,
    };

    let renderer = TokenRenderer::new();
    let gateway = SystemGateway::new();
    let context = provision(&plan, &renderer, &gateway, &mut ConsoleObserver::new())?;

    let summary = summarize(
        &context,
        &plan.template,
        &[plan.package_manager],
        &relative_project_path(&cwd, &plan.project_dir),
    );
    println!("{summary}");
    Ok(())
}
