//! `agent-cli`: a thin `clap`-derived binary driving `agent_core::run_agent` against a stub
//! browser, the full tool suite, and the mock LLM (SPEC_FULL.md §10.5).
//!
//! Subcommands: `run` (the only one — there is no REPL or remote backend here; see DESIGN.md
//! for what the teacher's CLI carried that this one doesn't).

mod logging;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use agent_config::AgentConfig;
use agent_core::llm::mock::MockLlm;
use agent_core::tools::{
    ClassificationTool, DoneTool, ExtractTool, HumanInputTool, InteractionTool, McpTool,
    NavigationTool, PlannerTool, RefreshBrowserStateTool, RequirePlanningTool, ResultTool,
    ScreenshotTool, ScrollTool, SearchTool, TabOperationsTool, TodoManagerTool, ToolRegistry,
    ToolRegistryLocked, ValidatorTool,
};
use agent_core::{
    run_agent, ExecutionContext, ForcedMode, HumanInputResolution, HumanInputSource, LlmClient,
    Narrator, PredefinedPlan, StubBrowserContext, UiEvent,
};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "agent-cli")]
#[command(about = "Drive agent-core's orchestrator from the command line")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Runs one task to completion.
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Natural-language task for the agent to complete.
    task: String,

    /// Force a specific strategy instead of letting the classifier decide.
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Path to a JSON `PredefinedPlan` file, bypassing the classifier entirely (SPEC_FULL.md §4.8).
    #[arg(long, value_name = "FILE")]
    predefined_plan: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Simple,
    Multistep,
    React,
}

impl From<Mode> for ForcedMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Simple => ForcedMode::Simple,
            Mode::Multistep => ForcedMode::MultiStep,
            Mode::React => ForcedMode::React,
        }
    }
}

/// Auto-resolves every human-input request immediately. There is no interactive UI wired up
/// here, so this stands in for the in-memory mailbox the human-input gate expects a harness to
/// provide (`agent_core::human_input` doc comment).
struct AutoApproveHumanInput;

#[async_trait::async_trait]
impl HumanInputSource for AutoApproveHumanInput {
    async fn poll(&self, _request_id: &str) -> Option<HumanInputResolution> {
        Some(HumanInputResolution::Done("approved by agent-cli".to_string()))
    }
}

fn register_tools() -> ToolRegistryLocked {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(ClassificationTool));
    registry.register(Box::new(PlannerTool));
    registry.register(Box::new(ValidatorTool));
    registry.register(Box::new(ResultTool));
    registry.register(Box::new(NavigationTool));
    registry.register(Box::new(InteractionTool));
    registry.register(Box::new(ScrollTool));
    registry.register(Box::new(SearchTool));
    registry.register(Box::new(RefreshBrowserStateTool));
    registry.register(Box::new(TabOperationsTool));
    registry.register(Box::new(ScreenshotTool));
    registry.register(Box::new(ExtractTool));
    registry.register(Box::new(DoneTool));
    registry.register(Box::new(RequirePlanningTool));
    registry.register(Box::new(HumanInputTool));
    registry.register(Box::new(TodoManagerTool));
    registry.register(Box::new(McpTool));
    ToolRegistryLocked::new(registry)
}

/// Picks the LLM the harness drives the orchestrator with. No live provider wire format ships in
/// this crate (explicitly out of scope, SPEC_FULL.md §1), so a live key being present is surfaced
/// as an error rather than silently falling back to the mock.
fn build_llm() -> Result<Arc<dyn LlmClient>, Box<dyn std::error::Error>> {
    if std::env::var("AGENT_LLM_API_KEY").is_ok() {
        return Err(
            "AGENT_LLM_API_KEY is set but no live LlmClient ships in this harness; unset it to \
             run against the mock"
                .into(),
        );
    }
    Ok(Arc::new(MockLlm::with_no_tool_calls(
        "agent-cli has no live LLM provider wired up; this is the mock's canned completion.",
    )))
}

fn print_event(event: &UiEvent) {
    match serde_json::to_string(&event.to_protocol_event()) {
        Ok(line) => println!("{line}"),
        Err(err) => eprintln!("agent-cli: failed to serialize event: {err}"),
    }
}

async fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let predefined_plan = match &args.predefined_plan {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Some(serde_json::from_str::<PredefinedPlan>(&raw)?)
        }
        None => None,
    };

    let llm = build_llm()?;
    let browser = Arc::new(StubBrowserContext::new());
    let tools = register_tools();
    let narrator = Narrator::default();
    let mut receiver = narrator.subscribe();

    let mut ctx = ExecutionContext::new(args.task.clone(), "agent-cli", llm, browser, tools, narrator);
    let config = AgentConfig::from_env();
    let forced_mode = args.mode.map(ForcedMode::from);

    let printer = tokio::spawn(async move {
        while let Ok(event) = receiver.recv().await {
            print_event(&event);
        }
    });

    let outcome = run_agent(
        &mut ctx,
        &config,
        &AutoApproveHumanInput,
        None,
        predefined_plan.as_ref(),
        forced_mode,
    )
    .await;

    drop(ctx);
    let _ = tokio::time::timeout(Duration::from_millis(200), printer).await;

    match outcome {
        Ok(result) => {
            println!("{}", result.summary);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    agent_config::load_and_apply(agent_config::APP_NAME, None::<&std::path::Path>).ok();
    logging::init()?;

    let args = Args::parse();
    match args.cmd {
        Command::Run(run_args) => run(run_args).await,
    }
}
