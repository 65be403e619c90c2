use super::{Builtin, CommandHook, GuardHook, Hook, HookContext, HookOutcome, HookStatus};
use crate::config::MarkguardConfig;
use crate::error::Result;
use crate::guard::MarkerGuard;
use serde::Serialize;
use tracing::{info, warn};

/// What to do for one configured hook
enum Step {
    Run(Box<dyn Hook>),
    /// Hook from a pinned remote repository, run by the external hook runner
    External { repo: String, rev: String },
}

struct PlannedHook {
    id: String,
    name: String,
    step: Step,
}

/// Outcome of one hook within a pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct HookReport {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub outcome: HookOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineReport {
    pub hooks: Vec<HookReport>,
    /// Set when `fail_fast` cut the pipeline short
    pub stopped_early: bool,
}

impl PipelineReport {
    pub fn success(&self) -> bool {
        !self.hooks.iter().any(|h| h.outcome.is_failure())
    }

    pub fn count(&self, status: HookStatus) -> usize {
        self.hooks.iter().filter(|h| h.outcome.status == status).count()
    }
}

/// Runs the configured hooks in order
pub struct HookExecutor {
    plan: Vec<PlannedHook>,
    fail_fast: bool,
}

impl HookExecutor {
    pub fn new(config: &MarkguardConfig) -> Result<Self> {
        let mut plan = Vec::new();

        for repo in &config.hooks.repos {
            for hook in &repo.hooks {
                let step = if !repo.is_local() {
                    Step::External {
                        repo: repo.repo.clone(),
                        rev: repo.rev.clone().unwrap_or_default(),
                    }
                } else if let Some(builtin) = &hook.builtin {
                    match builtin.parse::<Builtin>()? {
                        Builtin::MarkerGuard => {
                            let guard = MarkerGuard::new(config.marker()?)
                                .with_mode(config.scan_mode());
                            Step::Run(Box::new(GuardHook::new(hook.id.clone(), guard)))
                        }
                    }
                } else {
                    Step::Run(Box::new(CommandHook::from_entry(hook)?))
                };

                plan.push(PlannedHook {
                    id: hook.id.clone(),
                    name: hook.display_name().to_string(),
                    step,
                });
            }
        }

        Ok(Self {
            plan,
            fail_fast: config.hooks.fail_fast,
        })
    }

    pub fn len(&self) -> usize {
        self.plan.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }

    pub fn run(&self, ctx: &HookContext<'_>) -> Result<PipelineReport> {
        let mut report = PipelineReport::default();

        for planned in &self.plan {
            let outcome = match &planned.step {
                Step::Run(hook) => {
                    info!(hook = hook.id(), "running hook");
                    hook.run(ctx)?
                }
                Step::External { repo, rev } => HookOutcome::skipped(format!(
                    "{repo}@{rev} is managed by the external hook runner"
                )),
            };

            let failed = outcome.is_failure();
            report.hooks.push(HookReport {
                id: planned.id.clone(),
                name: planned.name.clone(),
                outcome,
            });

            if failed && self.fail_fast {
                warn!(hook = %planned.id, "stopping after first failure");
                report.stopped_early = report.hooks.len() < self.plan.len();
                break;
            }
        }

        Ok(report)
    }
}
