use super::{Hook, HookContext, HookOutcome};
use crate::error::Result;
use crate::guard::{GuardResult, MarkerGuard};

/// The marker guard behind the [`Hook`] interface
pub struct GuardHook {
    id: String,
    guard: MarkerGuard,
}

impl GuardHook {
    pub fn new(id: impl Into<String>, guard: MarkerGuard) -> Self {
        Self {
            id: id.into(),
            guard,
        }
    }
}

impl Hook for GuardHook {
    fn id(&self) -> &str {
        &self.id
    }

    fn run(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
        match self.guard.check(ctx.changes) {
            GuardResult::Clean => Ok(HookOutcome::passed()),
            GuardResult::Blocked { offenders } => {
                let marker = self.guard.marker();
                let diagnostics = offenders
                    .iter()
                    .map(|line| match line.location() {
                        Some(location) => format!("{location}: {}", line.content.trim()),
                        None => line.content.trim().to_string(),
                    })
                    .chain(std::iter::once(format!(
                        "remove '{marker}' from the staged lines before committing"
                    )))
                    .collect();
                Ok(HookOutcome::failed(diagnostics))
            }
        }
    }
}
